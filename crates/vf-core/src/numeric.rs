//! Tolerant comparisons for simulated time.

/// Absolute and relative slack for float comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Purely absolute slack.
    pub fn absolute(abs: f64) -> Self {
        Self { abs, rel: 0.0 }
    }

    /// Slack allowed when comparing `a` and `b`.
    pub fn slack(&self, a: f64, b: f64) -> f64 {
        self.abs.max(self.rel * a.abs().max(b.abs()))
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    (a - b).abs() <= tol.slack(a, b)
}

/// `a >= b`, allowing `a` to fall short of `b` by the tolerance.
///
/// Accumulated step sizes rarely land exactly on a target time.
pub fn reached(a: f64, b: f64, tol: Tolerances) -> bool {
    a >= b || nearly_equal(a, b, tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reached_accepts_rounding_shortfall() {
        let tol = Tolerances::default();
        // 0.1 summed ten times lands just below 1.0
        let t: f64 = (0..10).map(|_| 0.1).sum();
        assert!(t < 1.0);
        assert!(reached(t, 1.0, tol));
        assert!(!reached(0.99, 1.0, tol));
        assert!(reached(1.5, 1.0, tol));
    }

    #[test]
    fn absolute_slack_ignores_magnitude() {
        let tol = Tolerances::absolute(1e-3);
        assert!(nearly_equal(1e6, 1e6 + 5e-4, tol));
        assert!(!nearly_equal(1e6, 1e6 + 2e-3, tol));
        assert!(!reached(f64::NAN, 1.0, tol));
    }
}
