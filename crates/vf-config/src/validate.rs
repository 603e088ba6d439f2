//! Startup checks on run parameters.

use crate::error::{ConfigError, ConfigResult, Violation};
use crate::keys;
use crate::run_config::{MAX_SNAPSHOTS, RunParameters};

/// Smallest accepted case number.
const MIN_CASE_ID: i32 = 1000;

struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn fail(&mut self, key: &'static str, value: impl ToString, reason: &'static str) {
        self.violations.push(Violation {
            key,
            value: value.to_string(),
            reason,
        });
    }

    fn positive(&mut self, key: &'static str, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            self.fail(key, value, "must be finite and > 0");
        }
    }

    fn non_negative(&mut self, key: &'static str, value: f64) {
        if !(value.is_finite() && value >= 0.0) {
            self.fail(key, value, "must be finite and >= 0");
        }
    }
}

pub(crate) fn check(p: &RunParameters) -> ConfigResult<()> {
    let mut c = Checker {
        violations: Vec::new(),
    };

    if p.case_id < MIN_CASE_ID {
        c.fail(keys::CASE_NO, p.case_id, "must be >= 1000");
    }
    if p.min_level < 1 {
        c.fail(keys::MIN_LEVEL, p.min_level, "must be >= 1");
    }
    if p.max_level < p.min_level {
        c.fail(keys::MAX_LEVEL, p.max_level, "must be >= MINlevel");
    }

    c.positive(keys::TMAX, p.time_horizon);
    c.positive(keys::OH, p.solvent_ohnesorge);
    c.non_negative(keys::OHA, p.gas_ohnesorge);
    // +inf is the purely elastic limit
    if p.deborah.is_nan() || p.deborah < 0.0 {
        c.fail(keys::DE, p.deborah, "must be >= 0");
    }
    c.non_negative(keys::EC, p.elasto_capillary);

    c.positive(keys::DTMAX, p.max_time_step);
    if p.max_time_step > p.time_horizon {
        c.fail(keys::DTMAX, p.max_time_step, "must not exceed tmax");
    }

    c.positive(keys::RHO2, p.gas_density);
    c.positive(keys::TSNAP, p.snapshot_interval);
    if p.snapshot_interval > 0.0
        && p.time_horizon / p.snapshot_interval >= MAX_SNAPSHOTS as f64
    {
        c.fail(
            keys::TSNAP,
            p.snapshot_interval,
            "must leave fewer than 1e9 snapshots before tmax",
        );
    }
    if !(p.perturbation.is_finite() && (0.0..1.0).contains(&p.perturbation)) {
        c.fail(keys::EPSILON, p.perturbation, "must be in [0, 1)");
    }

    c.positive(keys::F_ERR, p.tolerances.interface);
    c.positive(keys::VEL_ERR, p.tolerances.velocity);
    c.positive(keys::A_ERR, p.tolerances.conformation);
    c.positive(keys::K_ERR, p.tolerances.curvature);

    if p.dump_file.as_os_str().is_empty() {
        c.fail(keys::DUMP_FILE, "", "must not be empty");
    }

    if c.violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            violations: c.violations,
        })
    }
}
