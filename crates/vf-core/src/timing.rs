//! Wall-clock timing for run summaries and progress throttling.

use std::time::Instant;

/// A simple timer that measures elapsed wall time.
#[derive(Clone, Debug)]
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed time in seconds since the timer started.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Restart the timer, returning the time elapsed before the restart.
    pub fn lap(&mut self) -> f64 {
        let elapsed = self.elapsed_s();
        self.start = Instant::now();
        elapsed
    }
}
