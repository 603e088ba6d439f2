//! Rolling restart file and timed snapshots.

use crate::error::ControlResult;
use crate::solver::{InterfaceShape, Solver, SolverClock};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vf_config::{MAX_SNAPSHOTS, RunConfig};
use vf_core::{Communicator, Tolerances, reached};

/// Fixed snapshot times `k * interval` for `k = 0..=floor(horizon / interval)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotSchedule {
    interval: f64,
    count: usize,
}

impl SnapshotSchedule {
    pub fn new(interval: f64, horizon: f64) -> Self {
        let ratio = horizon / interval;
        // absorb rounding in the quotient, e.g. 2.0 / 1e-3
        let slots = (ratio + 1e-9 * ratio.max(1.0)).floor();
        let count = if slots.is_finite() && slots >= 0.0 {
            (slots.min(MAX_SNAPSHOTS as f64) as usize).saturating_add(1)
        } else {
            1
        };
        Self { interval, count }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Number of slots, including the one at t = 0.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Slot time; never accumulated.
    pub fn time(&self, slot: usize) -> f64 {
        slot as f64 * self.interval
    }

    /// `snapshot-<t>` with four decimals.
    pub fn label(&self, slot: usize) -> String {
        format!("snapshot-{:.4}", self.time(slot))
    }

    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.count).map(|k| self.label(k))
    }

    fn tolerances(&self) -> Tolerances {
        Tolerances::absolute(1e-9 * self.interval)
    }

    /// True once `time` has reached slot `slot`.
    fn is_due(&self, slot: usize, time: f64) -> bool {
        slot < self.count && reached(time, self.time(slot), self.tolerances())
    }
}

/// How the run started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StartMode {
    Fresh,
    Resumed(SolverClock),
}

impl StartMode {
    pub fn clock(&self) -> SolverClock {
        match self {
            StartMode::Fresh => SolverClock { step: 0, time: 0.0 },
            StartMode::Resumed(clock) => *clock,
        }
    }

    pub fn is_resumed(&self) -> bool {
        matches!(self, StartMode::Resumed(_))
    }
}

/// Writes the rolling restart file every step and snapshots on schedule.
///
/// Only the root participant touches the filesystem.
#[derive(Clone, Debug)]
pub struct Checkpointer {
    rolling: PathBuf,
    snapshot_dir: PathBuf,
    schedule: SnapshotSchedule,
    next_slot: usize,
}

impl Checkpointer {
    /// Relative paths in `config` are resolved against `base`.
    pub fn new(config: &RunConfig, base: &Path) -> Self {
        Self {
            rolling: base.join(config.dump_file()),
            snapshot_dir: base.join(config.snapshot_dir()),
            schedule: SnapshotSchedule::new(config.snapshot_interval(), config.time_horizon()),
            next_slot: 0,
        }
    }

    pub fn rolling_path(&self) -> &Path {
        &self.rolling
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn schedule(&self) -> &SnapshotSchedule {
        &self.schedule
    }

    pub fn snapshot_path(&self, slot: usize) -> PathBuf {
        self.snapshot_dir.join(self.schedule.label(slot))
    }

    /// Time of the next snapshot still to be written.
    pub fn next_due(&self) -> Option<f64> {
        (self.next_slot < self.schedule.len()).then(|| self.schedule.time(self.next_slot))
    }

    /// Resume from the rolling file when it restores, otherwise initialize
    /// the interface. Every participant calls this.
    pub fn start<S: Solver, C: Communicator>(
        &mut self,
        solver: &mut S,
        shape: &InterfaceShape,
        comm: &C,
    ) -> ControlResult<StartMode> {
        if comm.is_root() {
            std::fs::create_dir_all(&self.snapshot_dir)?;
        }

        if self.rolling.exists() {
            match solver.restore(&self.rolling)? {
                Some(clock) => {
                    info!(
                        path = %self.rolling.display(),
                        step = clock.step,
                        time = clock.time,
                        "resuming from restart file"
                    );
                    self.skip_to(clock.time);
                    return Ok(StartMode::Resumed(clock));
                }
                None => warn!(
                    "Restart file '{}' could not be restored, starting fresh",
                    self.rolling.display()
                ),
            }
        }

        solver.initialize_interface(shape)?;
        self.next_slot = 0;
        Ok(StartMode::Fresh)
    }

    /// First slot not strictly before `time`. A snapshot at exactly the
    /// restored time is retried; an existing file is left alone.
    fn skip_to(&mut self, time: f64) {
        let tol = 1e-9 * self.schedule.interval();
        self.next_slot = (0..self.schedule.len())
            .find(|&k| self.schedule.time(k) >= time - tol)
            .unwrap_or(self.schedule.len());
    }

    /// Per-step checkpointing at simulated time `time`.
    ///
    /// Returns the snapshot written this step, if any.
    pub fn on_step<S: Solver, C: Communicator>(
        &mut self,
        solver: &mut S,
        time: f64,
        comm: &C,
    ) -> ControlResult<Option<PathBuf>> {
        if comm.is_root() {
            solver.dump(&self.rolling)?;
        }

        if !self.schedule.is_due(self.next_slot, time) {
            return Ok(None);
        }
        let mut slot = self.next_slot;
        while self.schedule.is_due(slot + 1, time) {
            slot += 1;
        }
        if slot > self.next_slot {
            warn!(
                skipped = slot - self.next_slot,
                "Step crossed several snapshot times, writing {} only",
                self.schedule.label(slot)
            );
        }
        self.next_slot = slot + 1;

        if !comm.is_root() {
            return Ok(None);
        }
        let path = self.snapshot_path(slot);
        if path.exists() {
            warn!("Snapshot '{}' already exists, not overwriting", path.display());
            return Ok(None);
        }
        solver.dump(&path)?;
        Ok(Some(path))
    }
}
