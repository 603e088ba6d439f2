//! Scripted solver and scratch directories shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use vf_config::{RunConfig, RunParameters};
use vf_control::{
    AdaptRequest, AdaptStats, CellSample, InterfaceShape, Solver, SolverClock, SolverError,
    SolverResult,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Init,
    Restore(PathBuf),
    Dump { path: PathBuf, step: usize },
    Curvature,
    Adapt,
    Advance(f64),
}

/// Plays back a kinetic energy per step; step `i` reports `energies[i]`
/// (the last value repeats).
pub struct ScriptedSolver {
    pub energies: Vec<f64>,
    pub calls: Vec<Call>,
    pub step: usize,
    pub time: f64,
    /// `advance` fails with `Exhausted` after this many steps.
    pub exhaust_after: Option<usize>,
    cells: Vec<CellSample>,
}

impl ScriptedSolver {
    pub fn new(energies: Vec<f64>) -> Self {
        let mut solver = Self {
            energies,
            calls: Vec::new(),
            step: 0,
            time: 0.0,
            exhaust_after: None,
            cells: Vec::new(),
        };
        solver.refresh();
        solver
    }

    pub fn constant(ke: f64) -> Self {
        Self::new(vec![ke])
    }

    fn refresh(&mut self) {
        let ke = self
            .energies
            .get(self.step)
            .or(self.energies.last())
            .copied()
            .unwrap_or(0.0);
        self.cells = vec![CellSample::carrying(ke)];
    }

    pub fn dumps(&self) -> Vec<(PathBuf, usize)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Dump { path, step } => Some((path.clone(), *step)),
                _ => None,
            })
            .collect()
    }
}

impl Solver for ScriptedSolver {
    fn initialize_interface(&mut self, _shape: &InterfaceShape) -> SolverResult<()> {
        self.calls.push(Call::Init);
        Ok(())
    }

    fn restore(&mut self, path: &Path) -> SolverResult<Option<SolverClock>> {
        self.calls.push(Call::Restore(path.to_path_buf()));
        let text = std::fs::read_to_string(path)?;
        let mut parts = text.split_whitespace();
        let step = parts.next().and_then(|s| s.parse().ok());
        let time = parts.next().and_then(|s| s.parse().ok());
        match (step, time) {
            (Some(step), Some(time)) => {
                self.step = step;
                self.time = time;
                self.refresh();
                Ok(Some(SolverClock { step, time }))
            }
            _ => Ok(None),
        }
    }

    fn dump(&mut self, path: &Path) -> SolverResult<()> {
        self.calls.push(Call::Dump {
            path: path.to_path_buf(),
            step: self.step,
        });
        std::fs::write(path, format!("{} {}", self.step, self.time))?;
        Ok(())
    }

    fn update_curvature(&mut self) -> SolverResult<()> {
        self.calls.push(Call::Curvature);
        Ok(())
    }

    fn adapt_wavelet(&mut self, _request: &AdaptRequest) -> SolverResult<AdaptStats> {
        self.calls.push(Call::Adapt);
        Ok(AdaptStats::default())
    }

    fn local_cells(&self) -> &[CellSample] {
        &self.cells
    }

    fn min_interface_height(&self) -> f64 {
        0.95
    }

    fn max_velocity_norm(&self) -> f64 {
        self.cells.first().map_or(0.0, |c| c.ux)
    }

    fn advance(&mut self, dt: f64) -> SolverResult<f64> {
        if self.exhaust_after.is_some_and(|n| self.step >= n) {
            return Err(SolverError::Exhausted);
        }
        self.calls.push(Call::Advance(dt));
        self.step += 1;
        self.time += dt;
        self.refresh();
        Ok(dt)
    }
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("vf_control_tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn config(tmax: f64, dtmax: f64, tsnap: f64) -> RunConfig {
    RunParameters {
        time_horizon: tmax,
        max_time_step: dtmax,
        snapshot_interval: tsnap,
        ..RunParameters::default()
    }
    .validate()
    .unwrap()
}
