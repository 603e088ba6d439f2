//! Solver backend that re-plays a recorded monitor log.
//!
//! Each record becomes one step of a single-cell "mesh" carrying the recorded
//! kinetic energy, so the whole control layer (refinement calls, monitor,
//! checkpoints) runs against an existing simulation's history.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use vf_control::{
    AdaptRequest, AdaptStats, CellSample, InterfaceShape, Solver, SolverClock, SolverError,
    SolverResult,
};
use vf_results::{MonitorRecord, read_log};

/// Checkpoint contents: where in which log the replay stood.
#[derive(Debug, Serialize, Deserialize)]
struct ReplayCursor {
    source: PathBuf,
    cursor: usize,
}

#[derive(Debug)]
pub struct ReplaySolver {
    source: PathBuf,
    records: Vec<MonitorRecord>,
    cursor: usize,
    cells: Vec<CellSample>,
}

impl ReplaySolver {
    pub fn open(path: &Path) -> CliResult<Self> {
        let records = read_log(path)?;
        if records.is_empty() {
            return Err(CliError::EmptyReplay {
                path: path.to_path_buf(),
            });
        }
        let mut solver = Self {
            source: path.to_path_buf(),
            records,
            cursor: 0,
            cells: Vec::new(),
        };
        solver.refresh();
        Ok(solver)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current(&self) -> &MonitorRecord {
        &self.records[self.cursor]
    }

    fn refresh(&mut self) {
        self.cells = vec![CellSample::carrying(self.records[self.cursor].kinetic_energy)];
    }
}

impl Solver for ReplaySolver {
    fn initialize_interface(&mut self, _shape: &InterfaceShape) -> SolverResult<()> {
        self.cursor = 0;
        self.refresh();
        Ok(())
    }

    fn restore(&mut self, path: &Path) -> SolverResult<Option<SolverClock>> {
        let text = std::fs::read_to_string(path)?;
        let saved: ReplayCursor = match serde_json::from_str(&text) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Restart file '{}' is not a replay cursor: {e}", path.display());
                return Ok(None);
            }
        };
        if saved.source != self.source || saved.cursor >= self.records.len() {
            warn!(
                "Restart file '{}' belongs to a different replay",
                path.display()
            );
            return Ok(None);
        }
        self.cursor = saved.cursor;
        self.refresh();
        let r = self.current();
        Ok(Some(SolverClock {
            step: r.step,
            time: r.time,
        }))
    }

    fn dump(&mut self, path: &Path) -> SolverResult<()> {
        let cursor = ReplayCursor {
            source: self.source.clone(),
            cursor: self.cursor,
        };
        let json = serde_json::to_string(&cursor).map_err(|e| SolverError::Backend {
            message: e.to_string(),
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn update_curvature(&mut self) -> SolverResult<()> {
        Ok(())
    }

    fn adapt_wavelet(&mut self, _request: &AdaptRequest) -> SolverResult<AdaptStats> {
        Ok(AdaptStats::default())
    }

    fn local_cells(&self) -> &[CellSample] {
        &self.cells
    }

    fn min_interface_height(&self) -> f64 {
        self.current().min_interface_height
    }

    fn max_velocity_norm(&self) -> f64 {
        self.current().max_velocity_norm
    }

    /// Ignores the proposed step: the recorded time line is replayed as is.
    fn advance(&mut self, _dt: f64) -> SolverResult<f64> {
        if self.cursor + 1 >= self.records.len() {
            return Err(SolverError::Exhausted);
        }
        let before = self.records[self.cursor].time;
        self.cursor += 1;
        self.refresh();
        Ok(self.records[self.cursor].time - before)
    }
}
