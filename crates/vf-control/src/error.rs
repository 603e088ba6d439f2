//! Error types for run control.

use thiserror::Error;
use vf_core::CoreError;
use vf_results::ResultsError;

/// Errors reported by a [`crate::Solver`] backend.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// The backend cannot produce further steps (e.g. end of a replayed run).
    #[error("Solver has no further steps")]
    Exhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;

/// Errors encountered while controlling a run.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A physical invariant failed; there is no defined recovery.
    #[error("{0}")]
    Invariant(CoreError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;

impl ControlError {
    pub fn is_invariant(&self) -> bool {
        matches!(self, ControlError::Invariant(_))
    }
}
