//! vf-results: monitor log, run summary and their text formats.

pub mod format;
pub mod hash;
pub mod log;
pub mod summary;

pub use format::{c_exp, c_general};
pub use hash::config_fingerprint;
pub use log::{COLUMNS, MonitorLog, MonitorRecord, header_line, read_log};
pub use summary::{RunSummary, load_summary, summary_line, write_summary};

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Failed to open log file: {path}")]
    LogOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write log file: {path}")]
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
