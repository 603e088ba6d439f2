//! Error types for parameter loading.

use std::path::PathBuf;

/// Result type for parameter loading.
pub type ParamResult<T> = Result<T, LoadError>;

/// Errors surfaced by an explicit [`crate::ParameterStore::load`].
///
/// Neither variant is fatal to a run: the store is left empty and every
/// lookup returns its default.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Parameter file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read parameter file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
