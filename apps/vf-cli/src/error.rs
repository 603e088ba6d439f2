use std::path::PathBuf;
use thiserror::Error;
use vf_config::ConfigError;
use vf_control::ControlError;
use vf_results::ResultsError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Control(#[from] ControlError),

    #[error("{0}")]
    Results(#[from] ResultsError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Replay log '{path}' has no records")]
    EmptyReplay { path: PathBuf },

    #[error("Replay log '{path}' is also this run's monitor log")]
    ReplayOverwrite { path: PathBuf },
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Physical invariant failures abort the process instead of exiting.
    pub fn is_invariant(&self) -> bool {
        matches!(self, CliError::Control(e) if e.is_invariant())
    }
}
