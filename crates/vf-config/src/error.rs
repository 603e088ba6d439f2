//! Error types for run configuration.

use std::fmt;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// One rejected parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.key, self.value, self.reason)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid run configuration: {}", join(.violations))]
    Invalid { violations: Vec<Violation> },
}

impl ConfigError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Invalid { violations } => violations,
        }
    }

    /// True if `key` is among the rejected parameters.
    pub fn rejects(&self, key: &str) -> bool {
        self.violations().iter().any(|v| v.key == key)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
