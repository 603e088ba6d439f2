use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invariant violated: {what} (value={value})")]
    Invariant { what: &'static str, value: f64 },
}
