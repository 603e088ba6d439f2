//! vf-core: shared foundation for veflow.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (tolerant time comparisons)
//! - comm (participant rank and the collective sum used by the monitor)
//! - timing (wall-clock timer for run summaries)

pub mod comm;
pub mod error;
pub mod numeric;
pub mod timing;

pub use comm::{Communicator, ROOT_RANK, SerialComm};
pub use error::CoreError;
pub use numeric::{Tolerances, nearly_equal, reached};
pub use timing::Timer;
