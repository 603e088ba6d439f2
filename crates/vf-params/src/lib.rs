//! vf-params: flat `key=value` run parameters with typed, defaulted lookups.
//!
//! A [`ParameterStore`] is built once per run from a [`ParamSource`] (a file
//! named on the command line, `case.params` by default, or inline literals)
//! and lazily parsed on first access. Lookups never fail: malformed or
//! missing values fall back to the caller's default with a warning.

pub mod error;
pub mod source;
pub mod store;
pub mod typed;

pub use error::{LoadError, ParamResult};
pub use source::{DEFAULT_PARAM_FILE, ParamSource, select_source_from_args};
pub use store::{DEFAULT_CAPACITY, ParameterEntry, ParameterStore};
pub use typed::{parse_bool, parse_double, parse_int};
