//! vf-config: validated run parameters for the thinning case.
//!
//! [`RunParameters`] is the raw, defaulted view read from a
//! [`vf_params::ParameterStore`]. [`RunParameters::validate`] checks every
//! field at once and produces the immutable [`RunConfig`] used for the rest of
//! the run, together with the derived [`PhaseProperties`].

pub mod error;
pub mod keys;
pub mod phase;
pub mod run_config;
mod validate;

pub use error::{ConfigError, ConfigResult, Violation};
pub use phase::{ELASTIC_LIMIT_DEBORAH, Phase, PhaseProperties, Relaxation};
pub use run_config::{
    DOMAIN_SIZE, ErrorTolerances, INITIAL_LEVEL, MAX_SNAPSHOTS, RunConfig, RunParameters,
};
