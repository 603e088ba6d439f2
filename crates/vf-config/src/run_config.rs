//! Raw run parameters and the validated run configuration.

use crate::error::ConfigResult;
use crate::keys;
use crate::phase::PhaseProperties;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use vf_params::ParameterStore;

/// Length of the periodic domain (one wavelength of the perturbation).
pub const DOMAIN_SIZE: f64 = std::f64::consts::TAU;

/// Refinement level of the uniform grid the solver starts from.
pub const INITIAL_LEVEL: i32 = 8;

/// Most snapshot slots a run may schedule (`tmax / tsnap`).
pub const MAX_SNAPSHOTS: usize = 1_000_000_000;

/// Gas Ohnesorge number used when `Oha` is not given, as a fraction of `Oh`.
const GAS_OHNESORGE_FACTOR: f64 = 1e-2;

/// Wavelet error tolerances for the adapted fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ErrorTolerances {
    /// Volume fraction.
    pub interface: f64,
    /// Each velocity component.
    pub velocity: f64,
    /// Each conformation tensor component.
    pub conformation: f64,
    /// Interface curvature.
    pub curvature: f64,
}

impl Default for ErrorTolerances {
    fn default() -> Self {
        Self {
            interface: 1e-3,
            velocity: 1e-3,
            conformation: 1e-3,
            curvature: 1e-6,
        }
    }
}

/// Defaulted parameters as read from the parameter file, not yet checked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunParameters {
    pub case_id: i32,
    pub max_level: i32,
    pub min_level: i32,
    pub time_horizon: f64,
    pub solvent_ohnesorge: f64,
    pub gas_ohnesorge: f64,
    pub deborah: f64,
    pub elasto_capillary: f64,
    pub max_time_step: f64,
    /// Gas to liquid density ratio.
    pub gas_density: f64,
    pub snapshot_interval: f64,
    /// Amplitude of the initial interface perturbation.
    pub perturbation: f64,
    pub tolerances: ErrorTolerances,
    pub dump_file: PathBuf,
    pub snapshot_dir: PathBuf,
    pub replay_log: Option<PathBuf>,
}

impl Default for RunParameters {
    fn default() -> Self {
        let solvent_ohnesorge = 1e-2;
        Self {
            case_id: 1000,
            max_level: 12,
            min_level: 6,
            time_horizon: 200.0,
            solvent_ohnesorge,
            gas_ohnesorge: GAS_OHNESORGE_FACTOR * solvent_ohnesorge,
            deborah: 1e30,
            elasto_capillary: 1.0,
            max_time_step: 1e-5,
            gas_density: 1e-2,
            snapshot_interval: 1e-3,
            perturbation: 0.05,
            tolerances: ErrorTolerances::default(),
            dump_file: PathBuf::from("dump"),
            snapshot_dir: PathBuf::from("intermediate"),
            replay_log: None,
        }
    }
}

impl RunParameters {
    /// Read every known key, falling back to the defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let d = Self::default();
        let solvent_ohnesorge = store.get_double(keys::OH, d.solvent_ohnesorge);
        let params = Self {
            case_id: store.get_int(keys::CASE_NO, d.case_id),
            max_level: store.get_int(keys::MAX_LEVEL, d.max_level),
            min_level: store.get_int(keys::MIN_LEVEL, d.min_level),
            time_horizon: store.get_double(keys::TMAX, d.time_horizon),
            solvent_ohnesorge,
            gas_ohnesorge: store.get_double(keys::OHA, GAS_OHNESORGE_FACTOR * solvent_ohnesorge),
            deborah: store.get_double(keys::DE, d.deborah),
            elasto_capillary: store.get_double(keys::EC, d.elasto_capillary),
            max_time_step: store.get_double(keys::DTMAX, d.max_time_step),
            gas_density: store.get_double(keys::RHO2, d.gas_density),
            snapshot_interval: store.get_double(keys::TSNAP, d.snapshot_interval),
            perturbation: store.get_double(keys::EPSILON, d.perturbation),
            tolerances: ErrorTolerances {
                interface: store.get_double(keys::F_ERR, d.tolerances.interface),
                velocity: store.get_double(keys::VEL_ERR, d.tolerances.velocity),
                conformation: store.get_double(keys::A_ERR, d.tolerances.conformation),
                curvature: store.get_double(keys::K_ERR, d.tolerances.curvature),
            },
            dump_file: store.get(keys::DUMP_FILE).map_or(d.dump_file, PathBuf::from),
            snapshot_dir: store
                .get(keys::SNAPSHOT_DIR)
                .map_or(d.snapshot_dir, PathBuf::from),
            replay_log: store.get(keys::REPLAY_LOG).map(PathBuf::from),
        };
        debug!(source = %store.source(), ?params, "run parameters read");
        params
    }

    /// Check every parameter and freeze the configuration.
    ///
    /// All violations are reported together.
    pub fn validate(self) -> ConfigResult<RunConfig> {
        crate::validate::check(&self)?;
        let phases = PhaseProperties::derive(
            self.solvent_ohnesorge,
            self.gas_ohnesorge,
            self.deborah,
            self.elasto_capillary,
            self.gas_density,
        );
        Ok(RunConfig {
            params: self,
            phases,
        })
    }
}

/// Validated, immutable configuration for one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunConfig {
    params: RunParameters,
    phases: PhaseProperties,
}

impl RunConfig {
    /// Read and validate in one go.
    pub fn from_store(store: &ParameterStore) -> ConfigResult<Self> {
        RunParameters::from_store(store).validate()
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    pub fn phases(&self) -> &PhaseProperties {
        &self.phases
    }

    pub fn case_id(&self) -> i32 {
        self.params.case_id
    }

    pub fn max_level(&self) -> i32 {
        self.params.max_level
    }

    pub fn min_level(&self) -> i32 {
        self.params.min_level
    }

    pub fn time_horizon(&self) -> f64 {
        self.params.time_horizon
    }

    pub fn max_time_step(&self) -> f64 {
        self.params.max_time_step
    }

    pub fn snapshot_interval(&self) -> f64 {
        self.params.snapshot_interval
    }

    pub fn tolerances(&self) -> &ErrorTolerances {
        &self.params.tolerances
    }

    pub fn dump_file(&self) -> &Path {
        &self.params.dump_file
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.params.snapshot_dir
    }

    pub fn replay_log(&self) -> Option<&Path> {
        self.params.replay_log.as_deref()
    }

    /// Per-run monitor log, `c<CaseNo>-log`.
    pub fn log_file_name(&self) -> String {
        format!("c{}-log", self.params.case_id)
    }

    /// Per-run summary, `c<CaseNo>-summary.json`.
    pub fn summary_file_name(&self) -> String {
        format!("c{}-summary.json", self.params.case_id)
    }
}
