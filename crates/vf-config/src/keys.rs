//! Parameter file keys.

pub const CASE_NO: &str = "CaseNo";
pub const MAX_LEVEL: &str = "MAXlevel";
pub const TMAX: &str = "tmax";
pub const OH: &str = "Oh";
pub const OHA: &str = "Oha";
pub const DE: &str = "De";
pub const EC: &str = "Ec";
pub const DTMAX: &str = "dtmax";

pub const MIN_LEVEL: &str = "MINlevel";
pub const F_ERR: &str = "fErr";
pub const VEL_ERR: &str = "VelErr";
pub const A_ERR: &str = "AErr";
pub const K_ERR: &str = "KErr";
pub const TSNAP: &str = "tsnap";
pub const EPSILON: &str = "epsilon";
pub const RHO2: &str = "rho2";
pub const DUMP_FILE: &str = "DumpFile";
pub const SNAPSHOT_DIR: &str = "SnapshotDir";
pub const REPLAY_LOG: &str = "ReplayLog";
