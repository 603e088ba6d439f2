//! Content fingerprint of a resolved configuration.

use crate::ResultsResult;
use sha2::{Digest, Sha256};
use vf_config::RunConfig;

/// SHA-256 over the JSON form of `config`, as lowercase hex.
///
/// Two runs with the same fingerprint were started from identical resolved
/// parameters, however the parameter files were written.
pub fn config_fingerprint(config: &RunConfig) -> ResultsResult<String> {
    let mut hasher = Sha256::new();
    let json = serde_json::to_string(config)?;
    hasher.update(json.as_bytes());
    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
