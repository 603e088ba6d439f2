//! End-of-run summary.

use crate::ResultsResult;
use crate::format::c_exp;
use crate::hash::config_fingerprint;
use crate::log::MonitorRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vf_config::RunConfig;

/// `Case <id>, Level <L>, De <De>, Ec <Ec>, Oh <Oh>` with `%2.1e` numbers.
pub fn summary_line(config: &RunConfig) -> String {
    let p = config.params();
    format!(
        "Case {}, Level {}, De {}, Ec {}, Oh {}",
        p.case_id,
        p.max_level,
        c_exp(p.deborah, 1),
        c_exp(p.elasto_capillary, 1),
        c_exp(p.solvent_ohnesorge, 1),
    )
}

/// Machine-readable record of how a run ended, `c<CaseNo>-summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub case_id: i32,
    /// Stop reason label, e.g. `horizon_reached` or `blown_up`.
    pub outcome: String,
    pub steps: usize,
    pub final_time: f64,
    pub resumed: bool,
    pub last_record: Option<MonitorRecord>,
    pub wall_time_s: f64,
    pub finished_at: String,
    pub config_fingerprint: String,
    pub config: serde_json::Value,
}

impl RunSummary {
    pub fn new(
        config: &RunConfig,
        outcome: impl Into<String>,
        steps: usize,
        final_time: f64,
        resumed: bool,
        last_record: Option<MonitorRecord>,
        wall_time_s: f64,
    ) -> ResultsResult<Self> {
        Ok(Self {
            case_id: config.case_id(),
            outcome: outcome.into(),
            steps,
            final_time,
            resumed,
            last_record,
            wall_time_s,
            finished_at: chrono::Utc::now().to_rfc3339(),
            config_fingerprint: config_fingerprint(config)?,
            config: serde_json::to_value(config)?,
        })
    }
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> ResultsResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_summary(path: &Path) -> ResultsResult<RunSummary> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_config::RunParameters;

    #[test]
    fn summary_line_uses_short_exponents() {
        let config = RunParameters::default().validate().unwrap();
        assert_eq!(
            summary_line(&config),
            "Case 1000, Level 12, De 1.0e+30, Ec 1.0e+00, Oh 1.0e-02"
        );
    }
}
