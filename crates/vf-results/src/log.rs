//! Per-run monitor log.
//!
//! Layout of `c<CaseNo>-log`:
//!
//! ```text
//! Case 1000, Level 12, De 1e+30, Ec 1, Oh 0.01, Oha 0.0001
//! i dt t ke hm vm
//! 0 1e-05 0 0 9.50000e-01 0.00000e+00
//! ...
//! The kinetic energy blew up. Stopping simulation
//! ```
//!
//! Every write opens the file, appends and closes it again, so a crash never
//! leaves buffered records behind.

use crate::format::{c_exp, c_general};
use crate::{ResultsError, ResultsResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vf_config::RunConfig;

/// Column header line.
pub const COLUMNS: &str = "i dt t ke hm vm";

/// One monitored step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    pub step: usize,
    pub dt: f64,
    pub time: f64,
    pub kinetic_energy: f64,
    /// Lowest point of the interface.
    pub min_interface_height: f64,
    /// Largest velocity magnitude on the mesh.
    pub max_velocity_norm: f64,
}

impl MonitorRecord {
    /// `"%d %g %g %g %6.5e %6.5e"`.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.step,
            c_general(self.dt),
            c_general(self.time),
            c_general(self.kinetic_energy),
            c_exp(self.min_interface_height, 5),
            c_exp(self.max_velocity_norm, 5),
        )
    }

    /// Parse a record line; header and message lines yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let step = fields.next()?.parse().ok()?;
        let mut next = || -> Option<f64> { fields.next()?.parse().ok() };
        let record = Self {
            step,
            dt: next()?,
            time: next()?,
            kinetic_energy: next()?,
            min_interface_height: next()?,
            max_velocity_norm: next()?,
        };
        if fields.next().is_some() {
            return None;
        }
        Some(record)
    }
}

/// First line of a fresh log, naming the case and its physical parameters.
pub fn header_line(config: &RunConfig) -> String {
    let p = config.params();
    format!(
        "Case {}, Level {}, De {}, Ec {}, Oh {}, Oha {}",
        p.case_id,
        p.max_level,
        c_general(p.deborah),
        c_general(p.elasto_capillary),
        c_general(p.solvent_ohnesorge),
        c_general(p.gas_ohnesorge),
    )
}

/// Append-only monitor log, mirrored to a console stream.
///
/// Only the designated rank owns one.
pub struct MonitorLog {
    path: PathBuf,
    console: Box<dyn Write + Send>,
    records: Vec<MonitorRecord>,
}

impl MonitorLog {
    /// Start a fresh log at `path`, replacing any previous content.
    pub fn create(
        path: impl Into<PathBuf>,
        header: &str,
        console: Box<dyn Write + Send>,
    ) -> ResultsResult<Self> {
        let path = path.into();
        let mut file = File::create(&path).map_err(|source| ResultsError::LogOpen {
            path: path.clone(),
            source,
        })?;
        writeln!(file, "{header}\n{COLUMNS}").map_err(|source| ResultsError::LogWrite {
            path: path.clone(),
            source,
        })?;

        let mut log = Self {
            path,
            console,
            records: Vec::new(),
        };
        log.echo(COLUMNS);
        Ok(log)
    }

    /// Continue the log of a resumed run; existing lines are kept.
    ///
    /// A missing or empty log is started like [`MonitorLog::create`], with
    /// `header` and the column line.
    pub fn resume(
        path: impl Into<PathBuf>,
        header: &str,
        console: Box<dyn Write + Send>,
    ) -> ResultsResult<Self> {
        let path = path.into();
        let blank = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if blank {
            return Self::create(path, header, console);
        }
        open_append(&path)?;
        Ok(Self {
            path,
            console,
            records: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended by this process, oldest first.
    pub fn records(&self) -> &[MonitorRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&MonitorRecord> {
        self.records.last()
    }

    pub fn append(&mut self, record: MonitorRecord) -> ResultsResult<()> {
        let line = record.to_line();
        self.write_line(&line)?;
        self.echo(&line);
        self.records.push(record);
        Ok(())
    }

    /// Free-text line, e.g. a stop reason.
    pub fn note(&mut self, message: &str) -> ResultsResult<()> {
        self.echo(message);
        self.write_line(message)
    }

    fn write_line(&self, line: &str) -> ResultsResult<()> {
        let mut file = open_append(&self.path)?;
        writeln!(file, "{line}").map_err(|source| ResultsError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn echo(&mut self, line: &str) {
        // console output is best effort
        let _ = writeln!(self.console, "{line}");
        let _ = self.console.flush();
    }
}

impl std::fmt::Debug for MonitorLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorLog")
            .field("path", &self.path)
            .field("records", &self.records.len())
            .finish()
    }
}

fn open_append(path: &Path) -> ResultsResult<File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| ResultsError::LogOpen {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the records of an existing log, skipping header and message lines.
pub fn read_log(path: &Path) -> ResultsResult<Vec<MonitorRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ResultsError::LogOpen {
            path: path.to_path_buf(),
            source,
        },
        _ => ResultsError::Io(source),
    })?;
    Ok(content.lines().filter_map(MonitorRecord::parse_line).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize) -> MonitorRecord {
        MonitorRecord {
            step,
            dt: 1e-5,
            time: step as f64 * 1e-5,
            kinetic_energy: 2.5e-3,
            min_interface_height: 0.95,
            max_velocity_norm: 0.0,
        }
    }

    #[test]
    fn record_line_format() {
        assert_eq!(
            record(3).to_line(),
            "3 1e-05 3e-05 0.0025 9.50000e-01 0.00000e+00"
        );
    }

    #[test]
    fn record_line_parses_back() {
        let r = record(42);
        let parsed = MonitorRecord::parse_line(&r.to_line()).unwrap();
        assert_eq!(parsed.step, 42);
        assert!((parsed.kinetic_energy - r.kinetic_energy).abs() < 1e-12);
    }

    #[test]
    fn non_record_lines_are_skipped() {
        assert!(MonitorRecord::parse_line(COLUMNS).is_none());
        assert!(MonitorRecord::parse_line("Case 1000, Level 12, De 1e+30").is_none());
        assert!(MonitorRecord::parse_line("kinetic energy too small now! Stopping!").is_none());
        assert!(MonitorRecord::parse_line("1 2 3 4 5 6 7").is_none());
        assert!(MonitorRecord::parse_line("").is_none());
    }
}
