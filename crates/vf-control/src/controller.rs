//! Per-step orchestration of refinement, checkpointing and monitoring.

use crate::checkpoint::{Checkpointer, StartMode};
use crate::error::ControlResult;
use crate::monitor::{
    MonitorState, MonitorThresholds, SimulationState, TerminationMonitor, kinetic_energy,
};
use crate::refinement::RefinementPolicy;
use crate::solver::{InterfaceShape, Solver};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use vf_config::RunConfig;
use vf_core::{Communicator, Timer};
use vf_results::{MonitorLog, MonitorRecord, RunSummary, header_line, summary_line, write_summary};

/// Clock of the step that just completed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInfo {
    pub step: usize,
    /// Step size that led to this state (0 before the first step).
    pub dt: f64,
    pub time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Stop between steps; the state is terminal.
    Stop(MonitorState),
}

/// Runs the control layer once per solver step.
///
/// Identical on every participant; only the root one owns the monitor log
/// and writes files.
pub struct SimulationController<'a, C: Communicator> {
    config: &'a RunConfig,
    comm: C,
    output_dir: PathBuf,
    console: Option<Box<dyn Write + Send>>,
    refinement: RefinementPolicy,
    checkpointer: Checkpointer,
    monitor: TerminationMonitor,
    log: Option<MonitorLog>,
    last_record: Option<MonitorRecord>,
    resumed: bool,
    timer: Timer,
}

impl<'a, C: Communicator> SimulationController<'a, C> {
    pub fn new(config: &'a RunConfig, comm: C) -> Self {
        Self {
            config,
            comm,
            output_dir: PathBuf::from("."),
            console: None,
            refinement: RefinementPolicy::from_config(config),
            checkpointer: Checkpointer::new(config, Path::new(".")),
            monitor: TerminationMonitor::new(config.time_horizon(), MonitorThresholds::default()),
            log: None,
            last_record: None,
            resumed: false,
            timer: Timer::start("run"),
        }
    }

    /// Directory for the log, summary and relative checkpoint paths.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self.checkpointer = Checkpointer::new(self.config, &self.output_dir);
        self
    }

    pub fn with_thresholds(mut self, thresholds: MonitorThresholds) -> Self {
        self.monitor = TerminationMonitor::new(self.config.time_horizon(), thresholds);
        self
    }

    /// Stream the monitor columns are mirrored to (default: stderr).
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn config(&self) -> &RunConfig {
        self.config
    }

    pub fn communicator(&self) -> &C {
        &self.comm
    }

    pub fn checkpointer(&self) -> &Checkpointer {
        &self.checkpointer
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn log(&self) -> Option<&MonitorLog> {
        self.log.as_ref()
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(self.config.log_file_name())
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(self.config.summary_file_name())
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Resume or initialize the solver, then open the monitor log.
    ///
    /// A log that cannot be opened is fatal.
    pub fn start<S: Solver>(&mut self, solver: &mut S) -> ControlResult<StartMode> {
        self.timer.lap();
        let shape = InterfaceShape::from_config(self.config);
        let mode = self.checkpointer.start(solver, &shape, &self.comm)?;
        self.resumed = mode.is_resumed();

        if self.comm.is_root() {
            let console = self
                .console
                .take()
                .unwrap_or_else(|| Box::new(std::io::stderr()) as Box<dyn Write + Send>);
            let path = self.log_path();
            let header = header_line(self.config);
            let log = match mode {
                StartMode::Fresh => MonitorLog::create(&path, &header, console),
                StartMode::Resumed(_) => MonitorLog::resume(&path, &header, console),
            };
            match log {
                Ok(log) => self.log = Some(log),
                Err(e) => {
                    error!("Cannot open monitor log '{}': {e}", path.display());
                    return Err(e.into());
                }
            }
        }

        info!(
            case = self.config.case_id(),
            resumed = self.resumed,
            participants = self.comm.size(),
            "run started"
        );
        Ok(mode)
    }

    /// Time of the next scheduled snapshot, for step-size clipping.
    pub fn next_event_time(&self) -> Option<f64> {
        self.checkpointer.next_due()
    }

    /// Once per step, after the solver advanced: refine, checkpoint, then
    /// measure and log before deciding whether to stop.
    ///
    /// The rolling file and any due snapshot are written before the
    /// monitor runs, so a stopping step is always on disk.
    pub fn on_step<S: Solver>(&mut self, solver: &mut S, info: StepInfo) -> ControlResult<StepOutcome> {
        self.refinement.apply(solver)?;
        self.checkpointer.on_step(solver, info.time, &self.comm)?;

        let ke = kinetic_energy(solver.local_cells(), self.config.phases(), &self.comm);
        let record = MonitorRecord {
            step: info.step,
            dt: info.dt,
            time: info.time,
            kinetic_energy: ke,
            min_interface_height: solver.min_interface_height(),
            max_velocity_norm: solver.max_velocity_norm(),
        };
        if let Some(log) = self.log.as_mut() {
            log.append(record)?;
        }
        self.last_record = Some(record);

        let state = self.monitor.observe(SimulationState {
            step: info.step,
            time: info.time,
            kinetic_energy: ke,
        })?;

        if let Some(message) = state.stop_message() {
            warn!(step = info.step, kinetic_energy = ke, "{message}");
            if let Some(log) = self.log.as_mut() {
                log.note(message)?;
            }
            return Ok(StepOutcome::Stop(state));
        }

        if state == MonitorState::HorizonReached {
            let line = summary_line(self.config);
            info!("{line}");
            if let Some(log) = self.log.as_mut() {
                log.note(&line)?;
            }
            return Ok(StepOutcome::Stop(state));
        }
        Ok(StepOutcome::Continue)
    }

    /// Write the run summary (root only).
    pub fn finish(
        &mut self,
        outcome: &str,
        steps: usize,
        final_time: f64,
    ) -> ControlResult<Option<RunSummary>> {
        if !self.comm.is_root() {
            return Ok(None);
        }
        let summary = RunSummary::new(
            self.config,
            outcome,
            steps,
            final_time,
            self.resumed,
            self.last_record,
            self.timer.elapsed_s(),
        )?;
        let path = self.summary_path();
        write_summary(&path, &summary)?;
        info!(path = %path.display(), outcome, "run summary written");
        Ok(Some(summary))
    }
}
