//! Time-stepping loop around [`SimulationController`].

use crate::controller::{SimulationController, StepInfo, StepOutcome};
use crate::error::{ControlError, ControlResult, SolverError};
use crate::monitor::MonitorState;
use crate::solver::Solver;
use tracing::{info, warn};
use vf_core::Communicator;
use vf_results::RunSummary;

/// Options for driven runs.
#[derive(Clone, Debug)]
pub struct DriverOptions {
    /// Maximum number of steps taken by this process (safety limit)
    pub max_steps: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            max_steps: 10_000_000,
        }
    }
}

/// Progress snapshot passed to the callback after each completed step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepProgress {
    pub step: usize,
    pub sim_time: f64,
    pub t_end: f64,
    pub fraction_complete: f64,
    pub kinetic_energy: Option<f64>,
    pub elapsed_wall_s: f64,
}

/// Why the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The monitor reached a terminal state.
    Monitor(MonitorState),
    /// `max_steps` was hit first.
    StepLimit,
    /// The solver had no further steps to give.
    SolverExhausted,
}

impl RunOutcome {
    pub fn label(self) -> &'static str {
        match self {
            RunOutcome::Monitor(state) => state.label(),
            RunOutcome::StepLimit => "step_limit",
            RunOutcome::SolverExhausted => "solver_exhausted",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Step index of the last monitored state.
    pub steps: usize,
    pub final_time: f64,
    pub resumed: bool,
    /// Present on the root participant.
    pub summary: Option<RunSummary>,
}

/// Run until the monitor stops the simulation.
pub fn run<S: Solver, C: Communicator>(
    controller: &mut SimulationController<'_, C>,
    solver: &mut S,
    opts: &DriverOptions,
) -> ControlResult<RunReport> {
    run_with_progress(controller, solver, opts, None)
}

pub fn run_with_progress<S: Solver, C: Communicator>(
    controller: &mut SimulationController<'_, C>,
    solver: &mut S,
    opts: &DriverOptions,
    mut progress: Option<&mut dyn FnMut(StepProgress)>,
) -> ControlResult<RunReport> {
    if opts.max_steps == 0 {
        return Err(ControlError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    let mode = controller.start(solver)?;
    let clock = mode.clock();
    let t_end = controller.config().time_horizon();
    let dt_max = controller.config().max_time_step();
    let started = std::time::Instant::now();

    let mut step = clock.step;
    let mut t = clock.time;
    let mut dt = 0.0;
    let mut taken = 0;

    let outcome = loop {
        let info = StepInfo { step, dt, time: t };
        if let StepOutcome::Stop(state) = controller.on_step(solver, info)? {
            break RunOutcome::Monitor(state);
        }

        if let Some(cb) = progress.as_deref_mut() {
            cb(StepProgress {
                step,
                sim_time: t,
                t_end,
                fraction_complete: (t / t_end).clamp(0.0, 1.0),
                kinetic_energy: controller.log().and_then(|l| l.last()).map(|r| r.kinetic_energy),
                elapsed_wall_s: started.elapsed().as_secs_f64(),
            });
        }

        if taken >= opts.max_steps {
            warn!(max_steps = opts.max_steps, time = t, "step limit reached before the run ended");
            break RunOutcome::StepLimit;
        }

        let proposed = clip_step(dt_max, t, controller.next_event_time(), t_end);
        dt = match solver.advance(proposed) {
            Ok(actual) => actual,
            Err(SolverError::Exhausted) => {
                info!(step, time = t, "solver exhausted");
                break RunOutcome::SolverExhausted;
            }
            Err(e) => return Err(e.into()),
        };
        t += dt;
        step += 1;
        taken += 1;
    };

    let summary = controller.finish(outcome.label(), step, t)?;
    Ok(RunReport {
        outcome,
        steps: step,
        final_time: t,
        resumed: mode.is_resumed(),
        summary,
    })
}

/// Largest step not overshooting the next snapshot time or the horizon.
///
/// Targets closer than round-off are ignored so the loop never proposes a
/// vanishing step.
fn clip_step(dt_max: f64, t: f64, next_event: Option<f64>, t_end: f64) -> f64 {
    let eps = 1e-12 * t_end.max(1.0);
    [next_event, Some(t_end)]
        .into_iter()
        .flatten()
        .map(|target| target - t)
        .filter(|gap| *gap > eps)
        .fold(dt_max, f64::min)
}
