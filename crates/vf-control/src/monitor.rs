//! Kinetic-energy based early termination.

use crate::error::{ControlError, ControlResult};
use crate::solver::CellSample;
use rayon::prelude::*;
use std::f64::consts::TAU;
use vf_config::PhaseProperties;
use vf_core::{Communicator, CoreError, Tolerances, reached};

/// Monitor state machine. `Running` is the only non-terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonitorState {
    #[default]
    Running,
    BlownUp,
    Stagnated,
    HorizonReached,
}

impl MonitorState {
    pub fn is_terminal(self) -> bool {
        self != MonitorState::Running
    }

    /// Early stop on a physically implausible energy.
    pub fn is_failure(self) -> bool {
        matches!(self, MonitorState::BlownUp | MonitorState::Stagnated)
    }

    pub fn label(self) -> &'static str {
        match self {
            MonitorState::Running => "running",
            MonitorState::BlownUp => "blown_up",
            MonitorState::Stagnated => "stagnated",
            MonitorState::HorizonReached => "horizon_reached",
        }
    }

    /// Line appended to the monitor log when the run stops early.
    pub fn stop_message(self) -> Option<&'static str> {
        match self {
            MonitorState::BlownUp => Some("The kinetic energy blew up. Stopping simulation"),
            MonitorState::Stagnated => Some("kinetic energy too small now! Stopping!"),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonitorThresholds {
    /// Kinetic energy above which the run has blown up.
    pub blow_up: f64,
    /// Kinetic energy below which nothing is happening any more.
    pub stagnation: f64,
    /// Failure checks start at the step after this one.
    pub warmup_steps: usize,
    /// Kinetic energies at or below this are not round-off.
    pub negative_tolerance: f64,
}

impl Default for MonitorThresholds {
    fn default() -> Self {
        Self {
            blow_up: 1e2,
            stagnation: 1e-8,
            warmup_steps: 10,
            negative_tolerance: -1e-10,
        }
    }
}

/// Observation fed to the monitor each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    pub step: usize,
    pub time: f64,
    pub kinetic_energy: f64,
}

/// Sum of `2*pi*y * rho(f) * |u|^2 / 2 * delta^2` over this participant's cells.
pub fn local_kinetic_energy(cells: &[CellSample], phases: &PhaseProperties) -> f64 {
    cells
        .par_iter()
        .map(|c| {
            TAU * c.y
                * phases.mixture_density(c.f)
                * 0.5
                * (c.ux * c.ux + c.uy * c.uy)
                * c.delta
                * c.delta
        })
        .sum()
}

/// Global kinetic energy. Collective: every participant must call it.
pub fn kinetic_energy<C: Communicator>(
    cells: &[CellSample],
    phases: &PhaseProperties,
    comm: &C,
) -> f64 {
    comm.all_reduce_sum(local_kinetic_energy(cells, phases))
}

#[derive(Clone, Debug)]
pub struct TerminationMonitor {
    thresholds: MonitorThresholds,
    horizon: f64,
    state: MonitorState,
    last: Option<SimulationState>,
}

impl TerminationMonitor {
    pub fn new(horizon: f64, thresholds: MonitorThresholds) -> Self {
        Self {
            thresholds,
            horizon,
            state: MonitorState::Running,
            last: None,
        }
    }

    pub fn thresholds(&self) -> &MonitorThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn last(&self) -> Option<&SimulationState> {
        self.last.as_ref()
    }

    /// Classify one step. Terminal states are absorbing.
    ///
    /// A kinetic energy at or below the negative tolerance (or NaN) is an
    /// invariant violation with no recovery.
    pub fn observe(&mut self, obs: SimulationState) -> ControlResult<MonitorState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        let ke = obs.kinetic_energy;
        if ke.is_nan() || ke <= self.thresholds.negative_tolerance {
            return Err(ControlError::Invariant(CoreError::Invariant {
                what: "kinetic energy must not be negative",
                value: ke,
            }));
        }

        let t = &self.thresholds;
        let armed = obs.step > t.warmup_steps;
        let horizon_tol = Tolerances::absolute(1e-9 * self.horizon);
        let next = if armed && ke > t.blow_up {
            MonitorState::BlownUp
        } else if armed && ke < t.stagnation {
            MonitorState::Stagnated
        } else if reached(obs.time, self.horizon, horizon_tol) {
            MonitorState::HorizonReached
        } else {
            MonitorState::Running
        };

        self.state = next;
        self.last = Some(obs);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obs(step: usize, kinetic_energy: f64) -> SimulationState {
        SimulationState {
            step,
            time: step as f64 * 1e-3,
            kinetic_energy,
        }
    }

    fn monitor() -> TerminationMonitor {
        TerminationMonitor::new(1.0, MonitorThresholds::default())
    }

    #[test]
    fn warmup_masks_failures() {
        let mut m = monitor();
        for step in 0..=10 {
            assert_eq!(m.observe(obs(step, 1e6)).unwrap(), MonitorState::Running);
        }
        assert_eq!(m.observe(obs(11, 1e6)).unwrap(), MonitorState::BlownUp);
    }

    #[test]
    fn stagnation_after_warmup() {
        let mut m = monitor();
        assert_eq!(m.observe(obs(11, 1e-7)).unwrap(), MonitorState::Running);
        assert_eq!(m.observe(obs(12, 1e-9)).unwrap(), MonitorState::Stagnated);
    }

    #[test]
    fn terminal_state_is_absorbing() {
        let mut m = monitor();
        m.observe(obs(20, 500.0)).unwrap();
        assert_eq!(m.observe(obs(21, 1.0)).unwrap(), MonitorState::BlownUp);
        assert_eq!(m.last().unwrap().step, 20);
    }

    #[test]
    fn horizon_reached_within_tolerance() {
        let mut m = monitor();
        let t: f64 = (0..10).map(|_| 0.1).sum();
        let state = m
            .observe(SimulationState {
                step: 1000,
                time: t,
                kinetic_energy: 0.5,
            })
            .unwrap();
        assert_eq!(state, MonitorState::HorizonReached);
    }

    #[test]
    fn failure_wins_over_horizon() {
        let mut m = monitor();
        let state = m
            .observe(SimulationState {
                step: 1000,
                time: 1.0,
                kinetic_energy: 1e3,
            })
            .unwrap();
        assert_eq!(state, MonitorState::BlownUp);
    }

    #[test]
    fn negative_energy_is_an_invariant_violation() {
        let mut m = monitor();
        // round-off below zero is tolerated
        assert!(m.observe(obs(1, -1e-12)).is_ok());
        let err = m.observe(obs(2, -1e-3)).unwrap_err();
        assert!(err.is_invariant());
        assert!(m.observe(obs(3, f64::NAN)).unwrap_err().is_invariant());
    }

    #[test]
    fn negative_tolerance_is_inclusive() {
        let mut m = monitor();
        assert!(m.observe(obs(1, -0.99e-10)).is_ok());
        assert!(m.observe(obs(2, -1e-10)).unwrap_err().is_invariant());
    }

    #[test]
    fn kinetic_energy_uses_mixture_density() {
        let phases = PhaseProperties::derive(1e-2, 1e-4, 1.0, 1.0, 1e-2);
        let gas = CellSample {
            f: 0.0,
            ..CellSample::carrying(1.0)
        };
        let liquid = CellSample::carrying(1.0);
        let ke = local_kinetic_energy(&[liquid, gas], &phases);
        assert!((ke - 1.01).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn no_failure_during_warmup(step in 0usize..=10, ke in 0.0f64..1e12) {
            let mut m = monitor();
            prop_assert_eq!(m.observe(obs(step, ke)).unwrap(), MonitorState::Running);
        }
    }
}
