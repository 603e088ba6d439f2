//! Run control for the thinning simulation.
//!
//! The PDE solver is an external collaborator reached through the [`Solver`]
//! trait. This crate decides, every step:
//! - which fields to hand to wavelet adaptation ([`RefinementPolicy`])
//! - when to write the rolling restart file and timed snapshots ([`Checkpointer`])
//! - whether to stop early on kinetic-energy blow-up or collapse ([`TerminationMonitor`])
//!
//! [`SimulationController`] wires the three together behind one per-step
//! callback and [`driver::run`] provides a time-stepping loop around it.

pub mod checkpoint;
pub mod controller;
pub mod driver;
pub mod error;
pub mod monitor;
pub mod refinement;
pub mod solver;

pub use checkpoint::{Checkpointer, SnapshotSchedule, StartMode};
pub use controller::{SimulationController, StepInfo, StepOutcome};
pub use driver::{DriverOptions, RunOutcome, RunReport, StepProgress, run, run_with_progress};
pub use error::{ControlError, ControlResult, SolverError, SolverResult};
pub use monitor::{
    MonitorState, MonitorThresholds, SimulationState, TerminationMonitor, local_kinetic_energy,
};
pub use refinement::RefinementPolicy;
pub use solver::{AdaptRequest, AdaptStats, CellSample, Field, InterfaceShape, Solver, SolverClock};
