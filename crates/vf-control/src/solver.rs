//! The seam between run control and the PDE solver.
//!
//! The control layer never touches the mesh directly. It asks the solver for
//! a handful of primitives (adaptation, checkpoint I/O, reductions over the
//! interface) and for the per-cell samples it needs to integrate kinetic
//! energy.

use crate::error::SolverResult;
use std::f64::consts::TAU;
use std::path::Path;
use vf_config::RunConfig;

/// Fields handed to wavelet adaptation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Liquid volume fraction.
    VolumeFraction,
    VelocityX,
    VelocityY,
    /// Conformation tensor components.
    ConformationXX,
    ConformationYY,
    ConformationXY,
    ConformationThetaTheta,
    /// Interface curvature, recomputed from the volume fraction before adapting.
    Curvature,
}

impl Field {
    /// Name of the field as the solver knows it.
    pub fn name(self) -> &'static str {
        match self {
            Field::VolumeFraction => "f",
            Field::VelocityX => "u.x",
            Field::VelocityY => "u.y",
            Field::ConformationXX => "A11",
            Field::ConformationYY => "A22",
            Field::ConformationXY => "A12",
            Field::ConformationThetaTheta => "AThTh",
            Field::Curvature => "KAPPA",
        }
    }
}

/// One call's worth of adaptation input.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptRequest {
    /// Field and its wavelet error tolerance, in adaptation order.
    pub fields: Vec<(Field, f64)>,
    pub max_level: i32,
    pub min_level: i32,
}

/// Cells touched by one adaptation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdaptStats {
    pub refined: usize,
    pub coarsened: usize,
}

/// Local cell data needed for the kinetic energy integral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSample {
    /// Volume fraction.
    pub f: f64,
    pub ux: f64,
    pub uy: f64,
    /// Radial coordinate of the cell centre.
    pub y: f64,
    /// Cell size.
    pub delta: f64,
}

impl CellSample {
    /// A unit liquid cell whose kinetic energy integral equals `ke`.
    ///
    /// Backends without a real mesh (log replay, tests) report energy this way.
    /// Negative `ke` is carried by a cell below the axis.
    pub fn carrying(ke: f64) -> Self {
        let y = if ke < 0.0 { -1.0 / TAU } else { 1.0 / TAU };
        Self {
            f: 1.0,
            ux: (2.0 * ke.abs()).sqrt(),
            uy: 0.0,
            y,
            delta: 1.0,
        }
    }
}

/// Step counter and simulated time restored from a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverClock {
    pub step: usize,
    pub time: f64,
}

/// Analytic initial interface: `y = mean_height - amplitude * sin(wavenumber * x)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterfaceShape {
    pub mean_height: f64,
    pub amplitude: f64,
    pub wavenumber: f64,
}

impl InterfaceShape {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            mean_height: 1.0,
            amplitude: config.params().perturbation,
            wavenumber: 0.25,
        }
    }

    /// Level set, positive inside the liquid.
    pub fn level_set(&self, x: f64, y: f64) -> f64 {
        self.height(x) - y
    }

    /// Interface height above the axis at axial position `x`.
    pub fn height(&self, x: f64) -> f64 {
        self.mean_height - self.amplitude * (self.wavenumber * x).sin()
    }
}

/// Primitives the control layer needs from a two-phase solver.
///
/// Reductions (`min_interface_height`, `max_velocity_norm`) return values
/// that are already global across participants; [`Solver::local_cells`] is
/// local and reduced by the caller.
pub trait Solver {
    /// Fill the volume fraction from the analytic shape (fresh start).
    fn initialize_interface(&mut self, shape: &InterfaceShape) -> SolverResult<()>;

    /// Restore state from a checkpoint. `Ok(None)` means the file could not
    /// be used and the caller should start fresh.
    fn restore(&mut self, path: &Path) -> SolverResult<Option<SolverClock>>;

    /// Write a checkpoint to `path`, replacing any existing file.
    fn dump(&mut self, path: &Path) -> SolverResult<()>;

    /// Recompute the curvature field from the current interface.
    fn update_curvature(&mut self) -> SolverResult<()>;

    fn adapt_wavelet(&mut self, request: &AdaptRequest) -> SolverResult<AdaptStats>;

    fn local_cells(&self) -> &[CellSample];

    fn min_interface_height(&self) -> f64;

    fn max_velocity_norm(&self) -> f64;

    /// Advance by at most `dt`, returning the step actually taken.
    ///
    /// Backends that cannot honor the bound (a replayed run) return their
    /// own step; the checkpointer then reports crossed snapshot times.
    fn advance(&mut self, dt: f64) -> SolverResult<f64>;
}
