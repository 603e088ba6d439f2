//! Per-step wavelet adaptation.

use crate::error::ControlResult;
use crate::solver::{AdaptRequest, AdaptStats, Field, Solver};
use tracing::debug;
use vf_config::RunConfig;

/// Fixed field/tolerance list applied at every step.
#[derive(Clone, Debug, PartialEq)]
pub struct RefinementPolicy {
    request: AdaptRequest,
}

impl RefinementPolicy {
    pub fn from_config(config: &RunConfig) -> Self {
        let tol = config.tolerances();
        let fields = vec![
            (Field::VolumeFraction, tol.interface),
            (Field::VelocityX, tol.velocity),
            (Field::VelocityY, tol.velocity),
            (Field::ConformationXX, tol.conformation),
            (Field::ConformationYY, tol.conformation),
            (Field::ConformationXY, tol.conformation),
            (Field::ConformationThetaTheta, tol.conformation),
            (Field::Curvature, tol.curvature),
        ];
        Self {
            request: AdaptRequest {
                fields,
                max_level: config.max_level(),
                min_level: config.min_level(),
            },
        }
    }

    pub fn request(&self) -> &AdaptRequest {
        &self.request
    }

    /// Refresh curvature, then adapt once. Solver errors propagate unchanged.
    pub fn apply<S: Solver>(&self, solver: &mut S) -> ControlResult<AdaptStats> {
        solver.update_curvature()?;
        let stats = solver.adapt_wavelet(&self.request)?;
        debug!(
            refined = stats.refined,
            coarsened = stats.coarsened,
            "wavelet adaptation"
        );
        Ok(stats)
    }
}
