//! Phase properties derived from the dimensionless groups.
//!
//! Phase 1 is the viscoelastic liquid, phase 2 the Newtonian gas. Lengths are
//! scaled by the film thickness, velocities by the inertio-capillary velocity,
//! so the liquid density and the surface tension are both one.

use serde::Serialize;

/// Deborah numbers at or above this value are treated as a purely elastic
/// liquid (infinite relaxation time).
pub const ELASTIC_LIMIT_DEBORAH: f64 = 1e30;

/// Polymer relaxation time of one phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "time")]
pub enum Relaxation {
    /// Zero relaxation time.
    Newtonian,
    Finite(f64),
    /// Stress never relaxes.
    ElasticLimit,
}

impl Relaxation {
    pub fn from_deborah(de: f64) -> Self {
        if de <= 0.0 {
            Relaxation::Newtonian
        } else if de >= ELASTIC_LIMIT_DEBORAH {
            Relaxation::ElasticLimit
        } else {
            Relaxation::Finite(de)
        }
    }

    /// Relaxation time passed to the solver; the elastic limit maps to
    /// [`ELASTIC_LIMIT_DEBORAH`].
    pub fn time(self) -> f64 {
        match self {
            Relaxation::Newtonian => 0.0,
            Relaxation::Finite(t) => t,
            Relaxation::ElasticLimit => ELASTIC_LIMIT_DEBORAH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Phase {
    pub density: f64,
    pub viscosity: f64,
    pub elastic_modulus: f64,
    pub relaxation: Relaxation,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhaseProperties {
    pub liquid: Phase,
    pub gas: Phase,
    pub surface_tension: f64,
}

impl PhaseProperties {
    pub fn derive(oh: f64, oha: f64, de: f64, ec: f64, gas_density: f64) -> Self {
        Self {
            liquid: Phase {
                density: 1.0,
                viscosity: oh,
                elastic_modulus: ec,
                relaxation: Relaxation::from_deborah(de),
            },
            gas: Phase {
                density: gas_density,
                viscosity: oha,
                elastic_modulus: 0.0,
                relaxation: Relaxation::Newtonian,
            },
            surface_tension: 1.0,
        }
    }

    /// Filtered mixture density for volume fraction `f` (1 = liquid).
    pub fn mixture_density(&self, f: f64) -> f64 {
        let f = f.clamp(0.0, 1.0);
        f * (self.liquid.density - self.gas.density) + self.gas.density
    }
}
