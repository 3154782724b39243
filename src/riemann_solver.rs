use std::fmt::Display;

use yaml_rust::Yaml;

use crate::errors::ConfigError;

mod hll;
mod pvrs;

pub use hll::{HllRiemannSolver, DEGENERATE_WAVE_TOLERANCE};
pub use pvrs::PVRiemannSolver;

/// One side of a particle-pair interface, projected on the pair axis.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RiemannState {
    pub density: f64,
    /// Velocity component along the pair axis
    pub velocity: f64,
    pub pressure: f64,
    pub sound_speed: f64,
}

impl RiemannState {
    pub fn new(density: f64, velocity: f64, pressure: f64, sound_speed: f64) -> Self {
        Self {
            density,
            velocity,
            pressure,
            sound_speed,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.density > 0.
            && self.sound_speed >= 0.
            && self.density.is_finite()
            && self.velocity.is_finite()
            && self.pressure.is_finite()
            && self.sound_speed.is_finite()
    }
}

/// Square-root-density weighted averages of two states (Roe 1981).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoeAverages {
    pub velocity: f64,
    pub sound_speed: f64,
}

impl RoeAverages {
    pub fn new(left: &RiemannState, right: &RiemannState) -> Self {
        let sqrt_rho_l = left.density.sqrt();
        let sqrt_rho_r = right.density.sqrt();
        let norm = 1. / (sqrt_rho_l + sqrt_rho_r);
        Self {
            velocity: (sqrt_rho_l * left.velocity + sqrt_rho_r * right.velocity) * norm,
            sound_speed: (sqrt_rho_l * left.sound_speed + sqrt_rho_r * right.sound_speed) * norm,
        }
    }
}

/// Resolved interface state.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RiemannSolution {
    pub pressure: f64,
    pub velocity: f64,
}

impl RiemannSolution {
    pub fn new(pressure: f64, velocity: f64) -> Self {
        Self { pressure, velocity }
    }

    /// Arithmetic mean of both sides, used whenever a proper solution cannot be computed.
    pub fn average(left: &RiemannState, right: &RiemannState) -> Self {
        Self {
            pressure: 0.5 * (left.pressure + right.pressure),
            velocity: 0.5 * (left.velocity + right.velocity),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pressure.is_finite() && self.velocity.is_finite()
    }
}

pub trait RiemannSolver: Sync {
    /// Interface pressure and velocity for the given left and right states.
    ///
    /// Never panics: unphysical input states yield [`RiemannSolution::average`].
    fn solve(&self, left: &RiemannState, right: &RiemannState) -> RiemannSolution;

    fn name(&self) -> &'static str;
}

/// The Riemann solver selected in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiemannSolverKind {
    Hll,
    Pvrs,
}

impl RiemannSolverKind {
    /// Reads the `kind` entry of the `riemann_solver` section.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["kind"].as_str().ok_or(ConfigError::MissingParameter(
            "hydrodynamics:riemann_solver:kind".to_string(),
        ))?;
        let solver = match kind {
            "HLL" => RiemannSolverKind::Hll,
            "PVRS" => RiemannSolverKind::Pvrs,
            _ => return Err(ConfigError::UnknownRiemannSolver(kind.to_string())),
        };
        log::info!("Using the {} Riemann solver", solver.name());
        Ok(solver)
    }
}

impl RiemannSolver for RiemannSolverKind {
    fn solve(&self, left: &RiemannState, right: &RiemannState) -> RiemannSolution {
        match self {
            RiemannSolverKind::Hll => HllRiemannSolver.solve(left, right),
            RiemannSolverKind::Pvrs => PVRiemannSolver.solve(left, right),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RiemannSolverKind::Hll => HllRiemannSolver.name(),
            RiemannSolverKind::Pvrs => PVRiemannSolver.name(),
        }
    }
}

impl Display for RiemannSolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
