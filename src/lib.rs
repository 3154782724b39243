//! Numerical flux core of a Godunov SPH (GSPH) solver for compressible gas dynamics.
//!
//! The library resolves particle-pair interfaces with approximate Riemann solvers,
//! reconstructs interface states with TVD slope limiters, and surrounds the particles of a
//! rectangular domain with ghost particles for periodic and mirror boundaries.

pub use boundary::{BoundaryBuilder, BoundaryConfiguration, BoundaryType, MirrorType, Side};
pub use errors::{BoundaryError, ConfigError};
pub use flux::{FluxSweep, GsphForce, HydroRates, PairFlux, Reconstruction};
pub use gas_law::{EquationOfState, GasLaw};
pub use ghost_particles::{GhostParticleManager, NEAR_BOUNDARY_TOLERANCE};
pub use initial_conditions::InitialConditions;
pub use kernels::{CubicSpline, Kernel, KernelKind, WendlandC2};
pub use neighbours::NeighbourSearch;
pub use part::{Particle, ParticleType, PrimitiveGradients};
pub use riemann_solver::{
    HllRiemannSolver, PVRiemannSolver, RiemannSolution, RiemannSolver, RiemannSolverKind,
    RiemannState, RoeAverages,
};
pub use slope_limiters::SlopeLimiter;
pub use utils::HydroDimension;

mod boundary;
mod errors;
mod flux;
pub mod gas_law;
mod ghost_particles;
mod initial_conditions;
mod kernels;
mod neighbours;
mod part;
pub mod riemann_solver;
mod slope_limiters;
mod utils;
