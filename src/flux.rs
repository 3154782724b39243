//! Godunov SPH pair interactions (Inutsuka 2002).
//!
//! Every pair of particles closer than the larger of their smoothing lengths defines an
//! interface along the pair axis. The (optionally reconstructed) states on either side are
//! handed to a [`RiemannSolver`] and the resolved pressure and velocity replace the
//! particle pressures in the SPH momentum and energy equations.

use glam::DVec3;
use rayon::prelude::*;
use yaml_rust::Yaml;

use crate::{
    errors::ConfigError,
    gas_law::GasLaw,
    kernels::Kernel,
    neighbours::NeighbourSearch,
    part::Particle,
    riemann_solver::{RiemannSolution, RiemannSolver, RiemannState},
    slope_limiters::SlopeLimiter,
    utils::HydroDimension,
};

/// How interface states are obtained from the particle values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconstruction {
    /// Use the particle values directly.
    FirstOrder,
    /// Extrapolate towards the interface with limited particle gradients.
    Muscl(SlopeLimiter),
}

impl Reconstruction {
    /// Reads the `reconstruction` and `slope_limiter` entries of the `flux` section.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["reconstruction"].as_str().unwrap_or("muscl");
        let reconstruction = match kind {
            "first_order" => Reconstruction::FirstOrder,
            "muscl" => Reconstruction::Muscl(SlopeLimiter::init(cfg)?),
            _ => {
                return Err(ConfigError::MissingParameter(format!(
                    "flux:reconstruction (first_order or muscl, got {kind})"
                )))
            }
        };
        match reconstruction {
            Reconstruction::FirstOrder => log::info!("Using first order interface states"),
            Reconstruction::Muscl(limiter) => {
                log::info!("Using MUSCL reconstruction with the {} slope limiter", limiter)
            }
        }
        Ok(reconstruction)
    }
}

/// Time derivatives of a real particle accumulated over all of its pairs.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HydroRates {
    pub acceleration: DVec3,
    /// Rate of change of the specific internal energy
    pub energy_rate: f64,
    /// Number of particles (real or ghost) that contributed
    pub neighbours: usize,
}

#[derive(Debug, Default, Clone)]
pub struct FluxSweep {
    pub rates: Vec<HydroRates>,
    /// Number of pairs for which at least one interface state was unphysical.
    pub fallback_pairs: usize,
}

/// Contribution of particle `j` to the rates of particle `i`.
#[derive(Debug, Clone, Copy)]
pub struct PairFlux {
    pub acceleration: DVec3,
    pub energy_rate: f64,
    pub solution: RiemannSolution,
    pub used_fallback: bool,
}

pub struct GsphForce<R: RiemannSolver, K: Kernel> {
    riemann_solver: R,
    reconstruction: Reconstruction,
    kernel: K,
    gas_law: GasLaw,
    dimension: HydroDimension,
}

impl<R: RiemannSolver, K: Kernel> GsphForce<R, K> {
    pub fn new(
        riemann_solver: R,
        reconstruction: Reconstruction,
        kernel: K,
        gas_law: GasLaw,
        dimension: HydroDimension,
    ) -> Self {
        Self {
            riemann_solver,
            reconstruction,
            kernel,
            gas_law,
            dimension,
        }
    }

    pub fn riemann_solver(&self) -> &R {
        &self.riemann_solver
    }

    pub fn reconstruction(&self) -> Reconstruction {
        self.reconstruction
    }

    fn state(&self, density: f64, velocity: f64, pressure: f64) -> RiemannState {
        let sound_speed = self.gas_law.sound_speed(pressure, 1. / density);
        RiemannState::new(density, velocity, pressure, sound_speed)
    }

    /// Left (`j`) and right (`i`) states at the interface of the pair, with `dx = x_i - x_j`
    /// and `e = dx / |dx|`.
    pub fn interface_states(
        &self,
        part_i: &Particle,
        part_j: &Particle,
        dx: DVec3,
        r: f64,
        dt: f64,
    ) -> (RiemannState, RiemannState) {
        let e = dx / r;
        let v_i = part_i.velocity.dot(e);
        let v_j = part_j.velocity.dot(e);

        let limiter = match self.reconstruction {
            Reconstruction::FirstOrder => {
                let left = RiemannState::new(part_j.density, v_j, part_j.pressure, part_j.sound_speed);
                let right = RiemannState::new(part_i.density, v_i, part_i.pressure, part_i.sound_speed);
                return (left, right);
            }
            Reconstruction::Muscl(limiter) => limiter,
        };

        // Fraction of the half-separation still to cover after the waves travelled for dt/2.
        let delta_i = (0.5 * (1. - part_i.sound_speed * dt / r)).max(0.);
        let delta_j = (0.5 * (1. - part_j.sound_speed * dt / r)).max(0.);

        let reconstruct = |q_i: f64, q_j: f64, dq_i: f64, dq_j: f64| {
            let dq = q_i - q_j;
            let s_i = limiter.limit(dq, dq_i);
            let s_j = limiter.limit(dq, dq_j);
            (q_j + s_j * delta_j, q_i - s_i * delta_i)
        };

        let (rho_l, rho_r) = reconstruct(
            part_i.density,
            part_j.density,
            part_i.gradients.density.dot(dx),
            part_j.gradients.density.dot(dx),
        );
        let (v_l, v_r) = reconstruct(
            v_i,
            v_j,
            part_i.gradients.normal_velocity_change(e, dx),
            part_j.gradients.normal_velocity_change(e, dx),
        );
        let (p_l, p_r) = reconstruct(
            part_i.pressure,
            part_j.pressure,
            part_i.gradients.pressure.dot(dx),
            part_j.gradients.pressure.dot(dx),
        );

        (self.state(rho_l, v_l, p_l), self.state(rho_r, v_r, p_r))
    }

    /// Contribution of `part_j` to the acceleration and energy rate of `part_i`.
    ///
    /// Returns `None` for coincident particles and pairs outside both smoothing lengths.
    pub fn pair_interaction(&self, part_i: &Particle, part_j: &Particle, dt: f64) -> Option<PairFlux> {
        let dx = part_i.position - part_j.position;
        let r = dx.length();
        if r <= 0. || r >= part_i.smoothing_length.max(part_j.smoothing_length) {
            return None;
        }

        let (left, right) = self.interface_states(part_i, part_j, dx, r, dt);
        let used_fallback = !left.is_valid() || !right.is_valid();
        let solution = self.riemann_solver.solve(&left, &right);

        let grad_i = self.kernel.gradient(dx, r, part_i.smoothing_length, self.dimension);
        let grad_j = self.kernel.gradient(dx, r, part_j.smoothing_length, self.dimension);
        let v_ij = solution.pressure
            * (grad_i / (part_i.density * part_i.density) + grad_j / (part_j.density * part_j.density));

        let e = dx / r;
        Some(PairFlux {
            acceleration: -part_j.mass * v_ij,
            energy_rate: -part_j.mass * v_ij.dot(solution.velocity * e - part_i.velocity),
            solution,
            used_fallback,
        })
    }

    /// Accumulate the rates of every real particle over its real and ghost neighbours.
    ///
    /// Neighbours are searched within `support_radius`, which should not be smaller
    /// than the largest smoothing length.
    pub fn compute_rates(
        &self,
        real: &[Particle],
        ghosts: &[Particle],
        support_radius: f64,
        dt: f64,
    ) -> FluxSweep {
        let search = NeighbourSearch::build(real, ghosts);
        let real_count = search.real_count();

        let per_particle = real
            .par_iter()
            .enumerate()
            .map(|(i, part_i)| {
                let mut rates = HydroRates::default();
                let mut fallback_pairs = 0;
                for idx in search.within(part_i.position, support_radius) {
                    if idx == i {
                        continue;
                    }
                    let part_j = if idx < real_count {
                        &real[idx]
                    } else {
                        &ghosts[idx - real_count]
                    };
                    if let Some(flux) = self.pair_interaction(part_i, part_j, dt) {
                        rates.acceleration += flux.acceleration;
                        rates.energy_rate += flux.energy_rate;
                        rates.neighbours += 1;
                        if flux.used_fallback {
                            fallback_pairs += 1;
                        }
                    }
                }
                (rates, fallback_pairs)
            })
            .collect::<Vec<_>>();

        let fallback_pairs = per_particle.iter().map(|(_, count)| count).sum::<usize>();
        if fallback_pairs > 0 {
            log::warn!(
                "{} pairs had unphysical interface states and used the averaged fallback",
                fallback_pairs
            );
        }
        FluxSweep {
            rates: per_particle.into_iter().map(|(rates, _)| rates).collect(),
            fallback_pairs,
        }
    }
}
