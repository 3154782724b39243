use std::f64::consts::PI;

use glam::DVec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use yaml_rust::Yaml;

use crate::{
    errors::ConfigError,
    gas_law::GasLaw,
    part::{Particle, PrimitiveGradients},
    utils::HydroDimension,
};

/// Density, velocity, pressure and gradients at a lattice site.
pub type LatticeSite = (f64, DVec3, f64, PrimitiveGradients);

/// Real particles on a regular lattice filling a rectangular box.
#[derive(Debug, Clone)]
pub struct InitialConditions {
    particles: Vec<Particle>,
    range_min: DVec3,
    range_max: DVec3,
    spacing: DVec3,
    smoothing_length: f64,
}

impl InitialConditions {
    /// Place `num_part` particles per dimension at the cell centres of a regular grid.
    ///
    /// The smoothing length (kernel support) is `smoothing_factor` times the largest
    /// spacing; masses are chosen so that every particle represents one grid cell.
    pub fn lattice<F>(
        range_min: DVec3,
        range_max: DVec3,
        num_part: usize,
        dimension: HydroDimension,
        smoothing_factor: f64,
        gas_law: &GasLaw,
        site: F,
    ) -> Self
    where
        F: Fn(DVec3) -> LatticeSite,
    {
        let count = dimension.count();
        let mut spacing = DVec3::ZERO;
        let mut counts = [1usize; 3];
        let mut cell_volume = 1.;
        for d in 0..count {
            spacing[d] = (range_max[d] - range_min[d]) / num_part as f64;
            counts[d] = num_part;
            cell_volume *= spacing[d];
        }
        let smoothing_length = smoothing_factor * spacing.max_element();

        let mut particles = Vec::with_capacity(counts.iter().product());
        for k in 0..counts[2] {
            for j in 0..counts[1] {
                for i in 0..counts[0] {
                    let mut position = DVec3::ZERO;
                    for (d, idx) in [i, j, k].into_iter().enumerate().take(count) {
                        position[d] = range_min[d] + (idx as f64 + 0.5) * spacing[d];
                    }
                    let (density, velocity, pressure, gradients) = site(position);
                    let internal_energy =
                        gas_law.gas_internal_energy_from_pressure(pressure, 1. / density);
                    let part = Particle::new(
                        particles.len(),
                        position,
                        velocity,
                        density * cell_volume,
                        density,
                        internal_energy,
                        smoothing_length,
                        gas_law,
                    )
                    .with_gradients(gradients);
                    particles.push(part);
                }
            }
        }

        Self {
            particles,
            range_min,
            range_max,
            spacing,
            smoothing_length,
        }
    }

    /// Builds one of the named presets from the `initial_conditions` section.
    pub fn init(
        cfg: &Yaml,
        range_min: DVec3,
        range_max: DVec3,
        dimension: HydroDimension,
        gas_law: &GasLaw,
    ) -> Result<Self, ConfigError> {
        let kind = cfg["type"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("initial_conditions:type".to_string()))?
            .to_string();
        let num_part = match cfg["num_part"].as_i64() {
            Some(num_part) => usize::try_from(num_part)
                .ok()
                .filter(|&n| n > 0)
                .ok_or(ConfigError::InvalidParameter(
                    "initial_conditions:num_part".to_string(),
                    num_part.to_string(),
                ))?,
            None => 100,
        };
        let smoothing_factor = cfg["smoothing_factor"].as_f64().unwrap_or(2.5);
        let length = range_max.x - range_min.x;
        let midpoint = range_min.x + 0.5 * length;

        let mut ics = match kind.as_str() {
            "uniform" => Self::lattice(
                range_min,
                range_max,
                num_part,
                dimension,
                smoothing_factor,
                gas_law,
                |_| (1., DVec3::ZERO, 1., PrimitiveGradients::zeros()),
            ),
            "sodshock" => Self::lattice(
                range_min,
                range_max,
                num_part,
                dimension,
                smoothing_factor,
                gas_law,
                |x| {
                    if x.x < midpoint {
                        (1., DVec3::ZERO, 1., PrimitiveGradients::zeros())
                    } else {
                        (0.125, DVec3::ZERO, 0.1, PrimitiveGradients::zeros())
                    }
                },
            ),
            "noh" => Self::lattice(
                range_min,
                range_max,
                num_part,
                dimension,
                smoothing_factor,
                gas_law,
                |x| {
                    let velocity = if x.x < midpoint { DVec3::X } else { -DVec3::X };
                    (1., velocity, 1.0e-6, PrimitiveGradients::zeros())
                },
            ),
            "sine_wave" => {
                let amplitude = cfg["amplitude"].as_f64().unwrap_or(0.1);
                let k = 2. * PI / length;
                Self::lattice(
                    range_min,
                    range_max,
                    num_part,
                    dimension,
                    smoothing_factor,
                    gas_law,
                    |x| {
                        let phase = k * (x.x - range_min.x);
                        let gradients = PrimitiveGradients {
                            density: DVec3::X * amplitude * k * phase.cos(),
                            ..PrimitiveGradients::zeros()
                        };
                        (1. + amplitude * phase.sin(), DVec3::ZERO, 1., gradients)
                    },
                )
            }
            _ => return Err(ConfigError::UnknownICs(kind)),
        };

        if let Some(perturbation) = cfg["perturbation"].as_f64() {
            let seed = cfg["seed"].as_i64().unwrap_or(0) as u64;
            ics.perturb(perturbation, seed, dimension);
        }
        log::info!(
            "Created {} initial conditions with {} particles",
            kind,
            ics.particles.len()
        );
        Ok(ics)
    }

    /// Displace every particle by a uniform random fraction (at most `amplitude`) of the spacing.
    pub fn perturb(&mut self, amplitude: f64, seed: u64, dimension: HydroDimension) {
        let mut rng = StdRng::seed_from_u64(seed);
        for part in self.particles.iter_mut() {
            for d in 0..dimension.count() {
                part.position[d] += amplitude * self.spacing[d] * rng.gen_range(-1.0..1.0);
                part.position[d] = part.position[d].clamp(self.range_min[d], self.range_max[d]);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }

    pub fn spacing(&self) -> DVec3 {
        self.spacing
    }

    pub fn smoothing_length(&self) -> f64 {
        self.smoothing_length
    }
}
