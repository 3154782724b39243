//! Ghost particles giving near-boundary particles a complete neighbourhood.
//!
//! The ghost list is rebuilt from scratch on every call to
//! [`GhostParticleManager::generate_ghosts`]. Ghosts of a particle close to several
//! boundaries are composed: a particle near the corner of a 2D periodic box gets one
//! image across each edge and one across the corner.

use glam::DVec3;
use rayon::prelude::*;

use crate::{
    boundary::{BoundaryConfiguration, BoundaryType, MirrorType, Side},
    errors::BoundaryError,
    part::Particle,
    utils::{box_wrap, contains},
};

/// Relative slack (in units of the domain size) on the near-boundary test, so that a
/// particle at exactly the support radius from a boundary is not lost to rounding.
pub const NEAR_BOUNDARY_TOLERANCE: f64 = 1e-12;

/// One way of mapping a particle along a single dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Image {
    Identity,
    Shift(f64),
    Reflect { wall: f64, negate_all: bool },
}

#[derive(Debug, Default)]
pub struct GhostParticleManager {
    config: Option<BoundaryConfiguration>,
    kernel_support_radius: f64,
    ghosts: Vec<Particle>,
    ghost_sources: Vec<usize>,
}

impl GhostParticleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, config: BoundaryConfiguration) -> Result<(), BoundaryError> {
        config.validate()?;
        self.config = Some(config);
        self.clear();
        Ok(())
    }

    fn config_or_err(&self) -> Result<&BoundaryConfiguration, BoundaryError> {
        self.config.as_ref().ok_or(BoundaryError::Uninitialized)
    }

    pub fn config(&self) -> Option<&BoundaryConfiguration> {
        self.config.as_ref()
    }

    pub fn kernel_support_radius(&self) -> f64 {
        self.kernel_support_radius
    }

    /// Takes effect on the next generation.
    pub fn set_kernel_support_radius(&mut self, radius: f64) -> Result<(), BoundaryError> {
        self.config_or_err()?;
        if !radius.is_finite() || radius < 0. {
            return Err(BoundaryError::InvalidSupportRadius(radius));
        }
        self.kernel_support_radius = radius;
        Ok(())
    }

    /// Discard the current ghosts and build new ones from the given real particles.
    pub fn generate_ghosts(&mut self, real: &[Particle]) -> Result<&[Particle], BoundaryError> {
        let config = self.config_or_err()?;
        let radius = self.kernel_support_radius;

        let per_particle = real
            .par_iter()
            .enumerate()
            .map(|(idx, part)| {
                ghosts_of(config, radius, part)
                    .into_iter()
                    .map(move |ghost| (idx, ghost))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let (ghost_sources, ghosts): (Vec<_>, Vec<_>) = per_particle.into_iter().flatten().unzip();
        self.ghost_sources = ghost_sources;
        self.ghosts = ghosts;

        log::debug!(
            "Generated {} ghosts from {} of {} real particles (support radius: {})",
            self.ghosts.len(),
            self.source_particle_count(),
            real.len(),
            radius
        );
        Ok(&self.ghosts)
    }

    /// Rebuild the ghosts after the real particles moved.
    pub fn regenerate_ghosts(&mut self, real: &[Particle]) -> Result<&[Particle], BoundaryError> {
        self.generate_ghosts(real)
    }

    pub fn get_ghost_particles(&self) -> Result<&[Particle], BoundaryError> {
        self.config_or_err()?;
        Ok(&self.ghosts)
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    pub fn has_ghosts(&self) -> bool {
        !self.ghosts.is_empty()
    }

    /// Index of the real particle each ghost was made from.
    pub fn ghost_sources(&self) -> &[usize] {
        &self.ghost_sources
    }

    /// Number of distinct real particles that produced at least one ghost.
    pub fn source_particle_count(&self) -> usize {
        // Sources are sorted: ghosts are generated in real particle order.
        self.ghost_sources
            .iter()
            .enumerate()
            .filter(|(i, src)| *i == 0 || self.ghost_sources[i - 1] != **src)
            .count()
    }

    pub fn clear(&mut self) {
        self.ghosts.clear();
        self.ghost_sources.clear();
    }

    /// Wrap real particles that left the domain back in along the periodic dimensions.
    pub fn apply_periodic_wrapping(&self, particles: &mut [Particle]) -> Result<(), BoundaryError> {
        let config = self.config_or_err()?;
        if !config.has_periodic() {
            return Ok(());
        }
        let dimension = config.dimension();
        particles.par_iter_mut().for_each(|part| {
            if contains(config.range_min, config.range_max, part.position, dimension) {
                return;
            }
            for d in 0..dimension {
                if config.types[d] == BoundaryType::Periodic {
                    box_wrap(config.range_min[d], config.range_max[d], &mut part.position[d]);
                }
            }
        });
        Ok(())
    }
}

fn is_near(distance: f64, radius: f64, range: f64) -> bool {
    distance <= radius + NEAR_BOUNDARY_TOLERANCE * range
}

/// The non-identity images of `part` along `dim`, preceded by the identity.
fn images_in_dimension(config: &BoundaryConfiguration, radius: f64, part: &Particle, dim: usize) -> Vec<Image> {
    let mut images = vec![Image::Identity];
    let x = part.position[dim];
    let range = config.range(dim);
    match config.types[dim] {
        BoundaryType::Periodic => {
            if is_near(x - config.range_min[dim], radius, range) {
                images.push(Image::Shift(range));
            }
            if is_near(config.range_max[dim] - x, radius, range) {
                images.push(Image::Shift(-range));
            }
        }
        BoundaryType::Mirror => {
            let negate_all = config.mirror_types[dim] == MirrorType::NoSlip;
            for side in [Side::Lower, Side::Upper] {
                if !config.is_side_enabled(dim, side) {
                    continue;
                }
                let wall = config.wall_position(dim, side);
                if is_near((x - wall).abs(), radius, range) {
                    images.push(Image::Reflect { wall, negate_all });
                }
            }
        }
        BoundaryType::None | BoundaryType::FreeSurface => (),
    }
    images
}

/// All ghosts of a single real particle, in a deterministic order.
fn ghosts_of(config: &BoundaryConfiguration, radius: f64, part: &Particle) -> Vec<Particle> {
    let per_dim = (0..config.dimension())
        .map(|d| images_in_dimension(config, radius, part, d))
        .collect::<Vec<_>>();
    if per_dim.iter().all(|images| images.len() == 1) {
        return vec![];
    }

    // Cartesian product of the per-dimension images, skipping the all-identity combination.
    let mut combinations: Vec<Vec<Image>> = vec![vec![]];
    for images in per_dim.iter() {
        combinations = combinations
            .into_iter()
            .flat_map(|prefix| {
                images.iter().map(move |image| {
                    let mut combination = prefix.clone();
                    combination.push(*image);
                    combination
                })
            })
            .collect();
    }

    combinations
        .into_iter()
        .filter(|combination| combination.iter().any(|image| *image != Image::Identity))
        .map(|combination| {
            let mut ghost = part.ghost_shifted(DVec3::ZERO);
            for (dim, image) in combination.into_iter().enumerate() {
                ghost = match image {
                    Image::Identity => ghost,
                    Image::Shift(shift) => {
                        ghost.position[dim] += shift;
                        ghost
                    }
                    Image::Reflect { wall, negate_all } => ghost.ghost_reflected(dim, wall, negate_all),
                };
            }
            ghost
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        boundary::BoundaryBuilder,
        errors::ConfigError,
        gas_law::{EquationOfState, GasLaw},
        utils::HydroDimension,
    };

    fn particle(id: usize, position: DVec3, velocity: DVec3) -> Particle {
        let gas_law = GasLaw::new(1.4, EquationOfState::Ideal);
        Particle::new(id, position, velocity, 0.01, 1., 2.5, 0.04, &gas_law)
    }

    fn periodic_1d() -> GhostParticleManager {
        let config = BoundaryBuilder::new(HydroDimension::HydroDimension1D)
            .with_periodic_boundaries()
            .in_range(DVec3::splat(-0.5), DVec3::splat(1.5))
            .build()
            .unwrap();
        let mut manager = GhostParticleManager::new();
        manager.initialize(config).unwrap();
        manager.set_kernel_support_radius(0.04).unwrap();
        manager
    }

    #[test]
    fn test_periodic_threshold() {
        let mut manager = periodic_1d();
        let real = vec![
            particle(0, DVec3::new(1.46, 0., 0.), DVec3::X),
            particle(1, DVec3::new(1.40, 0., 0.), DVec3::X),
        ];
        let ghosts = manager.generate_ghosts(&real).unwrap();
        assert_eq!(ghosts.len(), 1);
        assert_approx_eq!(f64, ghosts[0].position.x, -0.54, epsilon = 1e-12);
        assert!(ghosts[0].is_ghost());
        assert_eq!(ghosts[0].id, 0);
        let (ghost, source) = (&ghosts[0], &real[0]);
        assert_eq!(ghost.velocity, source.velocity);
        assert_eq!(ghost.mass, source.mass);
        assert_eq!(ghost.density, source.density);
        assert_eq!(ghost.internal_energy, source.internal_energy);
        assert_eq!(ghost.pressure, source.pressure);
        assert_eq!(ghost.sound_speed, source.sound_speed);
        assert_eq!(ghost.smoothing_length, source.smoothing_length);
        assert_eq!(manager.ghost_sources(), &[0]);
        assert_eq!(manager.source_particle_count(), 1);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let mut manager = periodic_1d();
        let real = (0..50)
            .map(|i| particle(i, DVec3::new(-0.5 + 0.04 * i as f64, 0., 0.), DVec3::ZERO))
            .collect::<Vec<_>>();
        let first = manager.generate_ghosts(&real).unwrap().to_vec();
        let second = manager.regenerate_ghosts(&real).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_periodic_corner() {
        let config = BoundaryBuilder::new(HydroDimension::HydroDimension2D)
            .with_periodic_boundaries()
            .in_range(DVec3::ZERO, DVec3::new(1., 1., 0.))
            .build()
            .unwrap();
        let mut manager = GhostParticleManager::new();
        manager.initialize(config).unwrap();
        manager.set_kernel_support_radius(0.1).unwrap();
        let real = vec![particle(0, DVec3::new(0.02, 0.03, 0.), DVec3::ZERO)];
        let ghosts = manager.generate_ghosts(&real).unwrap();
        assert_eq!(ghosts.len(), 3);
        let mut positions = ghosts.iter().map(|g| (g.position.x, g.position.y)).collect::<Vec<_>>();
        positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_approx_eq!(f64, positions[0].0, 0.02);
        assert_approx_eq!(f64, positions[0].1, 1.03);
        assert_approx_eq!(f64, positions[1].0, 1.02);
        assert_approx_eq!(f64, positions[1].1, 0.03);
        assert_approx_eq!(f64, positions[2].0, 1.02);
        assert_approx_eq!(f64, positions[2].1, 1.03);
    }

    #[test]
    fn test_mirror_ghosts() {
        let config = BoundaryBuilder::new(HydroDimension::HydroDimension2D)
            .with_periodic_in_dimension(0)
            .with_mirror_in_dimension(1, MirrorType::FreeSlip)
            .with_particle_spacing(DVec3::new(0.02, 0.02, 0.))
            .in_range(DVec3::ZERO, DVec3::new(1., 1., 0.))
            .build()
            .unwrap();
        let mut manager = GhostParticleManager::new();
        manager.initialize(config).unwrap();
        manager.set_kernel_support_radius(0.05).unwrap();
        let real = vec![particle(0, DVec3::new(0.5, 0.01, 0.), DVec3::new(0.3, -0.2, 0.))];
        let ghosts = manager.generate_ghosts(&real).unwrap();
        assert_eq!(ghosts.len(), 1);
        // wall at -0.01
        assert_approx_eq!(f64, ghosts[0].position.y, -0.03);
        assert_approx_eq!(f64, ghosts[0].position.x, 0.5);
        assert_approx_eq!(f64, ghosts[0].velocity.x, 0.3);
        assert_approx_eq!(f64, ghosts[0].velocity.y, 0.2);
    }

    #[test]
    fn test_no_slip_mirror() {
        let config = BoundaryBuilder::new(HydroDimension::HydroDimension1D)
            .with_mirror_boundaries(MirrorType::NoSlip)
            .in_range(DVec3::ZERO, DVec3::ONE)
            .build()
            .unwrap();
        let mut manager = GhostParticleManager::new();
        manager.initialize(config).unwrap();
        manager.set_kernel_support_radius(0.1).unwrap();
        let real = vec![particle(0, DVec3::new(0.95, 0., 0.), DVec3::new(1., 2., 3.))];
        let ghosts = manager.generate_ghosts(&real).unwrap();
        assert_eq!(ghosts.len(), 1);
        assert_approx_eq!(f64, ghosts[0].position.x, 1.05);
        assert_eq!(ghosts[0].velocity, DVec3::new(-1., -2., -3.));
    }

    #[test]
    fn test_uninitialized() {
        let mut manager = GhostParticleManager::new();
        assert_eq!(
            manager.set_kernel_support_radius(0.1),
            Err(BoundaryError::Uninitialized)
        );
        assert_eq!(manager.generate_ghosts(&[]).err(), Some(BoundaryError::Uninitialized));
        assert_eq!(manager.get_ghost_particles().err(), Some(BoundaryError::Uninitialized));
        assert_eq!(
            manager.apply_periodic_wrapping(&mut []),
            Err(BoundaryError::Uninitialized)
        );
        assert!(!manager.has_ghosts());
    }

    #[test]
    fn test_invalid_inputs() {
        let mut manager = periodic_1d();
        assert_eq!(
            manager.set_kernel_support_radius(-1.),
            Err(BoundaryError::InvalidSupportRadius(-1.))
        );
        assert_approx_eq!(f64, manager.kernel_support_radius(), 0.04);

        let mut config = manager.config().unwrap().clone();
        config.is_valid = false;
        assert!(matches!(
            manager.initialize(config),
            Err(BoundaryError::Config(ConfigError::InvalidBoundary(_)))
        ));
    }

    #[test]
    fn test_periodic_wrapping() {
        let manager = periodic_1d();
        let mut real = vec![
            particle(0, DVec3::new(1.6, 0., 0.), DVec3::ZERO),
            particle(1, DVec3::new(-0.7, 0., 0.), DVec3::ZERO),
            particle(2, DVec3::new(0.2, 0., 0.), DVec3::ZERO),
        ];
        manager.apply_periodic_wrapping(&mut real).unwrap();
        assert_approx_eq!(f64, real[0].position.x, -0.4, epsilon = 1e-12);
        assert_approx_eq!(f64, real[1].position.x, 1.3, epsilon = 1e-12);
        assert_approx_eq!(f64, real[2].position.x, 0.2);
    }

    #[test]
    fn test_periodic_wrapping_leaves_blown_up_particles() {
        let manager = periodic_1d();
        let mut real = vec![
            particle(0, DVec3::new(f64::INFINITY, 0., 0.), DVec3::ZERO),
            particle(1, DVec3::new(1e20, 0., 0.), DVec3::ZERO),
            particle(2, DVec3::new(f64::NAN, 0., 0.), DVec3::ZERO),
        ];
        manager.apply_periodic_wrapping(&mut real).unwrap();
        assert_eq!(real[0].position.x, f64::INFINITY);
        assert!(real[1].position.x >= -0.5 && real[1].position.x < 1.5);
        assert!(real[2].position.x.is_nan());
    }
}
