use glam::DVec3;

use crate::gas_law::GasLaw;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParticleType {
    #[default]
    Real,
    Ghost,
}

/// Spatial gradients of the primitive quantities of a particle.
///
/// These are estimated by the surrounding solver; the flux step only projects them
/// onto the pair separation.
#[derive(Default, Debug, Clone, Copy)]
pub struct PrimitiveGradients {
    pub density: DVec3,
    /// Row `k` holds the gradient of velocity component `k`.
    pub velocity: [DVec3; 3],
    pub pressure: DVec3,
}

impl PrimitiveGradients {
    pub fn zeros() -> Self {
        Self {
            density: DVec3::ZERO,
            velocity: [DVec3::ZERO; 3],
            pressure: DVec3::ZERO,
        }
    }

    /// Change in the velocity component along `e` when moving by `dx`.
    pub fn normal_velocity_change(&self, e: DVec3, dx: DVec3) -> f64 {
        e.x * self.velocity[0].dot(dx) + e.y * self.velocity[1].dot(dx) + e.z * self.velocity[2].dot(dx)
    }

    /// Reflect the gradients across the wall normal to `axis`.
    ///
    /// `negate_all` flips every velocity component (no-slip), otherwise only the
    /// normal component is flipped (free-slip).
    pub fn reflect(&self, axis: usize, negate_all: bool) -> Self {
        let mut reflected = *self;
        reflected.density[axis] = -reflected.density[axis];
        reflected.pressure[axis] = -reflected.pressure[axis];
        for (k, row) in reflected.velocity.iter_mut().enumerate() {
            // Spatial derivative across the wall flips sign...
            row[axis] = -row[axis];
            // ...and so does every velocity component that gets negated.
            if negate_all || k == axis {
                *row = -*row;
            }
        }
        reflected
    }

    pub fn is_finite(&self) -> bool {
        self.density.is_finite()
            && self.velocity.iter().all(|row| row.is_finite())
            && self.pressure.is_finite()
    }
}

#[derive(Default, Debug, Clone)]
pub struct Particle {
    pub id: usize,
    pub kind: ParticleType,
    pub position: DVec3,
    pub velocity: DVec3,
    pub mass: f64,
    pub density: f64,
    pub pressure: f64,
    /// Specific internal energy
    pub internal_energy: f64,
    pub sound_speed: f64,
    pub smoothing_length: f64,
    pub gradients: PrimitiveGradients,
}

impl Particle {
    /// Creates a real particle, deriving pressure and sound speed from the gas law.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        position: DVec3,
        velocity: DVec3,
        mass: f64,
        density: f64,
        internal_energy: f64,
        smoothing_length: f64,
        gas_law: &GasLaw,
    ) -> Self {
        let pressure = gas_law.gas_pressure_from_internal_energy(internal_energy, density);
        let sound_speed = gas_law.sound_speed(pressure, 1. / density);
        Self {
            id,
            kind: ParticleType::Real,
            position,
            velocity,
            mass,
            density,
            pressure,
            internal_energy,
            sound_speed,
            smoothing_length,
            gradients: PrimitiveGradients::zeros(),
        }
    }

    pub fn with_gradients(mut self, gradients: PrimitiveGradients) -> Self {
        self.gradients = gradients;
        self
    }

    pub fn is_ghost(&self) -> bool {
        self.kind == ParticleType::Ghost
    }

    /// A ghost copy of this particle, displaced by `shift`.
    pub fn ghost_shifted(&self, shift: DVec3) -> Self {
        let mut ghost = self.clone();
        ghost.kind = ParticleType::Ghost;
        ghost.position += shift;
        ghost
    }

    /// A ghost copy of this particle, mirrored in the wall at `wall` normal to `axis`.
    pub fn ghost_reflected(&self, axis: usize, wall: f64, negate_all: bool) -> Self {
        let mut ghost = self.clone();
        ghost.kind = ParticleType::Ghost;
        ghost.position[axis] = 2. * wall - self.position[axis];
        if negate_all {
            ghost.velocity = -ghost.velocity;
        } else {
            ghost.velocity[axis] = -ghost.velocity[axis];
        }
        ghost.gradients = self.gradients.reflect(axis, negate_all);
        ghost
    }
}
