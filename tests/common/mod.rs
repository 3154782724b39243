#![allow(dead_code)]

use glam::DVec3;
use gsph_hydro::{
    BoundaryConfiguration, GasLaw, GhostParticleManager, InitialConditions,
    Particle, PrimitiveGradients,
};
use yaml_rust::YamlLoader;

pub const HYDRO_CONFIG: &str = r##"
gamma: 1.4
equation_of_state: "Ideal"
riemann_solver:
  kind: "HLL"
"##;

pub const PERIODIC_1D_CONFIG: &str = r##"
dimensionality: 1
range_min: [-0.5]
range_max: [1.5]
types: "periodic"
"##;

pub const PERIODIC_2D_CONFIG: &str = r##"
dimensionality: 2
range_min: [0., 0.]
range_max: [1., 1.]
types: ["periodic", "periodic"]
"##;

pub const CHANNEL_2D_CONFIG: &str = r##"
dimensionality: 2
range_min: [0., 0.]
range_max: [1., 0.5]
types: ["periodic", "mirror"]
mirror_types: ["free_slip", "no_slip"]
particle_spacing: [0.05, 0.05]
"##;

pub fn get_gas_law() -> GasLaw {
    let docs = YamlLoader::load_from_str(HYDRO_CONFIG).unwrap();
    GasLaw::init(&docs[0]).unwrap()
}

pub fn get_boundary(config: &str) -> BoundaryConfiguration {
    let docs = YamlLoader::load_from_str(config).unwrap();
    BoundaryConfiguration::init(&docs[0]).unwrap()
}

pub fn get_manager(config: &str, support_radius: f64) -> GhostParticleManager {
    let mut manager = GhostParticleManager::new();
    manager.initialize(get_boundary(config)).unwrap();
    manager.set_kernel_support_radius(support_radius).unwrap();
    manager
}

pub fn particle_at(id: usize, position: DVec3, velocity: DVec3) -> Particle {
    Particle::new(id, position, velocity, 0.01, 1., 2.5, 0.04, &get_gas_law())
}

/// Uniform gas at rest on a lattice filling the domain of `boundary`.
pub fn uniform_lattice(
    boundary: &BoundaryConfiguration,
    num_part: usize,
    smoothing_factor: f64,
) -> InitialConditions {
    InitialConditions::lattice(
        boundary.range_min,
        boundary.range_max,
        num_part,
        boundary.dimensionality,
        smoothing_factor,
        &get_gas_law(),
        |_| (1., DVec3::ZERO, 1., PrimitiveGradients::zeros()),
    )
}
