use clap::Parser;
use glam::DVec3;
use gsph_hydro::{
    BoundaryConfiguration, ConfigError, GasLaw, GhostParticleManager, GsphForce, HydroDimension,
    InitialConditions, KernelKind, Reconstruction, RiemannSolver, RiemannSolverKind,
};
use std::{error::Error, fs, path::PathBuf};
use yaml_rust::{Yaml, YamlLoader};

struct HydroCfg {
    gas_law: GasLaw,
    riemann_solver: RiemannSolverKind,
}

impl HydroCfg {
    fn parse(yaml: &Yaml) -> Result<Self, ConfigError> {
        Ok(Self {
            gas_law: GasLaw::init(yaml)?,
            riemann_solver: RiemannSolverKind::init(&yaml["riemann_solver"])?,
        })
    }
}

struct FluxCfg {
    reconstruction: Reconstruction,
    dt: f64,
}

impl FluxCfg {
    fn parse(yaml: &Yaml) -> Result<Self, ConfigError> {
        let reconstruction = Reconstruction::init(yaml)?;
        let dt = yaml["dt"]
            .as_f64()
            .ok_or(ConfigError::MissingParameter("flux:dt".to_string()))?;
        Ok(Self { reconstruction, dt })
    }
}

struct Config {
    hydro: HydroCfg,
    kernel: KernelKind,
    flux: FluxCfg,
    boundary: BoundaryConfiguration,
    initial_conditions: Yaml,
}

impl Config {
    fn parse(file: PathBuf) -> Result<Self, Box<dyn Error>> {
        let docs = YamlLoader::load_from_str(&fs::read_to_string(file)?)?;
        let config_yml = docs
            .first()
            .ok_or(ConfigError::MissingParameter("configuration document".to_string()))?;

        Ok(Self {
            hydro: HydroCfg::parse(&config_yml["hydrodynamics"])?,
            kernel: KernelKind::init(&config_yml["kernel"])?,
            flux: FluxCfg::parse(&config_yml["flux"])?,
            boundary: BoundaryConfiguration::init(&config_yml["boundary"])?,
            initial_conditions: config_yml["initial_conditions"].clone(),
        })
    }
}

#[derive(Parser)]
pub struct Cli {
    /// The path to the config file to read
    #[clap(value_parser)]
    pub config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse command line parameters
    let args = Cli::parse();

    // read configuration
    let config = Config::parse(args.config)?;
    let dimension: HydroDimension = config.boundary.dimensionality;
    let gas_law = config.hydro.gas_law;

    // Setup ICs
    let ics = InitialConditions::init(
        &config.initial_conditions,
        config.boundary.range_min,
        config.boundary.range_max,
        dimension,
        &gas_law,
    )?;
    let support_radius = ics.smoothing_length();
    let mut particles = ics.into_particles();

    // Ghosts
    let mut ghost_manager = GhostParticleManager::new();
    ghost_manager.initialize(config.boundary)?;
    ghost_manager.set_kernel_support_radius(support_radius)?;
    ghost_manager.apply_periodic_wrapping(&mut particles)?;
    let ghost_count = ghost_manager.generate_ghosts(&particles)?.len();
    log::info!(
        "{} ghosts created from {} of {} particles",
        ghost_count,
        ghost_manager.source_particle_count(),
        particles.len()
    );

    // One sweep over all pairs
    let force = GsphForce::new(
        config.hydro.riemann_solver,
        config.flux.reconstruction,
        config.kernel,
        gas_law,
        dimension,
    );
    let ghosts = ghost_manager.get_ghost_particles()?;
    let sweep = force.compute_rates(&particles, ghosts, support_radius, config.flux.dt);

    let mut momentum_rate = DVec3::ZERO;
    let mut energy_rate = 0.;
    let mut max_acceleration: f64 = 0.;
    for (part, rates) in particles.iter().zip(sweep.rates.iter()) {
        momentum_rate += part.mass * rates.acceleration;
        energy_rate += part.mass * (rates.energy_rate + part.velocity.dot(rates.acceleration));
        max_acceleration = max_acceleration.max(rates.acceleration.length());
    }
    let mean_neighbours = sweep.rates.iter().map(|r| r.neighbours).sum::<usize>() as f64
        / sweep.rates.len().max(1) as f64;
    log::info!(
        "{} solver: mean neighbours {:.1}, max |a| {:.6e}, fallback pairs {}",
        force.riemann_solver().name(),
        mean_neighbours,
        max_acceleration,
        sweep.fallback_pairs
    );
    log::info!(
        "Total momentum rate: {:?}, total energy rate: {:.6e}",
        momentum_rate.to_array(),
        energy_rate
    );

    println!("Done!");
    Ok(())
}
