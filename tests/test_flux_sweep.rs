use common::{get_boundary, get_gas_law, get_manager, uniform_lattice, PERIODIC_2D_CONFIG};
use glam::DVec3;
use gsph_hydro::{
    GsphForce, HydroDimension, InitialConditions, KernelKind, PrimitiveGradients, Reconstruction,
    RiemannSolverKind, SlopeLimiter,
};

mod common;

const CLOSED_BOX_CONFIG: &str = r##"
dimensionality: 2
range_min: [0., 0.]
range_max: [1., 1.]
types: "mirror"
mirror_types: "free_slip"
"##;

const TUBE_CONFIG: &str = r##"
dimensionality: 1
range_min: [0.]
range_max: [1.]
types: "mirror"
"##;

fn get_force(
    solver: RiemannSolverKind,
    reconstruction: Reconstruction,
    dimension: HydroDimension,
) -> GsphForce<RiemannSolverKind, KernelKind> {
    GsphForce::new(
        solver,
        reconstruction,
        KernelKind::CubicSpline,
        get_gas_law(),
        dimension,
    )
}

#[test]
fn test_uniform_periodic_lattice_is_in_equilibrium() {
    let boundary = get_boundary(PERIODIC_2D_CONFIG);
    let ics = uniform_lattice(&boundary, 12, 2.7);
    let radius = ics.smoothing_length();
    let mut manager = get_manager(PERIODIC_2D_CONFIG, radius);
    let real = ics.particles();
    let ghosts = manager.generate_ghosts(real).unwrap();

    for solver in [RiemannSolverKind::Hll, RiemannSolverKind::Pvrs] {
        for reconstruction in [
            Reconstruction::FirstOrder,
            Reconstruction::Muscl(SlopeLimiter::VanLeer),
        ] {
            let force = get_force(solver, reconstruction, boundary.dimensionality);

            let with_ghosts = force.compute_rates(real, ghosts, radius, 1e-3);
            assert_eq!(with_ghosts.fallback_pairs, 0);
            for rates in with_ghosts.rates.iter() {
                assert!(rates.acceleration.length() < 1e-10, "{:?}", rates);
                assert!(rates.energy_rate.abs() < 1e-10);
                assert_eq!(rates.neighbours, with_ghosts.rates[0].neighbours);
            }

            let without_ghosts = force.compute_rates(real, &[], radius, 1e-3);
            let max_acceleration = without_ghosts
                .rates
                .iter()
                .map(|r| r.acceleration.length())
                .fold(0., f64::max);
            assert!(max_acceleration > 1e-3);
        }
    }
}

#[test]
fn test_closed_box_at_rest() {
    let boundary = get_boundary(CLOSED_BOX_CONFIG);
    let ics = uniform_lattice(&boundary, 10, 2.7);
    let radius = ics.smoothing_length();
    let mut manager = get_manager(CLOSED_BOX_CONFIG, radius);
    let real = ics.particles();
    let ghosts = manager.generate_ghosts(real).unwrap();
    assert!(ghosts.iter().all(|g| g.velocity == DVec3::ZERO));

    let force = get_force(
        RiemannSolverKind::Hll,
        Reconstruction::FirstOrder,
        boundary.dimensionality,
    );
    let sweep = force.compute_rates(real, ghosts, radius, 0.);
    for rates in sweep.rates.iter() {
        assert!(rates.acceleration.length() < 1e-10, "{:?}", rates);
    }
}

#[test]
fn test_sod_shock_pushes_towards_low_pressure() {
    let boundary = get_boundary(TUBE_CONFIG);
    let ics = InitialConditions::lattice(
        boundary.range_min,
        boundary.range_max,
        100,
        boundary.dimensionality,
        2.5,
        &get_gas_law(),
        |x| {
            if x.x < 0.5 {
                (1., DVec3::ZERO, 1., PrimitiveGradients::zeros())
            } else {
                (0.125, DVec3::ZERO, 0.1, PrimitiveGradients::zeros())
            }
        },
    );
    let radius = ics.smoothing_length();
    let mut manager = get_manager(TUBE_CONFIG, radius);
    let real = ics.particles();
    let ghosts = manager.generate_ghosts(real).unwrap();

    let force = get_force(
        RiemannSolverKind::Hll,
        Reconstruction::FirstOrder,
        boundary.dimensionality,
    );
    let sweep = force.compute_rates(real, ghosts, radius, 0.);
    assert_eq!(sweep.fallback_pairs, 0);
    for (part, rates) in real.iter().zip(sweep.rates.iter()) {
        assert!(rates.acceleration.x > -1e-9, "{:?}", rates);
        if (part.position.x - 0.5).abs() < 0.02 {
            assert!(rates.acceleration.x > 1., "{:?}", rates);
            // expansion cools the high pressure side, compression heats the low pressure side
            if part.position.x < 0.5 {
                assert!(rates.energy_rate < 0., "{:?}", rates);
            } else {
                assert!(rates.energy_rate > 0., "{:?}", rates);
            }
        }
        if (part.position.x - 0.5).abs() > 0.05 {
            assert!(rates.acceleration.x.abs() < 1e-9, "{:?}", rates);
        }
    }
}
