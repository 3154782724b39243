use super::{RiemannSolution, RiemannSolver, RiemannState};

/// Primitive variable Riemann solver.
///
/// See Section 9.3 in Toro (2009)
pub struct PVRiemannSolver;

impl PVRiemannSolver {
    pub(super) fn rho_bar(rho_l: f64, rho_r: f64) -> f64 {
        0.5 * (rho_l + rho_r)
    }

    pub(super) fn p_bar(p_l: f64, p_r: f64) -> f64 {
        0.5 * (p_l + p_r)
    }

    pub(super) fn a_bar(a_l: f64, a_r: f64) -> f64 {
        0.5 * (a_l + a_r)
    }

    pub(super) fn p_star(rho_bar: f64, p_bar: f64, a_bar: f64, v_l: f64, v_r: f64) -> f64 {
        p_bar + 0.5 * (v_l - v_r) * rho_bar * a_bar
    }
}

impl RiemannSolver for PVRiemannSolver {
    fn solve(&self, left: &RiemannState, right: &RiemannState) -> RiemannSolution {
        if !left.is_valid() || !right.is_valid() {
            return RiemannSolution::average(left, right);
        }

        let rho_bar = Self::rho_bar(left.density, right.density);
        let p_bar = Self::p_bar(left.pressure, right.pressure);
        let a_bar = Self::a_bar(left.sound_speed, right.sound_speed);
        let impedance = rho_bar * a_bar;
        if impedance <= 0. {
            return RiemannSolution::average(left, right);
        }

        let p = Self::p_star(rho_bar, p_bar, a_bar, left.velocity, right.velocity).max(0.);
        let u = 0.5 * ((left.velocity + right.velocity) + (left.pressure - right.pressure) / impedance);

        RiemannSolution::new(p, u)
    }

    fn name(&self) -> &'static str {
        "PVRS"
    }
}
