use super::{RiemannSolution, RiemannSolver, RiemannState, RoeAverages};

/// Relative size of `|C_L - C_R|` below which the wave speeds are treated as coincident.
pub const DEGENERATE_WAVE_TOLERANCE: f64 = 1e-12;

/// HLL Riemann solver with Roe-averaged (Einfeldt) wave speed estimates.
///
/// See Section 10.3 and 10.5 in Toro (2009)
pub struct HllRiemannSolver;

impl HllRiemannSolver {
    /// Estimates of the fastest left and right going signal speeds.
    pub fn wave_speeds(left: &RiemannState, right: &RiemannState) -> (f64, f64) {
        let roe = RoeAverages::new(left, right);
        let s_l = (left.velocity - left.sound_speed).min(roe.velocity - roe.sound_speed);
        let s_r = (right.velocity + right.sound_speed).max(roe.velocity + roe.sound_speed);
        (s_l, s_r)
    }
}

impl RiemannSolver for HllRiemannSolver {
    fn solve(&self, left: &RiemannState, right: &RiemannState) -> RiemannSolution {
        if !left.is_valid() || !right.is_valid() {
            return RiemannSolution::average(left, right);
        }

        let (s_l, s_r) = Self::wave_speeds(left, right);

        // Lagrangian wave speeds
        let c_l = left.density * (s_l - left.velocity);
        let c_r = right.density * (s_r - right.velocity);
        let c_l_m_c_r = c_l - c_r;

        // Both states are at rest and cold: no waves to separate them.
        let scale = left.density * (left.velocity.abs() + left.sound_speed)
            + right.density * (right.velocity.abs() + right.sound_speed);
        if c_l_m_c_r.abs() <= DEGENERATE_WAVE_TOLERANCE * scale {
            return RiemannSolution::average(left, right);
        }

        let f_l = left.pressure - left.velocity * c_l;
        let f_r = right.pressure - right.velocity * c_r;

        RiemannSolution {
            pressure: (c_l * f_r - c_r * f_l) / c_l_m_c_r,
            velocity: (f_r - f_l) / c_l_m_c_r,
        }
    }

    fn name(&self) -> &'static str {
        "HLL"
    }
}
