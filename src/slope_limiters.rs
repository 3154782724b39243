//! Slope limiters for MUSCL reconstruction of pair-interface states.
//!
//! Every limiter takes the jump between the two particles of a pair (the
//! upstream gradient) and the particle's own gradient projected on the pair
//! separation (the local gradient), and returns a limited slope. All variants
//! are TVD: they return zero at local extrema and never exceed twice the larger
//! of the two inputs.

use std::{fmt::Display, str::FromStr};

use yaml_rust::Yaml;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeLimiter {
    /// van Leer (1979): harmonic mean of the two slopes.
    VanLeer,
    /// The smaller slope in magnitude; the most diffusive choice.
    MinMod,
    /// Roe (1985): most compressive of the second order TVD limiters.
    Superbee,
    /// Monotonised central (van Leer 1977).
    MonotonizedCentral,
}

impl SlopeLimiter {
    pub fn limit(&self, upstream_gradient: f64, local_gradient: f64) -> f64 {
        // Opposite signs, zeros and NaNs are all treated as an extremum.
        if !(upstream_gradient > 0. && local_gradient > 0.)
            && !(upstream_gradient < 0. && local_gradient < 0.)
        {
            return 0.;
        }
        let sign = upstream_gradient.signum();
        let a = upstream_gradient.abs();
        let b = local_gradient.abs();
        let limited = match self {
            // 2ab / (a + b), written so that it never overflows
            SlopeLimiter::VanLeer => 2. / (a.recip() + b.recip()),
            SlopeLimiter::MinMod => a.min(b),
            SlopeLimiter::Superbee => (2. * a).min(b).max(a.min(2. * b)),
            SlopeLimiter::MonotonizedCentral => (2. * a).min(2. * b).min(0.5 * a + 0.5 * b),
        };
        sign * limited
    }

    pub fn name(&self) -> &'static str {
        match self {
            SlopeLimiter::VanLeer => "VanLeer",
            SlopeLimiter::MinMod => "MinMod",
            SlopeLimiter::Superbee => "Superbee",
            SlopeLimiter::MonotonizedCentral => "MC",
        }
    }

    pub fn all() -> [SlopeLimiter; 4] {
        [
            SlopeLimiter::VanLeer,
            SlopeLimiter::MinMod,
            SlopeLimiter::Superbee,
            SlopeLimiter::MonotonizedCentral,
        ]
    }

    /// Reads the `slope_limiter` entry of the hydrodynamics section.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        cfg["slope_limiter"]
            .as_str()
            .ok_or(ConfigError::MissingParameter(
                "hydrodynamics:slope_limiter".to_string(),
            ))?
            .parse()
    }
}

impl FromStr for SlopeLimiter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vanleer" | "van_leer" => Ok(SlopeLimiter::VanLeer),
            "minmod" | "min_mod" => Ok(SlopeLimiter::MinMod),
            "superbee" => Ok(SlopeLimiter::Superbee),
            "mc" | "monotonized_central" => Ok(SlopeLimiter::MonotonizedCentral),
            _ => Err(ConfigError::UnknownSlopeLimiter(s.to_string())),
        }
    }
}

impl Display for SlopeLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
