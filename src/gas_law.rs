use yaml_rust::Yaml;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy)]
pub enum EquationOfState {
    Ideal,
    Isothermal { isothermal_internal_energy: f64 },
}

/// Closes the Euler equations: relates pressure, density and specific internal energy.
#[derive(Debug, Clone, Copy)]
pub struct GasLaw {
    gamma: f64,
    odgm1: f64,
    eos: EquationOfState,
}

impl GasLaw {
    pub fn new(gamma: f64, eos: EquationOfState) -> Self {
        Self {
            gamma,
            odgm1: 1. / (gamma - 1.),
            eos,
        }
    }

    /// Reads `gamma` and `equation_of_state` (default `"Ideal"`) from the hydrodynamics section.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let gamma = cfg["gamma"]
            .as_f64()
            .ok_or(ConfigError::MissingParameter("hydrodynamics:gamma".to_string()))?;
        let kind = cfg["equation_of_state"].as_str().unwrap_or("Ideal");
        let eos = match kind {
            "Ideal" => EquationOfState::Ideal,
            "Isothermal" => {
                let isothermal_internal_energy = cfg["isothermal_internal_energy"].as_f64().ok_or(
                    ConfigError::MissingParameter(
                        "hydrodynamics:isothermal_internal_energy".to_string(),
                    ),
                )?;
                EquationOfState::Isothermal {
                    isothermal_internal_energy,
                }
            }
            _ => return Err(ConfigError::UnknownEOS(kind.to_string())),
        };
        Ok(Self::new(gamma, eos))
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Specific internal energy
    pub fn gas_internal_energy_from_pressure(&self, pressure: f64, density_inv: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => pressure * density_inv * self.odgm1,
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => isothermal_internal_energy,
        }
    }

    pub fn gas_pressure_from_internal_energy(&self, internal_energy: f64, density: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => (self.gamma - 1.) * internal_energy * density,
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => (self.gamma - 1.) * isothermal_internal_energy * density,
        }
    }

    /// Adiabatic sound speed. Negative pressures or densities give NaN, which
    /// downstream validity checks treat as an unphysical state.
    pub fn sound_speed(&self, pressure: f64, density_inv: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => (self.gamma * pressure * density_inv).sqrt(),
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => f64::sqrt(isothermal_internal_energy * self.gamma * (self.gamma - 1.)),
        }
    }
}
