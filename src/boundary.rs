use std::{fmt::Display, str::FromStr};

use glam::DVec3;
use yaml_rust::Yaml;

use crate::{
    errors::ConfigError,
    utils::{parse_dvec3, HydroDimension},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryType {
    /// Open boundary, no ghosts.
    #[default]
    None,
    Periodic,
    Mirror,
    /// Reserved for free-surface flows; generates no ghosts.
    FreeSurface,
}

impl FromStr for BoundaryType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(BoundaryType::None),
            "periodic" => Ok(BoundaryType::Periodic),
            "mirror" => Ok(BoundaryType::Mirror),
            "free_surface" => Ok(BoundaryType::FreeSurface),
            _ => Err(ConfigError::UnknownBoundaryType(s.to_string())),
        }
    }
}

impl Display for BoundaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoundaryType::None => "none",
            BoundaryType::Periodic => "periodic",
            BoundaryType::Mirror => "mirror",
            BoundaryType::FreeSurface => "free_surface",
        };
        write!(f, "{name}")
    }
}

/// Velocity treatment of mirror ghosts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MirrorType {
    /// Every velocity component is reversed.
    NoSlip,
    /// Only the wall-normal component is reversed.
    #[default]
    FreeSlip,
}

impl FromStr for MirrorType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_slip" => Ok(MirrorType::NoSlip),
            "free_slip" => Ok(MirrorType::FreeSlip),
            _ => Err(ConfigError::UnknownMirrorType(s.to_string())),
        }
    }
}

impl Display for MirrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MirrorType::NoSlip => write!(f, "no_slip"),
            MirrorType::FreeSlip => write!(f, "free_slip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

/// Per-dimension boundary conditions of a rectangular domain.
///
/// Only the first `dimensionality` entries of the per-dimension arrays are meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConfiguration {
    pub is_valid: bool,
    pub dimensionality: HydroDimension,
    pub types: [BoundaryType; 3],
    pub enable_lower: [bool; 3],
    pub enable_upper: [bool; 3],
    pub mirror_types: [MirrorType; 3],
    /// Initial particle spacing per dimension, used to place mirror walls.
    pub particle_spacing: DVec3,
    pub range_min: DVec3,
    pub range_max: DVec3,
}

impl BoundaryConfiguration {
    /// An enabled configuration without any boundaries.
    pub fn new(dimensionality: HydroDimension, range_min: DVec3, range_max: DVec3) -> Self {
        Self {
            is_valid: true,
            dimensionality,
            types: [BoundaryType::None; 3],
            enable_lower: [true; 3],
            enable_upper: [true; 3],
            mirror_types: [MirrorType::FreeSlip; 3],
            particle_spacing: DVec3::ZERO,
            range_min,
            range_max,
        }
    }

    /// Reads the `boundary` section of the configuration.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let dimensionality = HydroDimension::init(&cfg["dimensionality"])?;
        let count = dimensionality.count();
        let range_min = parse_dvec3(&cfg["range_min"], "boundary:range_min", dimensionality)?;
        let range_max = parse_dvec3(&cfg["range_max"], "boundary:range_max", dimensionality)?;
        let mut config = Self::new(dimensionality, range_min, range_max);

        if cfg["types"].is_badvalue() {
            return Err(ConfigError::MissingParameter("boundary:types".to_string()));
        }
        per_dimension(&cfg["types"], count, &mut config.types, |y| {
            as_str(y)?.parse()
        })?;
        per_dimension(&cfg["mirror_types"], count, &mut config.mirror_types, |y| {
            as_str(y)?.parse()
        })?;
        per_dimension(&cfg["enable_lower"], count, &mut config.enable_lower, as_bool)?;
        per_dimension(&cfg["enable_upper"], count, &mut config.enable_upper, as_bool)?;
        if !cfg["particle_spacing"].is_badvalue() {
            config.particle_spacing =
                parse_dvec3(&cfg["particle_spacing"], "boundary:particle_spacing", dimensionality)?;
        }
        config.is_valid = cfg["enabled"].as_bool().unwrap_or(true);

        for d in 0..count {
            log::info!(
                "Boundary in dimension {}: {} (mirror: {})",
                d,
                config.types[d],
                config.mirror_types[d]
            );
        }
        Ok(config)
    }

    pub fn dimension(&self) -> usize {
        self.dimensionality.count()
    }

    pub fn range(&self, dim: usize) -> f64 {
        self.range_max[dim] - self.range_min[dim]
    }

    pub fn has_periodic(&self) -> bool {
        self.types[..self.dimension()]
            .iter()
            .any(|t| *t == BoundaryType::Periodic)
    }

    pub fn has_mirror(&self) -> bool {
        self.types[..self.dimension()]
            .iter()
            .any(|t| *t == BoundaryType::Mirror)
    }

    pub fn is_side_enabled(&self, dim: usize, side: Side) -> bool {
        match side {
            Side::Lower => self.enable_lower[dim],
            Side::Upper => self.enable_upper[dim],
        }
    }

    /// Position of a mirror wall: half a particle spacing outside the outermost particles
    /// (Morris et al. 1997).
    pub fn wall_position(&self, dim: usize, side: Side) -> f64 {
        let offset = 0.5 * self.particle_spacing[dim];
        match side {
            Side::Lower => self.range_min[dim] - offset,
            Side::Upper => self.range_max[dim] + offset,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_valid {
            return Err(ConfigError::InvalidBoundary(
                "boundary configuration is disabled".to_string(),
            ));
        }
        for d in 0..self.dimension() {
            let (min, max) = (self.range_min[d], self.range_max[d]);
            if !min.is_finite() || !max.is_finite() || max <= min {
                return Err(ConfigError::InvalidBoundary(format!(
                    "empty or non-finite range [{min}, {max}] in dimension {d}"
                )));
            }
            let spacing = self.particle_spacing[d];
            if !spacing.is_finite() || spacing < 0. {
                return Err(ConfigError::InvalidBoundary(format!(
                    "invalid particle spacing {spacing} in dimension {d}"
                )));
            }
        }
        Ok(())
    }
}

fn as_str(yaml: &Yaml) -> Result<&str, ConfigError> {
    yaml.as_str()
        .ok_or_else(|| ConfigError::InvalidArrayFormat(format!("{:?}", yaml)))
}

fn as_bool(yaml: &Yaml) -> Result<bool, ConfigError> {
    yaml.as_bool()
        .ok_or_else(|| ConfigError::InvalidArrayFormat(format!("{:?}", yaml)))
}

/// Fills `values` from either a single scalar (applied to every dimension) or an array
/// with one entry per dimension. Missing entries keep their defaults.
fn per_dimension<T, F>(yaml: &Yaml, count: usize, values: &mut [T; 3], parse: F) -> Result<(), ConfigError>
where
    F: Fn(&Yaml) -> Result<T, ConfigError>,
    T: Copy,
{
    match yaml {
        Yaml::BadValue | Yaml::Null => Ok(()),
        Yaml::Array(arr) => {
            if arr.len() != count {
                return Err(ConfigError::InvalidArrayLength(count, arr.len()));
            }
            for (value, y) in values.iter_mut().zip(arr) {
                *value = parse(y)?;
            }
            Ok(())
        }
        _ => {
            let value = parse(yaml)?;
            values[..count].fill(value);
            Ok(())
        }
    }
}

/// Fluent construction of a [`BoundaryConfiguration`].
///
/// Errors (unknown dimensions, missing range) are collected and reported by [`BoundaryBuilder::build`].
#[derive(Debug, Clone)]
pub struct BoundaryBuilder {
    config: BoundaryConfiguration,
    range_set: bool,
    error: Option<ConfigError>,
}

impl BoundaryBuilder {
    pub fn new(dimensionality: HydroDimension) -> Self {
        let mut config = BoundaryConfiguration::new(dimensionality, DVec3::ZERO, DVec3::ZERO);
        config.is_valid = false;
        Self {
            config,
            range_set: false,
            error: None,
        }
    }

    fn set_type(mut self, dim: usize, boundary_type: BoundaryType) -> Self {
        if dim >= self.config.dimension() {
            if self.error.is_none() {
                self.error = Some(ConfigError::InvalidBoundary(format!(
                    "dimension {dim} out of range for a {}D configuration",
                    self.config.dimension()
                )));
            }
        } else {
            self.config.types[dim] = boundary_type;
            self.config.is_valid = true;
        }
        self
    }

    pub fn with_periodic_boundaries(mut self) -> Self {
        for d in 0..self.config.dimension() {
            self = self.with_periodic_in_dimension(d);
        }
        self
    }

    pub fn with_periodic_in_dimension(self, dim: usize) -> Self {
        self.set_type(dim, BoundaryType::Periodic)
    }

    pub fn with_mirror_boundaries(mut self, mirror_type: MirrorType) -> Self {
        for d in 0..self.config.dimension() {
            self = self.with_mirror_in_dimension(d, mirror_type);
        }
        self
    }

    pub fn with_mirror_in_dimension(mut self, dim: usize, mirror_type: MirrorType) -> Self {
        if dim < 3 {
            self.config.mirror_types[dim] = mirror_type;
        }
        self.set_type(dim, BoundaryType::Mirror)
    }

    /// Restricts the mirror of `dim` to a single wall.
    pub fn with_single_wall(mut self, dim: usize, side: Side) -> Self {
        if dim < 3 {
            self.config.enable_lower[dim] = side == Side::Lower;
            self.config.enable_upper[dim] = side == Side::Upper;
        }
        self
    }

    pub fn with_particle_spacing(mut self, spacing: DVec3) -> Self {
        self.config.particle_spacing = spacing;
        self
    }

    pub fn in_range(mut self, range_min: DVec3, range_max: DVec3) -> Self {
        self.config.range_min = range_min;
        self.config.range_max = range_max;
        self.range_set = true;
        self
    }

    pub fn build(self) -> Result<BoundaryConfiguration, ConfigError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.range_set {
            return Err(ConfigError::MissingParameter("boundary:range".to_string()));
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
