use glam::DVec3;
use yaml_rust::Yaml;

use crate::errors::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(usize)]
pub enum HydroDimension {
    HydroDimension1D = 1,
    HydroDimension2D = 2,
    HydroDimension3D = 3,
}

impl HydroDimension {
    /// Number of meaningful components in a position or velocity.
    pub fn count(self) -> usize {
        self.into()
    }

    pub fn init(yaml: &Yaml) -> Result<Self, ConfigError> {
        let dimensionality = yaml.as_i64().ok_or(ConfigError::MissingParameter(
            "dimensionality".to_string(),
        ))?;
        usize::try_from(dimensionality)
            .ok()
            .and_then(|d| HydroDimension::try_from(d).ok())
            .ok_or(ConfigError::InvalidDimensionality(dimensionality))
    }
}

/// Parses a YAML array of reals/integers into a `Vec<f64>` of the expected length.
pub fn parse_f64_array(yaml: &Yaml, name: &str, count: usize) -> Result<Vec<f64>, ConfigError> {
    let arr = yaml
        .as_vec()
        .ok_or_else(|| ConfigError::MissingParameter(name.to_string()))?;
    if arr.len() != count {
        return Err(ConfigError::InvalidArrayLength(count, arr.len()));
    }
    arr.iter()
        .map(|y| match y {
            Yaml::Real(_) => y
                .as_f64()
                .ok_or_else(|| ConfigError::InvalidArrayFormat(format!("{:?}", y))),
            Yaml::Integer(i) => Ok(*i as f64),
            _ => Err(ConfigError::InvalidArrayFormat(format!("{:?}", yaml))),
        })
        .collect()
}

/// Like [`parse_f64_array`], but packs the values into the leading components of a `DVec3`.
pub fn parse_dvec3(yaml: &Yaml, name: &str, dimension: HydroDimension) -> Result<DVec3, ConfigError> {
    let values = parse_f64_array(yaml, name, dimension.count())?;
    let mut v = DVec3::ZERO;
    for (i, value) in values.into_iter().enumerate() {
        v[i] = value;
    }
    Ok(v)
}

pub fn contains(range_min: DVec3, range_max: DVec3, pos: DVec3, dimension: usize) -> bool {
    let mut contains = true;
    for i in 0..dimension {
        contains &= pos[i] >= range_min[i] && pos[i] < range_max[i];
    }
    contains
}

/// Wraps a single coordinate back into `[min, max)`.
///
/// Non-finite coordinates are left untouched for the caller's blow-up checks.
pub fn box_wrap(min: f64, max: f64, x: &mut f64) {
    if !x.is_finite() || (*x >= min && *x < max) {
        return;
    }
    *x = min + (*x - min).rem_euclid(max - min);
    // rem_euclid may round up to the full range
    if *x >= max {
        *x = min;
    }
}
