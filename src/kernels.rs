use std::f64::consts::PI;

use glam::DVec3;
use yaml_rust::Yaml;

use crate::{errors::ConfigError, utils::HydroDimension};

/// Smoothing kernel with compact support: `W(r, h) = 0` for `r >= h`.
pub trait Kernel: Sync {
    fn q(r: f64, h: f64) -> f64
    where
        Self: Sized,
    {
        r / h
    }

    fn value(&self, r: f64, h: f64, dimension: HydroDimension) -> f64;

    /// `dW/dr`
    fn derivative(&self, r: f64, h: f64, dimension: HydroDimension) -> f64;

    /// `∇W` evaluated at separation `dx` with `r = |dx|`.
    fn gradient(&self, dx: DVec3, r: f64, h: f64, dimension: HydroDimension) -> DVec3 {
        if r <= 0. || r >= h {
            return DVec3::ZERO;
        }
        dx * (self.derivative(r, h, dimension) / r)
    }
}

fn h_pow(h: f64, dimension: HydroDimension) -> f64 {
    h.powi(dimension.count() as i32)
}

/// M4 cubic spline (Monaghan & Lattanzio 1985), written with the support radius as `h`.
pub struct CubicSpline;

impl CubicSpline {
    fn sigma(dimension: HydroDimension) -> f64 {
        match dimension {
            HydroDimension::HydroDimension1D => 4. / 3.,
            HydroDimension::HydroDimension2D => 40. / (7. * PI),
            HydroDimension::HydroDimension3D => 8. / PI,
        }
    }
}

impl Kernel for CubicSpline {
    fn value(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        let q = Self::q(r, h);
        let w = if q >= 1. {
            0.
        } else if q >= 0.5 {
            2. * (1. - q).powi(3)
        } else {
            1. - 6. * q * q + 6. * q * q * q
        };
        Self::sigma(dimension) * w / h_pow(h, dimension)
    }

    fn derivative(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        let q = Self::q(r, h);
        let dw_dq = if q >= 1. {
            0.
        } else if q >= 0.5 {
            -6. * (1. - q).powi(2)
        } else {
            -12. * q + 18. * q * q
        };
        Self::sigma(dimension) * dw_dq / (h_pow(h, dimension) * h)
    }
}

/// Wendland (1995) C2 kernel.
pub struct WendlandC2;

impl Kernel for WendlandC2 {
    fn value(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        let q = Self::q(r, h);
        if q >= 1. {
            return 0.;
        }
        match dimension {
            HydroDimension::HydroDimension1D => 1.25 * (1. - q).powi(3) * (1. + 3. * q) / h,
            HydroDimension::HydroDimension2D => {
                7. / PI * (1. - q).powi(4) * (1. + 4. * q) / (h * h)
            }
            HydroDimension::HydroDimension3D => {
                21. / (2. * PI) * (1. - q).powi(4) * (1. + 4. * q) / (h * h * h)
            }
        }
    }

    fn derivative(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        let q = Self::q(r, h);
        if q >= 1. {
            return 0.;
        }
        let dw_dq = match dimension {
            HydroDimension::HydroDimension1D => 1.25 * -12. * q * (1. - q).powi(2),
            HydroDimension::HydroDimension2D => 7. / PI * -20. * q * (1. - q).powi(3),
            HydroDimension::HydroDimension3D => 21. / (2. * PI) * -20. * q * (1. - q).powi(3),
        };
        dw_dq / (h_pow(h, dimension) * h)
    }
}

/// The kernel selected in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    CubicSpline,
    WendlandC2,
}

impl KernelKind {
    /// Reads the `kind` entry of the `kernel` section, defaulting to the cubic spline.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["kind"].as_str().unwrap_or("cubic_spline");
        let kernel = match kind {
            "cubic_spline" => KernelKind::CubicSpline,
            "wendland_c2" => KernelKind::WendlandC2,
            _ => return Err(ConfigError::UnknownKernel(kind.to_string())),
        };
        log::info!("Using the {} kernel", kind);
        Ok(kernel)
    }
}

impl Kernel for KernelKind {
    fn value(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        match self {
            KernelKind::CubicSpline => CubicSpline.value(r, h, dimension),
            KernelKind::WendlandC2 => WendlandC2.value(r, h, dimension),
        }
    }

    fn derivative(&self, r: f64, h: f64, dimension: HydroDimension) -> f64 {
        match self {
            KernelKind::CubicSpline => CubicSpline.derivative(r, h, dimension),
            KernelKind::WendlandC2 => WendlandC2.derivative(r, h, dimension),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use yaml_rust::YamlLoader;

    use super::*;

    const DIMENSIONS: [HydroDimension; 3] = [
        HydroDimension::HydroDimension1D,
        HydroDimension::HydroDimension2D,
        HydroDimension::HydroDimension3D,
    ];

    /// Integral of the kernel over its support, by the midpoint rule in r.
    fn integrate(kernel: &KernelKind, h: f64, dimension: HydroDimension) -> f64 {
        let n = 20_000;
        let dr = h / n as f64;
        (0..n)
            .map(|i| {
                let r = (i as f64 + 0.5) * dr;
                let shell = match dimension {
                    HydroDimension::HydroDimension1D => 2.,
                    HydroDimension::HydroDimension2D => 2. * PI * r,
                    HydroDimension::HydroDimension3D => 4. * PI * r * r,
                };
                shell * kernel.value(r, h, dimension) * dr
            })
            .sum()
    }

    #[test]
    fn test_normalisation() {
        for kernel in [KernelKind::CubicSpline, KernelKind::WendlandC2] {
            for dimension in DIMENSIONS {
                assert_approx_eq!(f64, integrate(&kernel, 0.3, dimension), 1., epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_derivative() {
        let h = 0.7;
        let eps = 1e-6;
        for kernel in [KernelKind::CubicSpline, KernelKind::WendlandC2] {
            for dimension in DIMENSIONS {
                for r in [0.05, 0.2, 0.33, 0.5, 0.69] {
                    let numerical = (kernel.value(r + eps, h, dimension)
                        - kernel.value(r - eps, h, dimension))
                        / (2. * eps);
                    assert_approx_eq!(
                        f64,
                        kernel.derivative(r, h, dimension),
                        numerical,
                        epsilon = 1e-5
                    );
                }
                assert_eq!(kernel.value(h, h, dimension), 0.);
                assert_eq!(kernel.derivative(1.2 * h, h, dimension), 0.);
            }
        }
    }

    #[test]
    fn test_gradient() {
        let kernel = KernelKind::CubicSpline;
        let dimension = HydroDimension::HydroDimension2D;
        let dx = DVec3::new(0.3, -0.4, 0.);
        let grad = kernel.gradient(dx, 0.5, 1., dimension);
        assert!(grad.x < 0. && grad.y > 0.);
        assert_approx_eq!(f64, grad.length(), kernel.derivative(0.5, 1., dimension).abs());
        assert_eq!(kernel.gradient(DVec3::ZERO, 0., 1., dimension), DVec3::ZERO);
        assert_eq!(kernel.gradient(dx, 0.5, 0.5, dimension), DVec3::ZERO);
    }

    #[test]
    fn test_init() {
        let docs = YamlLoader::load_from_str("a:\n  kind: \"wendland_c2\"\nb:\n  kind: \"gaussian\"")
            .unwrap();
        assert_eq!(KernelKind::init(&docs[0]["a"]).unwrap(), KernelKind::WendlandC2);
        assert_eq!(KernelKind::init(&docs[0]["c"]).unwrap(), KernelKind::CubicSpline);
        assert_eq!(
            KernelKind::init(&docs[0]["b"]),
            Err(ConfigError::UnknownKernel("gaussian".to_string()))
        );
    }
}
