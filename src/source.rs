use crate::error::{LpfError, LpfResult};

/// Angular emission profile of a light source.
///
/// Maps a polar and azimuthal angle in degrees to a relative energy. Negative
/// results are allowed and count as zero emission. Any
/// `Fn(f64, f64) -> f64` closure is a distribution.
pub trait SourceDistribution {
    fn energy(&self, polar_deg: f64, azimuthal_deg: f64) -> f64;
}

impl<F> SourceDistribution for F
where
    F: Fn(f64, f64) -> f64,
{
    fn energy(&self, polar_deg: f64, azimuthal_deg: f64) -> f64 {
        self(polar_deg, azimuthal_deg)
    }
}

/// Emits equally in every direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl SourceDistribution for Uniform {
    fn energy(&self, _polar_deg: f64, _azimuthal_deg: f64) -> f64 {
        1.0
    }
}

/// Generalized Lambertian emitter, `cos(polar)^exponent` on the forward
/// hemisphere and nothing behind it.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    pub exponent: f64,
}

impl Lambertian {
    pub fn new(exponent: f64) -> Self {
        Lambertian { exponent }
    }
}

impl Default for Lambertian {
    fn default() -> Self {
        Lambertian { exponent: 1.0 }
    }
}

impl SourceDistribution for Lambertian {
    fn energy(&self, polar_deg: f64, _azimuthal_deg: f64) -> f64 {
        if polar_deg.abs() >= 90.0 {
            return 0.0;
        }
        polar_deg.to_radians().cos().powf(self.exponent)
    }
}

/// Rotationally symmetric beam falling off with the polar angle like a
/// normal distribution of the given full width at half maximum.
#[derive(Debug, Clone, Copy)]
pub struct Gaussian {
    fwhm_deg: f64,
    sigma_deg: f64,
}

impl Gaussian {
    pub fn new(fwhm_deg: f64) -> LpfResult<Self> {
        if !fwhm_deg.is_finite() || fwhm_deg <= 0.0 {
            return Err(LpfError::ConfigError(format!(
                "Gaussian FWHM must be positive and finite, got {}",
                fwhm_deg
            )));
        }

        Ok(Gaussian {
            fwhm_deg,
            sigma_deg: fwhm_deg / (2.0 * (2.0 * 2.0_f64.ln()).sqrt()),
        })
    }

    pub fn fwhm_deg(&self) -> f64 {
        self.fwhm_deg
    }

    pub fn sigma_deg(&self) -> f64 {
        self.sigma_deg
    }
}

impl SourceDistribution for Gaussian {
    fn energy(&self, polar_deg: f64, _azimuthal_deg: f64) -> f64 {
        (-(polar_deg * polar_deg) / (2.0 * self.sigma_deg * self.sigma_deg)).exp()
    }
}
