use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Propagation direction as a spherical angle pair, in radians.
///
/// The polar angle is measured from the positive Z axis, the azimuthal angle
/// from the positive X axis towards positive Y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Direction {
    pub polar: f64,
    pub azimuthal: f64,
}

impl Direction {
    pub fn new(polar: f64, azimuthal: f64) -> Self {
        Direction { polar, azimuthal }
    }

    pub fn from_degrees(polar_deg: f64, azimuthal_deg: f64) -> Self {
        Direction {
            polar: polar_deg.to_radians(),
            azimuthal: azimuthal_deg.to_radians(),
        }
    }

    pub fn to_unit_vector(self) -> Vector3<f64> {
        sph_to_cart(self.polar, self.azimuthal)
    }

    /// Direction of `v`, or `None` if `v` has no usable length.
    ///
    /// The azimuthal angle comes back in `(-pi, pi]`.
    pub fn from_vector(v: Vector3<f64>) -> Option<Self> {
        cart_to_sph(v).map(|(polar, azimuthal)| Direction { polar, azimuthal })
    }
}

pub fn sph_to_cart(polar: f64, azimuthal: f64) -> Vector3<f64> {
    let (sin_polar, cos_polar) = polar.sin_cos();
    let (sin_azimuthal, cos_azimuthal) = azimuthal.sin_cos();
    Vector3::new(sin_polar * cos_azimuthal, sin_polar * sin_azimuthal, cos_polar)
}

pub fn cart_to_sph(v: Vector3<f64>) -> Option<(f64, f64)> {
    let scale = v.x.abs().max(v.y.abs()).max(v.z.abs());
    if !scale.is_finite() || v.x.is_nan() || v.y.is_nan() || v.z.is_nan() || scale == 0.0 {
        return None;
    }

    // Unit-sized components keep the norm from overflowing
    let v = v / scale;
    let polar = (v.z / v.magnitude()).max(-1.0).min(1.0).acos();
    let azimuthal = v.y.atan2(v.x);
    Some((polar, azimuthal))
}
