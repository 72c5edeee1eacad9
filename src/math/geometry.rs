use nalgebra::{Unit, Vector3};

use std::f64::consts::PI;

use super::angle::Angle;

// Anything shorter than this can't be meaningfully normalized
const MIN_NORM: f64 = 1e-20;

/// Normalizes v, or returns None if v is (nearly) the zero vector.
pub fn direction(v: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    Unit::try_new(*v, MIN_NORM)
}

/// Returns the unsigned angle between u and v, in [0, pi]. Zero-length
/// inputs give None.
pub fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<Angle> {
    let u = direction(u)?;
    let v = direction(v)?;
    Some(Angle::acos(u.dot(&v)))
}

pub fn directed_angle(u: &Vector3<f64>, v: &Vector3<f64>, up: &Vector3<f64>) -> Angle {
    // Returns the angle between u and v, measured as a positive angle around 'up'.
    let theta = u.angle(v);
    if u.cross(v).dot(up) >= 0.0 {
        Angle::from_radians(theta)
    } else {
        Angle::from_radians(2.0 * PI - theta)
    }
}
