//! Argument handling shared by the binaries.

use nalgebra::Vector3;

use crate::astro::{HasMass, OrbitError, OrbitPosition};
use crate::math::geometry::direction;

/// Parses a vector written as "x,y,z".
pub fn parse_vector(s: &str) -> Result<Vector3<f64>, String> {
    let components = s
        .split(',')
        .map(|x| x.trim().parse::<f64>().map_err(|e| format!("{}: {}", x, e)))
        .collect::<Result<Vec<_>, _>>()?;

    match components.as_slice() {
        &[x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(format!("expected three components, got {}", components.len())),
    }
}

/// Puts both endpoints on circular orbits in the plane they span. If they
/// don't span one (they're parallel or opposite), the reference plane is used.
pub fn circular_endpoints<P: HasMass + Clone>(
    primary: P,
    r1: &Vector3<f64>,
    r2: &Vector3<f64>,
) -> Result<(OrbitPosition<P>, OrbitPosition<P>), OrbitError> {
    let normal = direction(&r1.cross(r2)).map_or_else(Vector3::z, |n| n.into_inner());
    let start = OrbitPosition::circular(primary.clone(), r1, &normal)?;
    let end = OrbitPosition::circular(primary, r2, &normal)?;
    Ok((start, end))
}
