//! Keplerian orbits about a single central body, and Lambert transfers
//! between two points on them.
//!
//! The important types in this module are:
//! - [CelestialBody], the source of a gravitational parameter. Anything
//!   implementing [HasMass] (including [PointMass]) can stand in for one.
//! - [Orbit], a fixed elliptical trajectory, convertible to and from state
//!   vectors.
//! - [OrbitPosition], a point on an orbit, identified by true anomaly.
//! - [LambertSolver], which connects two positions with a transfer orbit.

mod body;
mod error;
mod lambert;
mod orbit;
mod position;

pub use body::CelestialBody;
pub use error::OrbitError;
pub use lambert::{LambertSolution, LambertSolver};
pub use orbit::{Orbit, OrbitType};
pub use position::OrbitPosition;

use crate::consts::GRAVITATIONAL_CONSTANT;

/// A point mass with no other physical properties.
///
/// Useful for satisfying a [HasMass] trait bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass(f64);

/// A trait indicating this object can be used in physical computations that
/// require a massive body.
pub trait HasMass {
    /// The standard gravitational parameter of this object, in km^3/s^2
    fn mu(&self) -> f64;

    /// The mass of this object, in kg
    fn mass(&self) -> f64 {
        self.mu() / GRAVITATIONAL_CONSTANT
    }
}

impl PointMass {
    /// Constructs a new mass
    pub fn with_mu(mu: f64) -> Self {
        Self(mu)
    }
}

impl HasMass for PointMass {
    fn mu(&self) -> f64 {
        self.0
    }
}

impl<T> HasMass for &T
where
    T: HasMass,
{
    fn mu(&self) -> f64 {
        (*self).mu()
    }
}
