use super::HasMass;
use crate::consts::GRAVITATIONAL_CONSTANT;

/// A named body that other things can orbit. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    name: String,
    mass: f64,
    gravitational_constant: f64,
}

impl CelestialBody {
    /// Mass is in kg.
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self::with_gravitational_constant(name, mass, GRAVITATIONAL_CONSTANT)
    }

    /// Like [CelestialBody::new], but with a different value of G, in
    /// whatever units the caller wants mu to come out in.
    pub fn with_gravitational_constant(
        name: impl Into<String>,
        mass: f64,
        gravitational_constant: f64,
    ) -> Self {
        Self {
            name: name.into(),
            mass,
            gravitational_constant,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// G * M, in km^3/s^2 unless G was overridden
    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_constant * self.mass
    }
}

impl HasMass for CelestialBody {
    fn mu(&self) -> f64 {
        self.gravitational_parameter()
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}
