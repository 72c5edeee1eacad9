// Newton's gravitational constant, in km^3 / kg s^2
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67384e-20;

// Relative margin used when comparing floats. Note that 10E-6 == 1e-5.
pub const DEFAULT_TOLERANCE: f64 = 10E-6;

// Masses in kg
pub const EARTH_MASS: f64 = 5.972e24;
pub const SUN_MASS: f64 = 1.98855e30;
pub const MARS_MASS: f64 = 6.4171e23;

// Distances in km
pub const EARTH_RADIUS: f64 = 6_378.137;
pub const ASTRONOMICAL_UNIT: f64 = 149_597_870.7;

pub fn get_circular_velocity(radius: f64, mu: f64) -> f64 {
    (mu / radius).sqrt()
}

pub fn get_period(a: f64, mu: f64) -> f64 {
    (4.0 * std::f64::consts::PI * std::f64::consts::PI * a.powi(3) / mu).sqrt()
}
