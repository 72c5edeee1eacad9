pub mod astro;
pub mod cli;
pub mod consts;
pub mod math;

pub use astro::{
    CelestialBody, HasMass, LambertSolution, LambertSolver, Orbit, OrbitError, OrbitPosition,
    OrbitType, PointMass,
};
pub use math::angle::{Angle, TrigFunction};
pub use math::tolerance::Tolerance;
