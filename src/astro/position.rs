use nalgebra::Vector3;

use super::{HasMass, Orbit, OrbitError};
use crate::consts::get_circular_velocity;
use crate::math::angle::Angle;
use crate::math::geometry::{directed_angle, direction};
use crate::math::tolerance::Tolerance;

/// A single point on an orbit, identified by its true anomaly.
///
/// There's no setter for the anomaly; use [OrbitPosition::with_true_anomaly]
/// or [OrbitPosition::after] to get a different point on the same orbit.
#[derive(Debug, Clone, Copy)]
pub struct OrbitPosition<P> {
    orbit: Orbit<P>,
    true_anomaly: Angle,
}

impl<P> OrbitPosition<P> {
    pub fn new(orbit: Orbit<P>, true_anomaly: Angle) -> Self {
        Self {
            orbit,
            true_anomaly: true_anomaly.normalized(),
        }
    }

    pub fn orbit(&self) -> &Orbit<P> {
        &self.orbit
    }

    pub fn true_anomaly(&self) -> Angle {
        self.true_anomaly
    }

    pub fn with_true_anomaly(&self, true_anomaly: Angle) -> Self
    where
        P: Clone,
    {
        Self::new(self.orbit.clone(), true_anomaly)
    }

    pub fn radius(&self) -> f64 {
        self.orbit.radius_at(self.true_anomaly)
    }

    pub fn radius_vector(&self) -> Vector3<f64> {
        self.orbit.radius_vector_at(self.true_anomaly)
    }
}

impl<P: HasMass> OrbitPosition<P> {
    /// Builds both the orbit and the location on it from a state vector.
    pub fn from_state(
        primary: P,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Result<Self, OrbitError> {
        Self::from_state_with_tolerance(primary, position, velocity, Tolerance::DEFAULT)
    }

    pub fn from_state_with_tolerance(
        primary: P,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        tolerance: Tolerance,
    ) -> Result<Self, OrbitError> {
        let orbit = Orbit::from_state_with_tolerance(primary, position, velocity, tolerance)?;
        let true_anomaly = orbit.true_anomaly_of_state(position, velocity, tolerance)?;
        Ok(Self::new(orbit, true_anomaly))
    }

    /// The circular orbit through `position`, turning counterclockwise about
    /// `normal`. Only the part of `normal` perpendicular to `position` is
    /// used.
    pub fn circular(
        primary: P,
        position: &Vector3<f64>,
        normal: &Vector3<f64>,
    ) -> Result<Self, OrbitError> {
        let radial = direction(position)
            .ok_or(OrbitError::NumericalDegeneracy("position"))?
            .into_inner();
        let normal = direction(&(normal - normal.dot(&radial) * radial))
            .ok_or(OrbitError::NumericalDegeneracy("orbit normal"))?
            .into_inner();

        let speed = get_circular_velocity(position.norm(), primary.mu());
        let velocity = speed * normal.cross(&radial);
        Self::from_state(primary, position, &velocity)
    }

    /// Finds the point on `orbit` in the direction of `position`.
    ///
    /// Only the direction of `position` matters. Any component out of the
    /// orbital plane is ignored.
    pub fn on_orbit(orbit: Orbit<P>, position: &Vector3<f64>) -> Result<Self, OrbitError> {
        let normal = orbit.normal_vector().into_inner();
        let in_plane = position - position.dot(&normal) * normal;
        let in_plane = direction(&in_plane)
            .ok_or(OrbitError::NumericalDegeneracy("in-plane position"))?
            .into_inner();

        let periapsis = orbit.periapsis_vector().into_inner();
        let true_anomaly = directed_angle(&periapsis, &in_plane, &normal);
        Ok(Self::new(orbit, true_anomaly))
    }

    pub fn velocity(&self) -> f64 {
        self.orbit.velocity_at(self.true_anomaly)
    }

    pub fn velocity_vector(&self) -> Vector3<f64> {
        self.orbit.velocity_vector_at(self.true_anomaly)
    }

    pub fn time_from_periapsis(&self) -> Result<f64, OrbitError> {
        self.orbit.time_from_periapsis(self.true_anomaly)
    }

    /// How long until we reach `other`'s anomaly. Only `other`'s anomaly is
    /// used; its orbit is assumed to be ours.
    pub fn time_until(&self, other: &OrbitPosition<P>) -> Result<f64, OrbitError> {
        self.orbit.time_between(self.true_anomaly, other.true_anomaly)
    }

    pub fn after(&self, delta_t: f64) -> Result<Self, OrbitError>
    where
        P: Clone,
    {
        let true_anomaly = self.orbit.true_anomaly_after(self.true_anomaly, delta_t)?;
        Ok(self.with_true_anomaly(true_anomaly))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::astro::{CelestialBody, PointMass};
    use crate::consts::EARTH_MASS;

    fn assert_same_direction(a: Angle, b: Angle) {
        let gap = (a - b).normalized_signed().radians();
        assert!(gap.abs() < 1e-9, "{} and {} differ by {}", a, b, gap);
    }

    fn elliptic_orbit<P>(primary: P) -> Orbit<P> {
        Orbit::from_elements(
            primary,
            15000.0,
            0.3,
            Angle::from_degrees(50.0),
            Angle::from_degrees(75.0),
            Angle::from_degrees(130.0),
        )
    }

    #[test]
    fn test_anomaly_is_normalized() {
        let orbit = elliptic_orbit(PointMass::with_mu(398_600.0));
        let position = OrbitPosition::new(orbit, Angle::from_degrees(-90.0));
        assert_relative_eq!(position.true_anomaly().degrees(), 270.0, max_relative = 1e-12);

        let position = OrbitPosition::new(orbit, Angle::from_degrees(400.0));
        assert_relative_eq!(position.true_anomaly().degrees(), 40.0, max_relative = 1e-12);
    }

    #[test]
    fn test_delegates_to_orbit() {
        let orbit = elliptic_orbit(PointMass::with_mu(398_600.0));
        let f = Angle::from_degrees(33.0);
        let position = OrbitPosition::new(orbit, f);

        assert_eq!(position.radius(), orbit.radius_at(f));
        assert_eq!(position.radius_vector(), orbit.radius_vector_at(f));
        assert_eq!(position.velocity(), orbit.velocity_at(f));
        assert_eq!(position.velocity_vector(), orbit.velocity_vector_at(f));
        assert_eq!(
            position.time_from_periapsis(),
            orbit.time_from_periapsis(f)
        );
    }

    #[test]
    fn test_with_true_anomaly_leaves_original_alone() {
        let orbit = elliptic_orbit(PointMass::with_mu(398_600.0));
        let first = OrbitPosition::new(orbit, Angle::from_degrees(10.0));
        let second = first.with_true_anomaly(Angle::from_degrees(200.0));

        assert_relative_eq!(first.true_anomaly().degrees(), 10.0, max_relative = 1e-12);
        assert_relative_eq!(second.true_anomaly().degrees(), 200.0, max_relative = 1e-12);
        assert_eq!(first.orbit().semi_major_axis(), second.orbit().semi_major_axis());
    }

    #[test]
    fn test_from_state() {
        let earth = CelestialBody::new("Earth", EARTH_MASS);
        let orbit = elliptic_orbit(&earth);

        for i in 0..12 {
            let f = Angle::from_degrees(30.0 * i as f64 + 5.0);
            let r = orbit.radius_vector_at(f);
            let v = orbit.velocity_vector_at(f);

            let position = OrbitPosition::from_state(&earth, &r, &v).unwrap();
            assert_same_direction(position.true_anomaly(), f);
            assert_relative_eq!(position.radius_vector(), r, max_relative = 1e-9);
            assert_relative_eq!(position.velocity_vector(), v, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_from_state_circular() {
        let earth = CelestialBody::new("Earth", EARTH_MASS);
        let radius = 7000.0;
        let speed = get_circular_velocity(radius, earth.mu());

        // Circular and equatorial, 60 degrees past the x-axis
        let angle = Angle::from_degrees(60.0);
        let r = radius * Vector3::new(angle.cos(), angle.sin(), 0.0);
        let v = speed * Vector3::new(-angle.sin(), angle.cos(), 0.0);

        let position = OrbitPosition::from_state(&earth, &r, &v).unwrap();
        assert_relative_eq!(position.true_anomaly(), angle, epsilon = 1e-9);
        assert_relative_eq!(position.radius_vector(), r, max_relative = 1e-9);
    }

    #[test]
    fn test_from_state_rejects_escape() {
        let earth = CelestialBody::new("Earth", EARTH_MASS);
        let r = Vector3::new(7000.0, 0.0, 0.0);
        let v = Vector3::new(0.0, 20.0, 0.0);
        assert!(matches!(
            OrbitPosition::from_state(&earth, &r, &v),
            Err(OrbitError::UnboundTrajectory { .. })
        ));
    }

    #[test]
    fn test_circular() {
        let mu = 398_600.0;
        let r = Vector3::new(0.0, 0.0, 7000.0);

        // Tilted normal; only the part perpendicular to r counts
        let normal = Vector3::new(0.0, -1.0, 1.0);
        let position = OrbitPosition::circular(PointMass::with_mu(mu), &r, &normal).unwrap();
        let orbit = position.orbit();

        assert_relative_eq!(orbit.eccentricity(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(orbit.semi_major_axis(), 7000.0, max_relative = 1e-9);
        assert_relative_eq!(orbit.inclination().degrees(), 90.0, max_relative = 1e-9);
        assert_relative_eq!(orbit.normal_vector().into_inner(), -Vector3::y(), epsilon = 1e-9);
        assert_relative_eq!(position.radius_vector(), r, epsilon = 1e-6);

        // No plane can be picked when the normal is along the position
        let result = OrbitPosition::circular(PointMass::with_mu(mu), &r, &Vector3::z());
        assert_eq!(
            result.unwrap_err(),
            OrbitError::NumericalDegeneracy("orbit normal")
        );
    }

    #[test]
    fn test_on_orbit() {
        let orbit = elliptic_orbit(PointMass::with_mu(398_600.0));

        for i in 0..12 {
            let f = Angle::from_degrees(30.0 * i as f64 + 5.0);
            // Distance shouldn't matter, only direction
            let r = 3.0 * orbit.radius_vector_at(f);
            let position = OrbitPosition::on_orbit(orbit, &r).unwrap();
            assert_same_direction(position.true_anomaly(), f);
        }

        // Straight along the normal, there's no way to tell
        let result = OrbitPosition::on_orbit(orbit, &orbit.normal_vector().into_inner());
        assert!(matches!(result, Err(OrbitError::NumericalDegeneracy(_))));
    }

    #[test]
    fn test_time_travel() {
        let orbit = elliptic_orbit(PointMass::with_mu(398_600.0));
        let start = OrbitPosition::new(orbit, Angle::from_degrees(300.0));
        let end = OrbitPosition::new(orbit, Angle::from_degrees(20.0));

        let delta_t = start.time_until(&end).unwrap();
        assert!(delta_t > 0.0);
        assert!(delta_t < orbit.period().unwrap() / 2.0);

        let arrived = start.after(delta_t).unwrap();
        assert_same_direction(arrived.true_anomaly(), end.true_anomaly());

        // The original is untouched
        assert_relative_eq!(start.true_anomaly().degrees(), 300.0, max_relative = 1e-12);
    }
}
