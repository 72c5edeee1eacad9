use std::f64::consts::PI;

use nalgebra::Vector3;

use super::Orbit;
use crate::astro::{HasMass, OrbitError};
use crate::math::anomaly;
use crate::math::angle::Angle;

impl<P> Orbit<P> {
    /// Distance from the primary, from the orbit equation r = p / (1 + e cos f).
    pub fn radius_at(&self, true_anomaly: Angle) -> f64 {
        self.semilatus_rectum() / (1.0 + self.eccentricity * true_anomaly.cos())
    }

    pub fn radius_vector_at(&self, true_anomaly: Angle) -> Vector3<f64> {
        let direction = self.in_plane_direction(self.arg_periapsis + true_anomaly);
        self.radius_at(true_anomaly) * direction
    }
}

impl<P: HasMass> Orbit<P> {
    /// Speed at the given true anomaly, from vis-viva.
    pub fn velocity_at(&self, true_anomaly: Angle) -> f64 {
        let radius = self.radius_at(true_anomaly);
        (self.mu() * (2.0 / radius - 1.0 / self.semi_major_axis)).sqrt()
    }

    pub fn velocity_vector_at(&self, true_anomaly: Angle) -> Vector3<f64> {
        let mu = self.mu();
        let h = self.angular_momentum();
        let radius = self.radius_at(true_anomaly);

        let radial = self.in_plane_direction(self.arg_periapsis + true_anomaly);
        let tangential = self.normal_vector().cross(&radial);

        let radial_speed = mu / h * self.eccentricity * true_anomaly.sin();
        let tangential_speed = h / radius;
        radial_speed * radial + tangential_speed * tangential
    }

    pub fn period(&self) -> Result<f64, OrbitError> {
        self.require_closed()?;
        Ok(2.0 * PI / self.mean_motion())
    }

    /// Time since the most recent periapsis passage, in [0, period).
    pub fn time_from_periapsis(&self, true_anomaly: Angle) -> Result<f64, OrbitError> {
        self.require_closed()?;
        let mean_anomaly = anomaly::true_to_mean(true_anomaly, self.eccentricity);
        Ok(mean_anomaly.radians() / self.mean_motion())
    }

    /// How long it takes to travel forwards from one anomaly to the other.
    ///
    /// Never negative: if `end` is behind `start`, this is the time to go
    /// (almost) all the way around.
    pub fn time_between(&self, start: Angle, end: Angle) -> Result<f64, OrbitError> {
        let mut delta_t = self.time_from_periapsis(end)? - self.time_from_periapsis(start)?;
        if delta_t < 0.0 {
            delta_t += self.period()?;
        }
        Ok(delta_t)
    }

    /// Where we'll be after `delta_t` seconds, starting from the given anomaly.
    /// Negative times propagate backwards.
    pub fn true_anomaly_after(&self, true_anomaly: Angle, delta_t: f64) -> Result<Angle, OrbitError> {
        self.require_closed()?;
        let start = anomaly::true_to_mean(true_anomaly, self.eccentricity);
        let end = start + Angle::from_radians(self.mean_motion() * delta_t);
        Ok(anomaly::mean_to_true(end, self.eccentricity)?)
    }
}
