use log::debug;
use nalgebra::{Unit, Vector3};

use super::error::OrbitError;
use super::HasMass;
use crate::math::angle::Angle;
use crate::math::geometry::{directed_angle, direction};
use crate::math::tolerance::Tolerance;

mod state_methods;

/// The kind of conic section an orbit traces out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitType {
    Circular,
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// A Keplerian orbit around some primary body, described by its classical
/// elements.
///
/// Orbits are never modified after construction. Anything that would change
/// an element should build a new orbit instead.
#[derive(Debug, Clone, Copy)]
pub struct Orbit<P> {
    primary: P,
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: Angle,
    raan: Angle,
    arg_periapsis: Angle,
}

/// The directions pinned down by a single state vector.
struct StateGeometry {
    /// Unit angular momentum
    normal: Vector3<f64>,
    /// Unit vector towards the ascending node, or the x-axis for orbits in
    /// the reference plane
    node: Vector3<f64>,
    /// Points towards periapsis, with length equal to the eccentricity
    ecc_vector: Vector3<f64>,
    equatorial: bool,
}

impl StateGeometry {
    fn new(
        mu: f64,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        tolerance: Tolerance,
    ) -> Result<Self, OrbitError> {
        let ang_mom = position.cross(velocity);
        let normal = direction(&ang_mom)
            .ok_or(OrbitError::NumericalDegeneracy("angular momentum"))?
            .into_inner();
        let radial = direction(position)
            .ok_or(OrbitError::NumericalDegeneracy("position"))?
            .into_inner();

        // LRL vector = v x h / mu - r/|r|
        let ecc_vector = velocity.cross(&ang_mom) / mu - radial;

        let equatorial = tolerance.nearly_zero(normal.x) && tolerance.nearly_zero(normal.y);
        let node = if equatorial {
            debug!("orbit lies in the reference plane; measuring from the x-axis instead of the node");
            Vector3::x()
        } else {
            direction(&Vector3::z().cross(&normal))
                .ok_or(OrbitError::NumericalDegeneracy("node"))?
                .into_inner()
        };

        Ok(Self {
            normal,
            node,
            ecc_vector,
            equatorial,
        })
    }
}

impl<P> Orbit<P> {
    pub fn from_elements(
        primary: P,
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: Angle,
        raan: Angle,
        arg_periapsis: Angle,
    ) -> Self {
        Orbit {
            primary,
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            arg_periapsis,
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    // -- Orbital elements --

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> Angle {
        self.inclination
    }

    pub fn raan(&self) -> Angle {
        self.raan
    }

    pub fn arg_periapsis(&self) -> Angle {
        self.arg_periapsis
    }

    // -- Other geometric characteristics --

    pub fn semilatus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn apoapsis(&self) -> Option<f64> {
        match self.classify() {
            Ok(OrbitType::Circular) | Ok(OrbitType::Elliptic) => {
                Some(self.semi_major_axis * (1.0 + self.eccentricity))
            }
            _ => None,
        }
    }

    pub fn classify(&self) -> Result<OrbitType, OrbitError> {
        self.classify_with_tolerance(Tolerance::DEFAULT)
    }

    pub fn classify_with_tolerance(&self, tolerance: Tolerance) -> Result<OrbitType, OrbitError> {
        let ecc = self.eccentricity;
        if !ecc.is_finite() {
            Err(OrbitError::InvalidEccentricity(ecc))
        } else if tolerance.nearly_zero(ecc) {
            Ok(OrbitType::Circular)
        } else if tolerance.nearly_equal(ecc, 1.0) {
            Ok(OrbitType::Parabolic)
        } else if ecc > 0.0 && ecc < 1.0 {
            Ok(OrbitType::Elliptic)
        } else if ecc > 1.0 {
            Ok(OrbitType::Hyperbolic)
        } else {
            Err(OrbitError::InvalidEccentricity(ecc))
        }
    }

    /// Fails unless this orbit is circular or elliptic.
    pub(crate) fn require_closed(&self) -> Result<(), OrbitError> {
        match self.classify()? {
            OrbitType::Circular | OrbitType::Elliptic => Ok(()),
            other => Err(OrbitError::UnsupportedOrbitType(other)),
        }
    }

    // -- Axes and vectors --

    /// Unit vector in the orbital plane, at the given angle from the
    /// ascending node (i.e., the argument of latitude).
    fn in_plane_direction(&self, arg_latitude: Angle) -> Vector3<f64> {
        let (sin_u, cos_u) = (arg_latitude.sin(), arg_latitude.cos());
        let (sin_raan, cos_raan) = (self.raan.sin(), self.raan.cos());
        let (sin_i, cos_i) = (self.inclination.sin(), self.inclination.cos());

        Vector3::new(
            cos_raan * cos_u - sin_raan * sin_u * cos_i,
            sin_raan * cos_u + cos_raan * sin_u * cos_i,
            sin_u * sin_i,
        )
    }

    pub fn periapsis_vector(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.in_plane_direction(self.arg_periapsis))
    }

    pub fn normal_vector(&self) -> Unit<Vector3<f64>> {
        let (sin_raan, cos_raan) = (self.raan.sin(), self.raan.cos());
        let (sin_i, cos_i) = (self.inclination.sin(), self.inclination.cos());
        Unit::new_normalize(Vector3::new(sin_raan * sin_i, -cos_raan * sin_i, cos_i))
    }
}

impl<P: HasMass> Orbit<P> {
    pub fn mu(&self) -> f64 {
        self.primary.mu()
    }

    /// Builds the orbit that passes through the given position with the
    /// given velocity.
    ///
    /// Only closed orbits can be built this way. Rectilinear states (zero
    /// angular momentum) have no orbital plane and are rejected too.
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
        let mu = primary.mu();
        let geometry = StateGeometry::new(mu, position, velocity, tolerance)?;

        // Vis-viva: v^2 = mu (2/r - 1/a). Escape speed is where 1/a = 0, and
        // comparing against it as a ratio keeps the check independent of scale.
        let two_over_r = 2.0 / position.norm();
        let v_squared_over_mu = velocity.norm_squared() / mu;
        let inverse_sma = two_over_r - v_squared_over_mu;
        let escape_ratio = v_squared_over_mu / two_over_r;
        if tolerance.nearly_equal(escape_ratio, 1.0) || inverse_sma <= 0.0 {
            return Err(OrbitError::UnboundTrajectory {
                semi_major_axis: inverse_sma.recip(),
            });
        }
        let semi_major_axis = inverse_sma.recip();

        let eccentricity = geometry.ecc_vector.norm();
        let inclination = Angle::acos(geometry.normal.z);

        let raan = if tolerance.nearly_zero(inclination.radians()) {
            Angle::ZERO
        } else {
            let raan = Angle::acos(geometry.node.x);
            if geometry.node.y < 0.0 {
                raan.explement()
            } else {
                raan
            }
        };

        let arg_periapsis = if tolerance.nearly_zero(eccentricity) {
            debug!("orbit is circular; measuring from the node instead of periapsis");
            Angle::ZERO
        } else if geometry.equatorial {
            directed_angle(&geometry.node, &geometry.ecc_vector, &geometry.normal)
        } else {
            let argp = Angle::acos(geometry.node.dot(&geometry.ecc_vector) / eccentricity);
            if geometry.ecc_vector.z < 0.0 {
                argp.explement()
            } else {
                argp
            }
        };

        Ok(Orbit {
            primary,
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            arg_periapsis,
        })
    }

    /// Locates a state on this orbit by its eccentricity vector. The sign of
    /// r.v says whether we're heading away from periapsis or towards it.
    ///
    /// On circular orbits, the anomaly is measured from the ascending node,
    /// matching the argument of periapsis being zero there.
    pub(crate) fn true_anomaly_of_state(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        tolerance: Tolerance,
    ) -> Result<Angle, OrbitError> {
        let geometry = StateGeometry::new(self.mu(), position, velocity, tolerance)?;

        if tolerance.nearly_zero(self.eccentricity) {
            return Ok(directed_angle(&geometry.node, position, &geometry.normal));
        }

        let ecc_direction = direction(&geometry.ecc_vector)
            .ok_or(OrbitError::NumericalDegeneracy("eccentricity"))?;
        let radial = position.normalize();
        let true_anomaly = Angle::acos(ecc_direction.dot(&radial));

        if position.dot(velocity) < 0.0 {
            Ok(true_anomaly.explement().normalized())
        } else {
            Ok(true_anomaly)
        }
    }

    // -- Physical orbital characteristics --

    pub fn energy(&self) -> f64 {
        -self.mu() / (2.0 * self.semi_major_axis)
    }

    pub fn angular_momentum(&self) -> f64 {
        // l = h^2/mu
        (self.mu() * self.semilatus_rectum()).sqrt()
    }

    pub fn mean_motion(&self) -> f64 {
        (self.mu() / self.semi_major_axis.powi(3)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;
    use crate::astro::{CelestialBody, PointMass};
    use crate::consts::{get_circular_velocity, EARTH_MASS};

    const RADIUS: f64 = 7000.0;

    fn earth() -> CelestialBody {
        CelestialBody::new("Earth", EARTH_MASS)
    }

    #[test]
    fn test_orbit_shape() {
        let make_orbit = |a, e| {
            Orbit::from_elements((), a, e, Angle::ZERO, Angle::ZERO, Angle::ZERO)
        };

        // Circular orbit
        let orbit = make_orbit(10.0, 0.0);
        assert_eq!(orbit.classify(), Ok(OrbitType::Circular));
        assert_relative_eq!(orbit.semilatus_rectum(), 10.0);
        assert_relative_eq!(orbit.periapsis(), 10.0);
        assert_relative_eq!(orbit.apoapsis().unwrap(), 10.0);

        // Elliptic orbit, e = 3/5
        let orbit = make_orbit(10.0, 0.6);
        assert_eq!(orbit.classify(), Ok(OrbitType::Elliptic));
        assert_relative_eq!(orbit.semilatus_rectum(), 6.4, max_relative = 1e-12);
        assert_relative_eq!(orbit.periapsis(), 4.0, max_relative = 1e-12);
        assert_relative_eq!(orbit.apoapsis().unwrap(), 16.0, max_relative = 1e-12);

        // Parabolic and hyperbolic orbits have no apoapsis
        let orbit = make_orbit(10.0, 1.0);
        assert_eq!(orbit.classify(), Ok(OrbitType::Parabolic));
        assert_eq!(orbit.apoapsis(), None);

        let orbit = make_orbit(-9.0, 5.0 / 3.0);
        assert_eq!(orbit.classify(), Ok(OrbitType::Hyperbolic));
        assert_relative_eq!(orbit.periapsis(), 6.0, max_relative = 1e-12);
        assert_eq!(orbit.apoapsis(), None);
    }

    #[test]
    fn test_classify_edges() {
        let make_orbit =
            |e| Orbit::from_elements((), 10.0, e, Angle::ZERO, Angle::ZERO, Angle::ZERO);

        // Within tolerance of the boundaries
        assert_eq!(make_orbit(3e-6).classify(), Ok(OrbitType::Circular));
        assert_eq!(make_orbit(1.0 + 3e-6).classify(), Ok(OrbitType::Parabolic));
        assert_eq!(make_orbit(1e-3).classify(), Ok(OrbitType::Elliptic));

        // Impossible values
        assert_eq!(
            make_orbit(-0.5).classify(),
            Err(OrbitError::InvalidEccentricity(-0.5))
        );
        assert!(matches!(
            make_orbit(f64::NAN).classify(),
            Err(OrbitError::InvalidEccentricity(_))
        ));

        // A looser tolerance widens the bands
        let loose = Tolerance::new(0.1, 0.1);
        assert_eq!(
            make_orbit(0.05).classify_with_tolerance(loose),
            Ok(OrbitType::Circular)
        );
        assert_eq!(
            make_orbit(0.95).classify_with_tolerance(loose),
            Ok(OrbitType::Parabolic)
        );
    }

    #[test]
    fn test_orbit_angles() {
        let orbit = Orbit::from_elements(
            (),
            10.0,
            0.6,
            Angle::from_degrees(90.0),
            Angle::from_degrees(90.0),
            Angle::from_degrees(90.0),
        );

        // Node is along y, so periapsis is 90 degrees past that, straight up
        assert_relative_eq!(orbit.periapsis_vector().into_inner(), Vector3::z(), epsilon = 1e-15);
        // Moving upwards from the y-axis, counterclockwise around x
        assert_relative_eq!(orbit.normal_vector().into_inner(), Vector3::x(), epsilon = 1e-15);

        let flat = Orbit::from_elements((), 10.0, 0.6, Angle::ZERO, Angle::ZERO, Angle::ZERO);
        assert_relative_eq!(flat.periapsis_vector().into_inner(), Vector3::x());
        assert_relative_eq!(flat.normal_vector().into_inner(), Vector3::z());
    }

    #[test]
    fn test_cartesian_constructor() {
        let earth = earth();
        let circ_velocity = get_circular_velocity(RADIUS, earth.mu());

        let make_orbit = |p_dir: Vector3<f64>, v_dir: Vector3<f64>, multiplier| {
            Orbit::from_state(&earth, &(RADIUS * p_dir), &(circ_velocity * multiplier * v_dir))
        };

        // Circular polar orbit
        let orbit = make_orbit(Vector3::y(), Vector3::z(), 1.0).unwrap();
        assert_relative_eq!(orbit.semi_major_axis(), RADIUS, max_relative = 1e-12);
        assert_relative_eq!(orbit.eccentricity(), 0.0, epsilon = 1e-7);
        assert_relative_eq!(orbit.inclination().radians(), PI / 2.0);
        assert_relative_eq!(orbit.raan().radians(), PI / 2.0);
        assert_relative_eq!(orbit.arg_periapsis().radians(), 0.0);

        // Circular equatorial orbit: everything is zero by convention
        let orbit = make_orbit(Vector3::x(), Vector3::y(), 1.0).unwrap();
        assert_relative_eq!(orbit.inclination().radians(), 0.0);
        assert_relative_eq!(orbit.raan().radians(), 0.0);
        assert_relative_eq!(orbit.arg_periapsis().radians(), 0.0);

        // Elliptic retrograde orbit, starting at periapsis
        let orbit = make_orbit(Vector3::y(), Vector3::x(), 1.2).unwrap();
        assert!(orbit.semi_major_axis() > RADIUS);
        assert_eq!(orbit.classify(), Ok(OrbitType::Elliptic));
        assert_relative_eq!(orbit.inclination().radians(), PI);
        assert_relative_eq!(orbit.raan().radians(), 0.0);
        assert_relative_eq!(orbit.arg_periapsis().radians(), 3.0 * PI / 2.0);
        assert_relative_eq!(orbit.periapsis_vector().into_inner(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(orbit.periapsis(), RADIUS, max_relative = 1e-12);

        // Elliptic orbit but the other way, starting at apoapsis
        let orbit = make_orbit(Vector3::y(), Vector3::x(), 0.8).unwrap();
        assert!(orbit.semi_major_axis() < RADIUS);
        assert_relative_eq!(orbit.inclination().radians(), PI);
        assert_relative_eq!(orbit.arg_periapsis().radians(), PI / 2.0);
        assert_relative_eq!(orbit.periapsis_vector().into_inner(), -Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(orbit.apoapsis().unwrap(), RADIUS, max_relative = 1e-12);
    }

    #[test]
    fn test_cartesian_constructor_failures() {
        let earth = earth();
        let circ_velocity = get_circular_velocity(RADIUS, earth.mu());
        let position = RADIUS * Vector3::x();

        // Parabolic: escape velocity = sqrt(2) * circular velocity
        let result = Orbit::from_state(
            &earth,
            &position,
            &(std::f64::consts::SQRT_2 * circ_velocity * Vector3::y()),
        );
        assert!(matches!(result, Err(OrbitError::UnboundTrajectory { .. })));

        // Hyperbolic
        let result = Orbit::from_state(&earth, &position, &(2.0 * circ_velocity * Vector3::y()));
        match result {
            Err(OrbitError::UnboundTrajectory { semi_major_axis }) => assert!(semi_major_axis < 0.0),
            other => panic!("expected an unbound trajectory, got {:?}", other),
        }

        // Radial: no angular momentum, so no orbital plane
        let result = Orbit::from_state(&earth, &position, &(0.5 * circ_velocity * Vector3::x()));
        assert_eq!(
            result.unwrap_err(),
            OrbitError::NumericalDegeneracy("angular momentum")
        );

        // At the center of the body
        let result = Orbit::from_state(&earth, &Vector3::zeros(), &Vector3::y());
        assert!(matches!(result, Err(OrbitError::NumericalDegeneracy(_))));
    }

    #[test]
    fn test_physical_quantities() {
        let mu = 398_600.0;
        let orbit = Orbit::from_elements(
            PointMass::with_mu(mu),
            RADIUS,
            0.0,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );

        // Energy in a circular orbit is: -mu/2r
        assert_relative_eq!(orbit.energy(), -mu / 2.0 / RADIUS);
        // Angular momentum in a circular orbit is: sqrt(mu * r)
        assert_relative_eq!(orbit.angular_momentum(), (mu * RADIUS).sqrt());
        assert_relative_eq!(orbit.mean_motion(), (mu / RADIUS.powi(3)).sqrt());
        assert_relative_eq!(orbit.mu(), mu);
    }
}
