//! Lambert's problem, solved for a chosen semi-major axis.
//!
//! Given two positions, [LambertSolver] finds the ellipse connecting them
//! with a particular semi-major axis, using Lagrange's formulation. Finding
//! the transfer with a particular time of flight is left to the caller, by
//! searching over the semi-major axis (see the `lambert_cli` binary).

use std::f64::consts::PI;

use log::debug;
use nalgebra::Vector3;

use super::{HasMass, Orbit, OrbitError, OrbitPosition};
use crate::math::angle::Angle;
use crate::math::geometry::{angle_between, direction};
use crate::math::tolerance::Tolerance;

// Within this many radians of pi, Lagrange's coefficients lose too much
// precision to the cancellation between them
const NEAR_OPPOSITE_BAND: f64 = 1e-3;

// Below this sine of the transfer angle, the endpoints no longer pick out a
// plane of their own
const MIN_PLANE_SINE: f64 = 1e-9;

/// Connects two points in space with an elliptic transfer orbit.
///
/// The transfer angle here is always in [0, pi]. Whether to go the long
/// way around is chosen per solution.
#[derive(Debug, Clone)]
pub struct LambertSolver<P> {
    start: OrbitPosition<P>,
    end: OrbitPosition<P>,
    revolutions: u32,
    tolerance: Tolerance,
    // Unit vectors; the endpoints are checked to be non-zero on construction
    start_direction: Vector3<f64>,
    end_direction: Vector3<f64>,
    theta: Angle,
}

/// A transfer orbit found by [LambertSolver], along with where it starts and
/// ends.
#[derive(Debug, Clone)]
pub struct LambertSolution<P> {
    transfer_orbit: Orbit<P>,
    start: OrbitPosition<P>,
    end: OrbitPosition<P>,
    start_velocity: Vector3<f64>,
    end_velocity: Vector3<f64>,
    departure_burn: Vector3<f64>,
    arrival_burn: Vector3<f64>,
    revolutions: u32,
    time_of_flight: f64,
}

impl<P: HasMass> LambertSolver<P> {
    pub fn new(
        start: OrbitPosition<P>,
        end: OrbitPosition<P>,
        revolutions: u32,
    ) -> Result<Self, OrbitError> {
        Self::with_tolerance(start, end, revolutions, Tolerance::DEFAULT)
    }

    pub fn with_tolerance(
        start: OrbitPosition<P>,
        end: OrbitPosition<P>,
        revolutions: u32,
        tolerance: Tolerance,
    ) -> Result<Self, OrbitError> {
        let start_mu = start.orbit().mu();
        let end_mu = end.orbit().mu();
        if !tolerance.nearly_equal(start_mu, end_mu) {
            return Err(OrbitError::InconsistentCentralBody { start_mu, end_mu });
        }

        let start_direction = direction(&start.radius_vector())
            .ok_or(OrbitError::NumericalDegeneracy("start position"))?
            .into_inner();
        let end_direction = direction(&end.radius_vector())
            .ok_or(OrbitError::NumericalDegeneracy("end position"))?
            .into_inner();
        let theta = angle_between(&start_direction, &end_direction)
            .ok_or(OrbitError::NumericalDegeneracy("transfer angle"))?;

        Ok(Self {
            start,
            end,
            revolutions,
            tolerance,
            start_direction,
            end_direction,
            theta,
        })
    }

    pub fn start(&self) -> &OrbitPosition<P> {
        &self.start
    }

    pub fn end(&self) -> &OrbitPosition<P> {
        &self.end
    }

    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    fn mu(&self) -> f64 {
        self.start.orbit().mu()
    }

    /// Angle between the endpoints as seen from the primary, in [0, pi].
    pub fn theta(&self) -> Angle {
        self.theta
    }

    /// Straight-line distance between the endpoints.
    pub fn chord(&self) -> f64 {
        let r1 = self.start.radius();
        let r2 = self.end.radius();
        let c_squared = r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * self.theta().cos();
        c_squared.max(0.0).sqrt()
    }

    pub fn semi_perimeter(&self) -> f64 {
        (self.start.radius() + self.end.radius() + self.chord()) / 2.0
    }

    /// The smallest semi-major axis of any ellipse through both endpoints.
    pub fn a_min(&self) -> f64 {
        self.semi_perimeter() / 2.0
    }

    pub fn min_energy_solution(&self) -> Result<LambertSolution<P>, OrbitError>
    where
        P: Clone,
    {
        self.solution(self.a_min(), false)
    }

    /// Builds the transfer with the given semi-major axis.
    ///
    /// `is_long_way` picks which branch of Lagrange's alpha to use, i.e.,
    /// whether the transfer passes the far side of the ellipse (and takes
    /// longer) or not.
    pub fn solution(&self, sma: f64, is_long_way: bool) -> Result<LambertSolution<P>, OrbitError>
    where
        P: Clone,
    {
        let a_min = self.a_min();
        if sma < a_min && !self.tolerance.nearly_equal(sma, a_min) {
            return Err(OrbitError::UnsupportedTransferType {
                semi_major_axis: sma,
                minimum: a_min,
            });
        }

        let start_position = self.start.radius_vector();
        let end_position = self.end.radius_vector();

        let theta = self.theta.radians();
        let (start_velocity, end_velocity) =
            if self.tolerance.nearly_equal(theta, PI) || PI - theta < NEAR_OPPOSITE_BAND {
                debug!("endpoints are nearly opposite; building the conic directly");
                self.near_opposite_velocities(sma, is_long_way)?
            } else {
                self.lagrange_velocities(sma, is_long_way)?
            };

        let primary = self.start.orbit().primary().clone();
        let transfer_orbit = Orbit::from_state_with_tolerance(
            primary,
            &start_position,
            &start_velocity,
            self.tolerance,
        )?;

        // The endpoints have to be located again, since the caller's
        // positions may be on entirely different orbits.
        let start = OrbitPosition::on_orbit(transfer_orbit.clone(), &start_position)?;
        let end = OrbitPosition::on_orbit(transfer_orbit.clone(), &end_position)?;
        let time_of_flight = start.time_until(&end)?
            + transfer_orbit.period()? * f64::from(self.revolutions);

        let departure_burn = start_velocity - self.start.velocity_vector();
        let arrival_burn = self.end.velocity_vector() - end_velocity;

        Ok(LambertSolution {
            transfer_orbit,
            start,
            end,
            start_velocity,
            end_velocity,
            departure_burn,
            arrival_burn,
            revolutions: self.revolutions,
            time_of_flight,
        })
    }

    /// Lagrange's alpha and beta for this semi-major axis.
    fn lagrange_angles(&self, sma: f64, is_long_way: bool) -> (Angle, Angle) {
        let chord = self.chord();
        let s = self.semi_perimeter();

        let alpha_0 = Angle::asin((s / (2.0 * sma)).sqrt()) * 2.0;
        let alpha = if is_long_way {
            alpha_0.explement()
        } else {
            alpha_0
        };

        // theta comes from arccos, so this branch is never taken. The
        // caller's flag only ever affects alpha.
        let beta_0 = Angle::asin(((s - chord).max(0.0) / (2.0 * sma)).sqrt()) * 2.0;
        let beta_is_flipped = self.theta > Angle::HALF_TURN;
        let beta = if beta_is_flipped {
            beta_0.explement()
        } else {
            beta_0
        };
        if is_long_way != beta_is_flipped {
            debug!(
                "alpha branch (long way: {}) and beta branch (theta > pi: {}) disagree",
                is_long_way, beta_is_flipped
            );
        }

        (alpha, beta)
    }

    fn lagrange_velocities(
        &self,
        sma: f64,
        is_long_way: bool,
    ) -> Result<(Vector3<f64>, Vector3<f64>), OrbitError> {
        let (alpha, beta) = self.lagrange_angles(sma, is_long_way);

        let scale = (self.mu() / (4.0 * sma)).sqrt();
        let a = scale * (alpha * 0.5).cot();
        let b = scale * (beta * 0.5).cot();

        let chord_vector = self.end.radius_vector() - self.start.radius_vector();
        let u_c = direction(&chord_vector)
            .ok_or(OrbitError::NumericalDegeneracy("chord"))?
            .into_inner();
        let u_1 = self.start_direction;
        let u_2 = self.end_direction;

        let start_velocity = (a + b) * u_c + (b - a) * u_1;
        let end_velocity = (a + b) * u_c + (a - b) * u_2;
        Ok((start_velocity, end_velocity))
    }

    /// Near (or at) opposite endpoints, Lagrange's coefficients cancel badly,
    /// and at exactly pi they blow up. Instead, build the conic itself: the
    /// semi-latus rectum fixes the angular momentum, vis-viva fixes the
    /// radial speed at the start, and the conic equation carries that over to
    /// the end.
    fn near_opposite_velocities(
        &self,
        sma: f64,
        is_long_way: bool,
    ) -> Result<(Vector3<f64>, Vector3<f64>), OrbitError> {
        let r1 = self.start.radius();
        let r2 = self.end.radius();
        let u_1 = self.start_direction;
        let u_2 = self.end_direction;

        let chord = self.chord();
        let s = self.semi_perimeter();
        let (alpha, beta) = self.lagrange_angles(sma, is_long_way);
        let semilatus_rectum = 4.0 * sma * (s - r1) * (s - r2) / (chord * chord)
            * ((alpha + beta) * 0.5).sin().powi(2);

        // e cos(nu) and |e sin(nu)| at the start
        let ecc_squared = (1.0 - semilatus_rectum / sma).max(0.0);
        let ecc_cos_start = semilatus_rectum / r1 - 1.0;
        let ecc_sin_magnitude = (ecc_squared - ecc_cos_start * ecc_cos_start)
            .max(0.0)
            .sqrt();

        let sin_theta = self.theta.sin();
        let cos_theta = self.theta.cos();
        let (normal, ecc_sin_start) = if sin_theta > MIN_PLANE_SINE {
            let normal = direction(&u_1.cross(&u_2))
                .ok_or(OrbitError::NumericalDegeneracy("transfer plane normal"))?
                .into_inner();
            // e cos(nu + theta) has to land on the end radius, which pins
            // down the sign of e sin(nu)
            let residual = ecc_cos_start * cos_theta - (semilatus_rectum / r2 - 1.0);
            (normal, ecc_sin_magnitude.copysign(residual))
        } else {
            // Either sign reaches the end; heading outwards passes apoapsis,
            // which is the long way
            let sign = if is_long_way { 1.0 } else { -1.0 };
            (self.reference_normal()?, sign * ecc_sin_magnitude)
        };
        let ecc_sin_end = ecc_sin_start * cos_theta + ecc_cos_start * sin_theta;

        let mu = self.mu();
        let radial_scale = (mu / semilatus_rectum).sqrt();
        let angular_momentum = (mu * semilatus_rectum).sqrt();
        let start_velocity = radial_scale * ecc_sin_start * u_1
            + (angular_momentum / r1) * normal.cross(&u_1);
        let end_velocity = radial_scale * ecc_sin_end * u_2
            + (angular_momentum / r2) * normal.cross(&u_2);
        Ok((start_velocity, end_velocity))
    }

    /// For exactly opposite endpoints any plane through them will do. Take
    /// the one closest to the reference plane.
    fn reference_normal(&self) -> Result<Vector3<f64>, OrbitError> {
        let u_1 = self.start_direction;

        // The plane normal must be perpendicular to u_1; take whichever of z
        // and y survives having its u_1 component removed
        let normal = [Vector3::z(), Vector3::y()]
            .iter()
            .map(|v| v - v.dot(&u_1) * u_1)
            .find(|v| !self.tolerance.nearly_zero(v.norm()))
            .and_then(|v| direction(&v))
            .ok_or(OrbitError::NumericalDegeneracy("transfer plane normal"))?
            .into_inner();
        Ok(normal)
    }
}

impl<P> LambertSolution<P> {
    pub fn transfer_orbit(&self) -> &Orbit<P> {
        &self.transfer_orbit
    }

    /// The departure point, on the transfer orbit.
    pub fn start(&self) -> &OrbitPosition<P> {
        &self.start
    }

    /// The arrival point, on the transfer orbit.
    pub fn end(&self) -> &OrbitPosition<P> {
        &self.end
    }

    pub fn start_velocity(&self) -> Vector3<f64> {
        self.start_velocity
    }

    pub fn end_velocity(&self) -> Vector3<f64> {
        self.end_velocity
    }

    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    pub fn time_of_flight(&self) -> f64 {
        self.time_of_flight
    }

    /// Impulse needed to leave the starting orbit onto the transfer.
    pub fn departure_burn(&self) -> Vector3<f64> {
        self.departure_burn
    }

    /// Impulse needed to match the ending orbit on arrival.
    pub fn arrival_burn(&self) -> Vector3<f64> {
        self.arrival_burn
    }

    pub fn departure_delta_v(&self) -> f64 {
        self.departure_burn.norm()
    }

    pub fn arrival_delta_v(&self) -> f64 {
        self.arrival_burn.norm()
    }
}
