//! Conversions between the true, eccentric and mean anomalies of an
//! elliptical orbit. All of these return angles in [0, 2pi).

use super::angle::Angle;
use super::root_finding::{find_root_bracket, newton_plus_bisection, RootFindingError};

const NUM_ITERATIONS_KEPLER: usize = 100;

pub fn true_to_eccentric(true_anomaly: Angle, e: f64) -> Angle {
    // cos E = (e + cos f) / (1 + e cos f), and E is on the same side of the
    // apse line as f is
    let true_anomaly = true_anomaly.normalized();
    let cos_f = true_anomaly.cos();
    let ecc_anomaly = Angle::acos((e + cos_f) / (1.0 + e * cos_f));

    if true_anomaly < Angle::HALF_TURN {
        ecc_anomaly
    } else {
        ecc_anomaly.explement().normalized()
    }
}

pub fn eccentric_to_true(eccentric_anomaly: Angle, e: f64) -> Angle {
    // cos f = (cos E - e) / (1 - e cos E)
    let eccentric_anomaly = eccentric_anomaly.normalized();
    let cos_ecc = eccentric_anomaly.cos();
    let true_anomaly = Angle::acos((cos_ecc - e) / (1.0 - e * cos_ecc));

    if eccentric_anomaly < Angle::HALF_TURN {
        true_anomaly
    } else {
        true_anomaly.explement().normalized()
    }
}

pub fn eccentric_to_mean(eccentric_anomaly: Angle, e: f64) -> Angle {
    let ecc_anomaly = eccentric_anomaly.normalized();
    Angle::from_radians(ecc_anomaly.radians() - e * ecc_anomaly.sin()).normalized()
}

pub fn mean_to_eccentric(mean_anomaly: Angle, e: f64) -> Result<Angle, RootFindingError> {
    let mean_anomaly = mean_anomaly.normalized().radians();

    // This doesn't have a closed form, so let's do some rootfinding
    let kepler = |x: f64| -> f64 { x - e * x.sin() - mean_anomaly };
    let kepler_der = |x: f64| -> f64 { 1.0 - e * x.cos() };

    let bracket = find_root_bracket(kepler, mean_anomaly, e + 0.1, NUM_ITERATIONS_KEPLER)?;
    let root = newton_plus_bisection(
        |x| (kepler(x), kepler_der(x)),
        bracket,
        NUM_ITERATIONS_KEPLER,
    )?;
    Ok(Angle::from_radians(root).normalized())
}

pub fn true_to_mean(true_anomaly: Angle, e: f64) -> Angle {
    eccentric_to_mean(true_to_eccentric(true_anomaly, e), e)
}

pub fn mean_to_true(mean_anomaly: Angle, e: f64) -> Result<Angle, RootFindingError> {
    Ok(eccentric_to_true(mean_to_eccentric(mean_anomaly, e)?, e))
}
