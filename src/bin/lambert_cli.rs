use std::cell::RefCell;

use clap::Parser;
use log::{info, warn};
use nalgebra::Vector3;

use kepler_lambert::cli::{circular_endpoints, parse_vector};
use kepler_lambert::consts::EARTH_MASS;
use kepler_lambert::math::intervals::Interval;
use kepler_lambert::math::root_finding::bisection;
use kepler_lambert::{CelestialBody, LambertSolver, OrbitError};

const NUM_ITERATIONS_SEARCH: usize = 200;

/// Finds an elliptic transfer between two points with a given time of flight.
///
/// Both endpoints are assumed to be on circular orbits in the plane of the
/// transfer, which is what the burns are measured against.
#[derive(Debug, Parser)]
struct Args {
    /// Starting position in km, as "x,y,z"
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r1: Vector3<f64>,

    /// Ending position in km, as "x,y,z"
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r2: Vector3<f64>,

    /// Desired time of flight, in seconds
    #[arg(long)]
    time_of_flight: f64,

    /// Mass of the central body, in kg
    #[arg(long, default_value_t = EARTH_MASS)]
    mass: f64,

    /// Number of complete orbits to make before arriving
    #[arg(long, default_value_t = 0)]
    revolutions: u32,

    /// Take the high-energy branch, which passes the far side of the ellipse
    #[arg(long)]
    long_way: bool,

    /// Largest semi-major axis to consider, as a multiple of the minimum
    #[arg(long, default_value_t = 100.0)]
    max_factor: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let body = CelestialBody::new("Primary", args.mass);
    let (start, end) = circular_endpoints(&body, &args.r1, &args.r2)?;
    let solver = LambertSolver::new(start, end, args.revolutions)?;

    let a_min = solver.a_min();
    println!("Transfer angle: {}", solver.theta());
    println!("Minimum-energy semi-major axis: {} km", a_min);

    // The search can't stop early, so hold onto the first failure and report
    // it afterwards
    let failure: RefCell<Option<OrbitError>> = RefCell::new(None);
    let time_error = |sma: f64| match solver.solution(sma, args.long_way) {
        Ok(solution) => solution.time_of_flight() - args.time_of_flight,
        Err(e) => {
            warn!("no solution for semi-major axis {}: {}", sma, e);
            failure.borrow_mut().get_or_insert(e);
            f64::NAN
        }
    };

    let interval = Interval::new(a_min, args.max_factor * a_min);
    info!("searching for a semi-major axis in {}", interval);
    let sma = bisection(time_error, interval, NUM_ITERATIONS_SEARCH)?;
    if let Some(e) = failure.into_inner() {
        return Err(e.into());
    }

    let solution = solver.solution(sma, args.long_way)?;
    let orbit = solution.transfer_orbit();

    println!("Transfer orbit:");
    println!("- Semi-major axis: {} km", orbit.semi_major_axis());
    println!("- Eccentricity: {}", orbit.eccentricity());
    println!("- Inclination: {}", orbit.inclination());
    println!("- RAAN: {}", orbit.raan());
    println!("- Argument of periapsis: {}", orbit.arg_periapsis());
    println!("- Periapsis: {} km", orbit.periapsis());
    println!("- Period: {} s", orbit.period()?);
    println!();
    println!("Departure velocity: {} km/s", solution.start_velocity());
    println!("Arrival velocity: {} km/s", solution.end_velocity());
    println!("Time of flight: {} s", solution.time_of_flight());
    println!("Departure burn: {} km/s", solution.departure_delta_v());
    println!("Arrival burn: {} km/s", solution.arrival_delta_v());
    println!(
        "Total: {} km/s",
        solution.departure_delta_v() + solution.arrival_delta_v()
    );

    Ok(())
}
