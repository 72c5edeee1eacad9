use clap::Parser;
use log::{debug, info};
use nalgebra::Vector3;
use plotters::prelude::*;

use kepler_lambert::cli::{circular_endpoints, parse_vector};
use kepler_lambert::consts::EARTH_MASS;
use kepler_lambert::{CelestialBody, LambertSolver};

/// Plots time of flight against semi-major axis for a Lambert transfer,
/// for both branches of the solution.
#[derive(Debug, Parser)]
struct Args {
    /// Starting position in km, as "x,y,z"
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r1: Vector3<f64>,

    /// Ending position in km, as "x,y,z"
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r2: Vector3<f64>,

    /// Mass of the central body, in kg
    #[arg(long, default_value_t = EARTH_MASS)]
    mass: f64,

    /// Largest semi-major axis to plot, as a multiple of the minimum
    #[arg(long, default_value_t = 4.0)]
    max_factor: f64,

    #[arg(long, default_value_t = 400)]
    n_points: usize,

    #[arg(long, default_value = "plots/tof-curve.png")]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let body = CelestialBody::new("Primary", args.mass);
    let (start, end) = circular_endpoints(&body, &args.r1, &args.r2)?;
    let solver = LambertSolver::new(start, end, 0)?;
    let a_min = solver.a_min();

    // x is the semi-major axis as a multiple of a_min, y is hours
    let sample = |is_long_way: bool| -> Vec<(f64, f64)> {
        (0..=args.n_points)
            .map(|i| 1.0 + (args.max_factor - 1.0) * i as f64 / args.n_points as f64)
            .filter_map(|factor| match solver.solution(factor * a_min, is_long_way) {
                Ok(solution) => Some((factor, solution.time_of_flight() / 3600.0)),
                Err(e) => {
                    debug!("skipping {} a_min: {}", factor, e);
                    None
                }
            })
            .collect()
    };
    let short_way = sample(false);
    let long_way = sample(true);

    let max_hours = short_way
        .iter()
        .chain(long_way.iter())
        .map(|&(_, t)| t)
        .fold(0.0, f64::max);

    draw_plot(&args.output, args.max_factor, max_hours, &short_way, &long_way)?;
    info!("wrote {} points to {}", short_way.len() + long_way.len(), args.output);
    Ok(())
}

fn draw_plot(
    name: &str,
    max_factor: f64,
    max_hours: f64,
    short_way: &[(f64, f64)],
    long_way: &[(f64, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(name, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Time of flight", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(1.0..max_factor, 0.0..(1.1 * max_hours))?;

    chart
        .configure_mesh()
        .x_desc("semi-major axis / a_min")
        .y_desc("hours")
        .draw()?;

    chart
        .draw_series(LineSeries::new(short_way.iter().copied(), &RED))?
        .label("short")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .draw_series(LineSeries::new(long_way.iter().copied(), &BLUE))?
        .label("long")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
