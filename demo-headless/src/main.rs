use clap::{Args, Parser, Subcommand};
use esm_thermo_core::{
    relative_humidity, wet_bulb_temperature, ComputeConfig, LabeledField, Quantity, ThermoResult,
    WetBulbMethod,
};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Moist thermodynamics derivation demo
#[derive(Parser, Debug)]
#[command(name = "thermo-headless")]
#[command(about = "Wet-bulb temperature and relative humidity from T, q and p", long_about = None)]
struct Cli {
    /// Log evaluation details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single grid point and print every intermediate quantity
    Point(PointArgs),
    /// Evaluate a synthetic latitude-longitude field and print a summary
    Grid(GridArgs),
}

#[derive(Args, Debug)]
struct PointArgs {
    /// Temperature in K
    #[arg(short, long, default_value_t = 300.0)]
    tref: f64,

    /// Specific humidity in kg/kg
    #[arg(short, long, conflicts_with = "rh")]
    sh: Option<f64>,

    /// Relative humidity in %, used instead of specific humidity
    #[arg(long)]
    rh: Option<f64>,

    /// Pressure in mbar
    #[arg(short, long, default_value_t = 1013.0)]
    pressure: f64,

    /// Wet-bulb method (Davies-Jones, Stull)
    #[arg(short, long, default_value = "Davies-Jones")]
    method: WetBulbMethod,
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Number of latitude rows
    #[arg(long, default_value_t = 180)]
    nlat: usize,

    /// Number of longitude columns
    #[arg(long, default_value_t = 360)]
    nlon: usize,

    /// Wet-bulb method (Davies-Jones, Stull)
    #[arg(short, long, default_value = "Davies-Jones")]
    method: WetBulbMethod,

    /// Evaluate on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Smallest field size evaluated in parallel
    #[arg(long, default_value_t = esm_thermo_core::config::DEFAULT_MIN_PARALLEL_CELLS)]
    min_parallel_cells: usize,
}

const DEFAULT_SPECIFIC_HUMIDITY: f64 = 0.01;

fn main() -> ThermoResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::Point(args) => run_point(&args),
        Command::Grid(args) => run_grid(&args),
    }
}

fn run_point(args: &PointArgs) -> ThermoResult<()> {
    let (plan, humidity) = match args.rh {
        Some(rh) => (args.method.plan_from_relative_humidity(), rh),
        None => (
            args.method.plan(),
            args.sh.unwrap_or(DEFAULT_SPECIFIC_HUMIDITY),
        ),
    };
    debug!("Using plan {}", plan);

    let state = plan.evaluate_state(&[args.tref, humidity, args.pressure])?;

    println!("=== {} wet-bulb ===\n", args.method);
    for quantity in Quantity::ALL {
        let value = state[quantity.index()];
        // Slots the plan never touched are NaN
        if value.is_nan() && !plan.inputs().contains(&quantity) && plan.output() != quantity {
            continue;
        }
        println!(
            "{:>6} = {:>12.6} {}",
            quantity.short_name(),
            value,
            quantity.units()
        );
    }
    Ok(())
}

/// Synthetic surface climate: warm moist tropics, cold dry poles, and a
/// gentle zonal pressure wave
fn synthetic_fields(
    nlat: usize,
    nlon: usize,
) -> ThermoResult<(LabeledField<f64>, LabeledField<f64>, LabeledField<f64>)> {
    let lat: Vec<f64> = (0..nlat)
        .map(|i| -90.0 + 180.0 * (i as f64 + 0.5) / nlat as f64)
        .collect();
    let lon: Vec<f64> = (0..nlon).map(|j| 360.0 * j as f64 / nlon as f64).collect();

    let tref = Array2::from_shape_fn((nlat, nlon), |(i, j)| {
        let phi = lat[i].to_radians();
        let lambda = lon[j].to_radians();
        302.0 - 50.0 * phi.sin().powi(2) + 2.0 * (2.0 * lambda).cos()
    });
    let sh = Array2::from_shape_fn((nlat, nlon), |(i, _)| {
        let phi = lat[i].to_radians();
        0.0005 + 0.018 * phi.cos().powi(4)
    });
    let p = Array1::from_shape_fn(nlon, |j| 1010.0 + 6.0 * (lon[j] * PI / 180.0).sin());

    let tref = LabeledField::new(tref.into_dyn(), ["lat", "lon"])?
        .with_coord("lat", lat)?
        .with_coord("lon", lon.clone())?
        .with_name("tref")
        .with_units("K");
    let sh = LabeledField::new(sh.into_dyn(), ["lat", "lon"])?
        .with_name("sh")
        .with_units("kg/kg");
    let p = LabeledField::new(p.into_dyn(), ["lon"])?
        .with_coord("lon", lon)?
        .with_name("p")
        .with_units("mbar");

    Ok((tref, sh, p))
}

fn summarize(field: &LabeledField<f64>) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut finite = 0usize;
    for &v in field.data() {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            finite += 1;
        }
    }
    let non_finite = field.data().len() - finite;
    let mean = if finite > 0 { sum / finite as f64 } else { f64::NAN };

    println!(
        "{:>4} [{}]  min {:>9.3}  mean {:>9.3}  max {:>9.3}  non-finite {}",
        field.name().unwrap_or("?"),
        field.units().unwrap_or("?"),
        min,
        mean,
        max,
        non_finite
    );
}

fn run_grid(args: &GridArgs) -> ThermoResult<()> {
    let config = ComputeConfig {
        parallel: !args.sequential,
        min_parallel_cells: args.min_parallel_cells,
    };
    let (tref, sh, p) = synthetic_fields(args.nlat, args.nlon)?;
    info!(
        "Synthetic field {}x{} ({} cells), method {}",
        args.nlat,
        args.nlon,
        args.nlat * args.nlon,
        args.method
    );

    let start = Instant::now();
    let rh = relative_humidity(&tref, &sh, &p, &config)?;
    let rh_elapsed = start.elapsed();

    let start = Instant::now();
    let wbt = wet_bulb_temperature(&tref, &sh, &p, args.method, &config)?;
    let wbt_elapsed = start.elapsed();

    info!("rh evaluated in {:.2?}, wbt in {:.2?}", rh_elapsed, wbt_elapsed);

    println!("=== Synthetic {} x {} grid ===\n", args.nlat, args.nlon);
    summarize(&rh);
    summarize(&wbt);
    Ok(())
}
