use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use haulplan_lib::{GeoPoint, PropulsionKind, RouteAlgorithm, DEFAULT_MAX_LEG_MILES};

use haulplan_cli::commands::estimate::{handle_estimate, EstimateArgs};
use haulplan_cli::commands::plan::{handle_plan, PlanArgs};
use haulplan_cli::commands::stations::{handle_stations, StationsArgs};
use haulplan_cli::commands::trip::{handle_trip, TripArgs};
use haulplan_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plan charging-constrained electric truck routes and compare operating costs with diesel"
)]
struct Cli {
    /// Charging station CSV file. Repeat or comma-separate to merge several files.
    #[arg(
        long = "stations",
        global = true,
        env = "HAULPLAN_STATIONS",
        value_delimiter = ','
    )]
    stations: Vec<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Maximum great-circle distance between charges, in miles.
    #[arg(long = "max-leg", global = true, default_value_t = DEFAULT_MAX_LEG_MILES)]
    max_leg: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan an electric route between two coordinates using the charging network.
    Plan {
        /// Origin as LAT,LON.
        #[arg(long = "from-coords", allow_hyphen_values = true)]
        from: GeoPoint,
        /// Destination as LAT,LON.
        #[arg(long = "to-coords", allow_hyphen_values = true)]
        to: GeoPoint,
        /// Planning strategy (greedy or dijkstra).
        #[arg(long, default_value_t = RouteAlgorithm::Greedy)]
        algorithm: RouteAlgorithm,
    },
    /// Estimate annual operating cost and emissions for a one-way trip distance.
    Estimate {
        /// One-way trip distance in miles.
        #[arg(long)]
        miles: f64,
        /// One-way trips per year.
        #[arg(long)]
        trips: u32,
        /// Economy in mpg (diesel) or mi/kWh (electric).
        #[arg(long)]
        economy: Option<f64>,
        /// Only estimate one profile (diesel or electric).
        #[arg(long)]
        profile: Option<PropulsionKind>,
        /// Diesel price in dollars per gallon.
        #[arg(long = "diesel-price", default_value_t = haulplan_lib::cost::DIESEL_FALLBACK_PRICE_PER_GALLON)]
        diesel_price: f64,
    },
    /// List charging stations, optionally near a point.
    Stations {
        /// Query point as LAT,LON.
        #[arg(long, allow_hyphen_values = true)]
        near: Option<GeoPoint>,
        /// Search radius in miles.
        #[arg(long, default_value_t = 50.0)]
        radius: f64,
        /// Maximum number of stations to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Compare diesel and electric for a trip between two place names.
    ///
    /// Requires ORS_API_KEY. Uses EIA_API_KEY for the live diesel price when set.
    Trip {
        /// Origin place name.
        #[arg(long)]
        from: String,
        /// Destination place name.
        #[arg(long)]
        to: String,
        /// One-way trips per year.
        #[arg(long, default_value_t = 1)]
        trips: u32,
        /// Diesel economy in mpg.
        #[arg(long)]
        economy: Option<f64>,
        /// Planning strategy (greedy or dijkstra).
        #[arg(long, default_value_t = RouteAlgorithm::Greedy)]
        algorithm: RouteAlgorithm,
        /// Use a fixed diesel price instead of the live feed.
        #[arg(long = "diesel-price")]
        diesel_price: Option<f64>,
        /// Also write the route map as a GeoJSON FeatureCollection to this file.
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            from,
            to,
            algorithm,
        } => handle_plan(
            &cli.stations,
            &PlanArgs {
                origin: from,
                destination: to,
                algorithm,
                max_leg: cli.max_leg,
            },
            cli.format,
        ),
        Command::Estimate {
            miles,
            trips,
            economy,
            profile,
            diesel_price,
        } => handle_estimate(
            &EstimateArgs {
                miles,
                trips,
                economy,
                profile,
                diesel_price,
            },
            cli.format,
        ),
        Command::Stations {
            near,
            radius,
            limit,
        } => handle_stations(
            &cli.stations,
            &StationsArgs {
                near,
                radius,
                limit,
            },
            cli.format,
        ),
        Command::Trip {
            from,
            to,
            trips,
            economy,
            algorithm,
            diesel_price,
            geojson,
        } => handle_trip(
            &cli.stations,
            &TripArgs {
                from,
                to,
                trips,
                economy,
                algorithm,
                max_leg: cli.max_leg,
                diesel_price,
                geojson,
            },
            cli.format,
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
