use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use surge_core::source::ticketmaster::parse_events;
use surge_core::{generate_alerts, Config, EventSource, TicketmasterClient};
use surge_transit::provider::{load_stations, StaticStationDirectory};

mod output;

use output::{render_table, write_map_geojson};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "surge-alerts",
    author,
    version,
    about = "Find upcoming events likely to cause ridership surges at nearby stations",
    long_about = "Fetches upcoming events from the Ticketmaster Discovery API, matches each \
                  venue to its nearest station, keeps events within the distance threshold \
                  and rates their impact from the venue type.\n\n\
                  Stations are read from a CSV file with Station, Line, Latitude and \
                  Longitude columns; one row per station and line."
)]
struct Args {
    /// Station table (CSV)
    #[arg(short, long)]
    stations: PathBuf,

    /// TOML config file (falls back to $SURGE_CONFIG, then defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ticketmaster API key
    #[arg(long, env = "TICKETMASTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Read a saved Discovery API response instead of calling the API
    #[arg(long)]
    events: Option<PathBuf>,

    /// Override the alert radius around stations, in km
    #[arg(long)]
    max_distance: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Also write station and event points as GeoJSON for map display
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(max) = args.max_distance {
        config.alerts.max_distance_km = max;
        config.validate().context("Invalid --max-distance")?;
    }

    // Phase 1: stations
    let records = load_stations(&args.stations)
        .with_context(|| format!("Failed to load station table {}", args.stations.display()))?;
    let directory = StaticStationDirectory::from_records(records)
        .context("Station table is unusable")?;
    tracing::info!(
        stations = directory.station_count(),
        rows = directory.records().len(),
        "station directory ready"
    );

    // Phase 2: events
    let events = match &args.events {
        Some(path) => {
            let body = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_events(&body, &config.relevance)
                .with_context(|| format!("Failed to parse events from {}", path.display()))?
        }
        None => {
            let Some(api_key) = args.api_key.as_deref() else {
                bail!("No API key: pass --api-key or set TICKETMASTER_API_KEY (or use --events <file>)");
            };
            let client = TicketmasterClient::new(
                config.ticketmaster.clone(),
                api_key,
                config.relevance.clone(),
            )?;
            client
                .fetch_events()
                .await
                .context("Failed to fetch events from Ticketmaster")?
        }
    };

    // Phase 3: alerts
    let alerts = generate_alerts(&events, &directory, config.alerts.max_distance_km)
        .context("Failed to generate alerts")?;

    if let Some(path) = &args.geojson {
        write_map_geojson(&directory, &events, &alerts, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote map layer");
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&alerts)?),
        Format::Table if alerts.is_empty() => {
            println!("No upcoming events found near stations.");
        }
        Format::Table => {
            println!(
                "Found {} relevant event(s) within {} km of a station.\n",
                alerts.len(),
                config.alerts.max_distance_km
            );
            print!("{}", render_table(&alerts));
        }
    }

    Ok(())
}
