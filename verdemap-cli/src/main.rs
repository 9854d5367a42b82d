//! Verdemap CLI - Command-line interface
//!
//! Drives one NDVI submission end to end: parses an area of interest and a
//! date range from arguments, runs admission control, calls the processing
//! service, and prints the resulting series and layer listing.

use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use verdemap::admission::{AdmissionConfig, DateRange, Frequency};
use verdemap::aoi::{LonLat, Polygon};
use verdemap::app::{build_runner, AppConfig, DEFAULT_ENDPOINT};
use verdemap::ndvi::SeriesPoint;
use verdemap::overlay::{LayerDescriptor, MapSurface};
use verdemap::session::{ChartSink, SessionEvent, SessionState};

/// Request an NDVI time series for a drawn area of interest.
#[derive(Debug, Parser)]
#[command(name = "verdemap", version, about)]
struct Cli {
    /// Polygon vertex as LON,LAT; repeat at least three times.
    #[arg(long = "vertex", value_name = "LON,LAT", required = true)]
    vertices: Vec<String>,

    /// First sampled date (YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,

    /// Last sampled date (YYYY-MM-DD).
    #[arg(long)]
    end: NaiveDate,

    /// Sampling cadence: weekly or monthly.
    #[arg(long, default_value = "weekly")]
    frequency: String,

    /// Processing service endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Maximum accepted polygon area in km².
    #[arg(long, value_name = "KM2")]
    max_area: Option<f64>,

    /// Overall submission deadline in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// Map capability that narrates overlay changes on stdout.
#[derive(Default)]
struct ConsoleSurface;

impl MapSurface for ConsoleSurface {
    fn show_overlay(&mut self, layer: &LayerDescriptor, opacity: f64) {
        println!(
            "showing layer {} ({}) at opacity {:.2}",
            layer.date, layer.image_url, opacity
        );
    }

    fn hide_overlay(&mut self, layer: &LayerDescriptor) {
        debug!(date = %layer.date, "hide overlay");
    }

    fn set_overlay_opacity(&mut self, layer: &LayerDescriptor, opacity: f64) {
        println!("layer {} opacity set to {:.2}", layer.date, opacity);
    }
}

/// Chart capability that prints the series as a table.
#[derive(Default)]
struct ConsoleChart;

impl ChartSink for ConsoleChart {
    fn render(&mut self, series: &[SeriesPoint]) {
        if series.is_empty() {
            println!("series: no samples");
            return;
        }
        println!("date        ndvi");
        for point in series {
            println!("{}  {:+.3}", point.date, point.value);
        }
    }

    fn clear(&mut self) {}
}

fn parse_vertex(raw: &str) -> Result<LonLat, String> {
    let (lon, lat) = raw
        .split_once(',')
        .ok_or_else(|| format!("vertex '{}' is not LON,LAT", raw))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude in '{}'", raw))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude in '{}'", raw))?;
    Ok(LonLat::new(lon, lat))
}

async fn run(cli: Cli) -> Result<(), String> {
    let frequency: Frequency = cli.frequency.parse()?;

    let vertices = cli
        .vertices
        .iter()
        .map(|raw| parse_vertex(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let polygon = Polygon::new(vertices);

    let mut admission = AdmissionConfig::default();
    if let Some(max_area) = cli.max_area {
        admission = admission.with_max_area_sq_km(max_area);
    }
    let mut config = AppConfig::new(cli.endpoint).with_admission(admission);
    if let Some(secs) = cli.timeout {
        config.client.call_timeout = Duration::from_secs(secs);
    }

    let mut runner = build_runner(&config, ConsoleSurface, ConsoleChart)
        .map_err(|e| e.to_string())?;
    runner
        .session_mut()
        .dispatch(SessionEvent::PolygonDrawn(polygon));

    let range = DateRange::new(cli.start, cli.end);
    println!("requesting {} NDVI series {} to {}...", cli.frequency, cli.start, cli.end);

    let state = runner.submit_and_wait(range, frequency).await;
    let result = match state {
        SessionState::Succeeded { layer_count: 0 } => {
            println!("done: no imagery found for the requested window");
            Ok(())
        }
        SessionState::Succeeded { layer_count } => {
            println!("done: {} layers available", layer_count);
            Ok(())
        }
        SessionState::Rejected(reason) => Err(format!("rejected: {}", reason)),
        SessionState::Failed(error) => Err(format!("failed: {}", error)),
        other => Err(format!("submission did not settle: {:?}", other)),
    };

    runner.shutdown();
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
