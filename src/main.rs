//! CLI entry point for the parking dashboard.
//!
//! Loads one parking sessions CSV, aggregates it once, and either logs the
//! summary, renders a static HTML dashboard, or exports the data as JSON/CSV.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use parking_dashboard::{
    config::{DashboardConfig, parse_center},
    dashboard::{Dashboard, render_html},
    output::{print_json, print_pretty, write_html, write_json, write_records_csv},
    timestamp::parse_offset,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "parking_dashboard")]
#[command(about = "Summarise and visualise parking bay sessions from a CSV file", long_about = None)]
struct Cli {
    /// Offset used to read arrival hours, e.g. "+08:00" (overrides PARKING_UTC_OFFSET)
    #[arg(long, global = true, value_parser = parse_zone)]
    utc_offset: Option<chrono::FixedOffset>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the summary statistics
    Summary {
        /// Path or URL of the CSV (defaults to PARKING_DATA_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Render the dashboard as a static HTML page
    Render {
        /// Path or URL of the CSV (defaults to PARKING_DATA_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// HTML file to write
        #[arg(short, long, default_value = "dashboard.html")]
        output: String,

        /// Map centre as "lat,lon" (overrides PARKING_MAP_CENTER)
        #[arg(long, value_parser = parse_center_arg)]
        center: Option<(f64, f64)>,

        /// Map zoom level (overrides PARKING_MAP_ZOOM)
        #[arg(long)]
        zoom: Option<u8>,
    },
    /// Export records and summary as JSON, optionally the cleaned records as CSV
    Export {
        /// Path or URL of the CSV (defaults to PARKING_DATA_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// JSON file to write
        #[arg(short, long, default_value = "dashboard.json")]
        output: String,

        /// Also write the cleaned records to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn parse_zone(s: &str) -> Result<chrono::FixedOffset, String> {
    parse_offset(s).ok_or_else(|| format!("invalid UTC offset '{s}'"))
}

fn parse_center_arg(s: &str) -> Result<(f64, f64), String> {
    parse_center(s).map_err(|e| format!("{e:#}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/parking_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("parking_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut cfg = DashboardConfig::from_env()?;
    if let Some(zone) = cli.utc_offset {
        cfg.zone = zone;
    }

    match cli.command {
        Commands::Summary { source, format } => {
            apply_source(&mut cfg, source);
            let dashboard = Dashboard::load(&cfg).await;

            match &dashboard.summary {
                Some(summary) => match format {
                    Format::Pretty => print_pretty(summary),
                    Format::Json => print_json(summary)?,
                },
                None => warn!(source = %cfg.source, "No parking data to summarise"),
            }
        }
        Commands::Render {
            source,
            output,
            center,
            zoom,
        } => {
            apply_source(&mut cfg, source);
            if let Some(center) = center {
                cfg.map_center = center;
            }
            if let Some(zoom) = zoom {
                cfg.map_zoom = zoom;
            }

            let dashboard = Dashboard::load(&cfg).await;
            write_html(&output, &render_html(&dashboard, &cfg))?;
            info!(output = %output, records = dashboard.records.len(), "Dashboard rendered");
        }
        Commands::Export { source, output, csv } => {
            apply_source(&mut cfg, source);
            let dashboard = Dashboard::load(&cfg).await;

            write_json(&output, &dashboard)?;
            if let Some(csv_path) = csv {
                write_records_csv(&csv_path, &dashboard.records)?;
                info!(csv = %csv_path, "Cleaned records exported");
            }
            info!(output = %output, records = dashboard.records.len(), "Dashboard exported");
        }
    }

    Ok(())
}

fn apply_source(cfg: &mut DashboardConfig, source: Option<String>) {
    if let Some(source) = source {
        cfg.source = source;
    }
}
