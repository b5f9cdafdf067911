//! ute-consumo: daily energy consumption from UTE's self-service portal.
//!
//! ```bash
//! # Last 21 days
//! ute-consumo
//!
//! # Explicit window, portal date format
//! ute-consumo --from 29-12-2025 --to 18-01-2026
//!
//! # Raw numbers
//! ute-consumo --format json
//! ```

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ute_consumo::api::load_curve::{LoadCurve, DEFAULT_DATASET};
use ute_consumo::api::{parse_api_date, QueryWindow};
use ute_consumo::chart::{self, PlotConfig};
use ute_consumo::series::SeriesReport;
use ute_consumo::{PortalConfig, UtePortal};

/// Daily energy consumption from UTE's self-service portal.
///
/// Credentials come from UTE_USER, UTE_PASS, UTE_SA_ID and UTE_PS_ID
/// (a `.env` file is read if present).
#[derive(Parser)]
#[command(name = "ute-consumo", version)]
struct Cli {
    /// First day, dd-mm-yyyy
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last day, dd-mm-yyyy (default: today)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Days to show when --from is not given
    #[arg(long, default_value_t = 21)]
    days: u32,

    /// Chart height in rows
    #[arg(long, default_value_t = chart::DEFAULT_HEIGHT)]
    height: usize,

    /// Request timeout in seconds (overrides UTE_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Dataset to chart
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,

    #[arg(long, short = 'f', default_value = "text")]
    format: OutputFormat,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Chart and total
    Text,
    /// Report as JSON
    Json,
    /// One row per day
    Table,
}

#[repr(i32)]
enum ExitCode {
    Error = 1,
    Config = 2,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_api_date(value).map_err(|e| format!("expected dd-mm-yyyy: {e}"))
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "ute_consumo=debug,info"
    } else {
        "ute_consumo=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn window(cli: &Cli) -> Result<QueryWindow> {
    let end = cli.to.unwrap_or_else(|| Local::now().date_naive());
    let window = match cli.from {
        Some(start) => QueryWindow::new(start, end)?,
        None => QueryWindow::ending_on(end, cli.days)?,
    };
    Ok(window)
}

fn print_report(report: &SeriesReport, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let config = PlotConfig::default().with_height(cli.height);
            println!("{}", chart::plot(&report.values(), &config));
            println!("Total active energy (kWh): {:.2}", report.total);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            println!("{}", report.as_polars_df()?);
            println!("Total active energy (kWh): {:.2}", report.total);
        }
    }
    Ok(())
}

fn run(cli: &Cli, config: PortalConfig) -> Result<()> {
    let window = window(cli)?;
    debug!(?config, "starting");

    let portal = UtePortal::new(config)?;
    portal.authenticate()?;

    let config = portal.config();
    let report = LoadCurve::new(&portal, &config.sa_id, &config.ps_id)
        .with_dataset(&cli.dataset)
        .daily(&window)?;

    print_report(&report, cli)
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match PortalConfig::from_env_values() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(ExitCode::Config as i32);
        }
    };
    let config = match cli.timeout {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    };

    if let Err(e) = run(&cli, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(ExitCode::Error as i32);
    }
}
