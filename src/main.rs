mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;

use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands, LocationArgs, MethodArg};
use config::Config;
use datasources::MeteoblueClient;
use error::{AgroError, Result};
use logic::evapotranspiration::Et0Method;
use logic::ForecastService;
use models::{DayRecord, DegreeDayReport, Location};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

impl From<MethodArg> for Et0Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Hargreaves => Et0Method::Hargreaves,
            MethodArg::Penman => Et0Method::Penman,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Export { input, output_dir } => {
            let config = Config::load(cli.config)?;
            let content = std::fs::read_to_string(&input)?;
            let records: Vec<DayRecord> = serde_json::from_str(&content)?;
            let dir = output_dir.unwrap_or(config.export.output_dir);
            let path = logic::export::export_csv(&records, &dir)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Check => {
            let config = Config::load(cli.config)?;
            config.validate()?;
            println!("Configuration OK");
            let client = MeteoblueClient::new(
                config.meteoblue.clone(),
                config.agronomy.default_wind_speed_ms,
            )?;
            if client.test_connection().await? {
                println!("Meteoblue: OK");
                Ok(())
            } else {
                Err(AgroError::DataSourceUnavailable(
                    "Meteoblue rejected the request - check the API key".into(),
                ))
            }
        }
        Commands::Report {
            location,
            method,
            json,
        } => {
            let location = parse_location(location)?;
            let service = service(cli.config)?;
            let evaluated_on = Local::now().date_naive();
            let records = service
                .forecast_report(&location, method.map(Et0Method::from), evaluated_on)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_forecast(&records);
            }
            Ok(())
        }
        Commands::Gdd { location, json } => {
            let location = parse_location(location)?;
            let service = service(cli.config)?;
            let evaluated_on = Local::now().date_naive();
            let report = service.degree_day_report(&location, evaluated_on).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_degree_days(&report);
            }
            Ok(())
        }
        Commands::GddSummary { location } => {
            let location = parse_location(location)?;
            let service = service(cli.config)?;
            let summary = service.degree_day_summary(&location).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

/// Validated before any provider call
fn parse_location(args: LocationArgs) -> Result<Location> {
    Location::new(args.lat, args.lon)
}

fn service(config_path: Option<std::path::PathBuf>) -> Result<ForecastService<MeteoblueClient>> {
    let config = Config::load(config_path)?;
    config.validate()?;
    let client = MeteoblueClient::new(config.meteoblue, config.agronomy.default_wind_speed_ms)?;
    Ok(ForecastService::new(client, config.agronomy))
}

fn print_forecast(records: &[DayRecord]) {
    println!(
        "{:<12} {:>8} {:>8} {:>9} {:>9} {:>7} {:>7}",
        "Date", "Tmax", "Tmin", "Humidity", "Radiation", "Wind", "ET0"
    );
    for r in records {
        println!(
            "{:<12} {:>8.2} {:>8.2} {:>9.2} {:>9.2} {:>7.2} {:>7.2}",
            r.date.format("%d-%m-%Y"),
            r.t_max,
            r.t_min,
            r.humidity,
            r.radiation,
            r.wind,
            r.et0
        );
    }
}

fn print_degree_days(report: &DegreeDayReport) {
    println!("{:<12} {:>10} {:>8}", "Date", "Mean temp", "GDD");
    for row in &report.rows {
        println!(
            "{:<12} {:>10.2} {:>8.2}",
            row.date.format("%Y-%m-%d"),
            row.mean_temp,
            row.gdd
        );
    }
    println!();
    println!("Accumulated GDD: {:.2}", report.accumulated_gdd);
    println!(
        "Single-day alert: {}",
        if report.alert { "YES" } else { "no" }
    );
    match report.predictive_trigger_date {
        Some(date) => println!("Predictive heat-stress alert: YES (run complete on {})", date),
        None => println!("Predictive heat-stress alert: no"),
    }
}
