use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agroforecast",
    version,
    about = "Evapotranspiration, degree-day and heat-stress forecasts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Daily ET0 forecast table
    Report {
        #[command(flatten)]
        location: LocationArgs,
        /// Override the configured ET0 model
        #[arg(short, long, value_enum)]
        method: Option<MethodArg>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a saved report (JSON from `report --json`) to CSV
    Export {
        /// Report JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Directory for the CSV artifact
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Growing degree-days with single-day and predictive alerts
    Gdd {
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long)]
        json: bool,
    },
    /// Accumulated degree-days and single-day alert only
    GddSummary {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Interactive setup
    Init,
    /// Validate config and test the weather provider
    Check,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Hargreaves,
    Penman,
}
