use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod preview;
mod validate;

#[derive(Debug, Parser)]
#[command(name = "mapwidget")]
#[command(about = "Validate map widget configurations and preview what they render")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a widget configuration file (YAML or JSON)
    Validate {
        /// Path to the widget configuration
        config: PathBuf,
    },
    /// Print the locations the widget would place on the map
    Locations {
        /// Path to the widget configuration
        config: PathBuf,
        /// Platform fixture with records and microflow results
        #[arg(long)]
        records: Option<PathBuf>,
        /// Guid of the fixture record to use as context
        #[arg(long)]
        context: Option<String>,
    },
    /// Simulate a click on the map surface
    Click {
        /// Path to the widget configuration
        config: PathBuf,
        /// Latitude of the click
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the click
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Platform fixture with records and microflow results
        #[arg(long)]
        records: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = mapwidget_core::load_app_settings()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { config } => validate::run_validate(&config),
        Commands::Locations {
            config,
            records,
            context,
        } => {
            preview::run_locations(&settings, &config, records.as_deref(), context.as_deref())
                .await
        }
        Commands::Click {
            config,
            lat,
            lng,
            records,
        } => preview::run_click(&config, lat, lng, records.as_deref()).await,
    }
}
