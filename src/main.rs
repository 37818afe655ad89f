//! Sounding Catalog CLI application
//!
//! Command-line interface for discovering the sounding runs and stations
//! currently published by the supported data sources.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use sounding_catalog::cli::{
    Cli, Commands, handle_products, handle_runs, handle_stations, handle_survey,
};
use sounding_catalog::config::AppConfig;
use sounding_catalog::constants::env;
use sounding_catalog::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error ({}): {}", e.category(), e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("Sounding Catalog v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Products => {
            info!("Executing products command");
            handle_products(&cli.global).await
        }
        Commands::Runs(args) => {
            info!("Executing runs command");
            handle_runs(&cli.global, &config, args).await
        }
        Commands::Stations(args) => {
            info!("Executing stations command");
            handle_stations(&cli.global, &config, args).await
        }
        Commands::Survey(args) => {
            info!("Executing survey command");
            handle_survey(&cli.global, &config, args).await
        }
    }
}

/// Initialize logging from the verbosity flags and configured level
///
/// A filter in `SOUNDING_CATALOG_LOG` replaces both.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = cli.log_level(&config.logging.level);

    let filter = EnvFilter::try_from_env(env::LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(format!("sounding_catalog={}", log_level)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    debug!("Log level resolved to {}", log_level);
}
