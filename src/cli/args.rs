//! Command-line argument parsing for Sounding Catalog
//!
//! This module defines the CLI structure using clap derive macros: listing
//! the known products, discovering runs and stations for one product, and
//! surveying every product at once.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::models::timestamps;
use crate::app::RunTime;

/// Sounding Catalog - Discover available sounding runs and stations
#[derive(Parser, Debug)]
#[command(
    name = "sounding_catalog",
    version,
    about = "Discover which sounding runs and stations are currently published",
    long_about = "Scrapes the SPC, Penn State BUFKIT, OU PECAN and NCAR ensemble listings
to report the available model runs and the stations published for each run."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every known source/model pair
    Products,

    /// List the runs currently published for a product
    Runs(ProductArgs),

    /// List the stations published for one run of a product
    Stations(StationsArgs),

    /// Report the latest run and station count of every product
    Survey(SurveyArgs),
}

/// Source and model naming one product
#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    /// Data source (spc, psu, psu_off, ou_pecan, ncar_ens, nssl)
    pub source: String,

    /// Model within the source (e.g. "gfs", "4km nam", "observed")
    pub model: String,
}

/// Arguments for the stations command
#[derive(Args, Debug, Clone)]
pub struct StationsArgs {
    #[command(flatten)]
    pub product: ProductArgs,

    /// Run to inspect as YYYYMMDDHH (defaults to the latest published run)
    #[arg(long, value_name = "YYYYMMDDHH", value_parser = parse_run)]
    pub run: Option<RunTime>,
}

/// Arguments for the survey command
#[derive(Args, Debug, Clone)]
pub struct SurveyArgs {
    /// Skip the per-run station listings and report runs only
    #[arg(long)]
    pub runs_only: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// Flags win over the configured level; an unparseable configured level
    /// falls back to WARN.
    pub fn log_level(&self, configured: &str) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured.parse().unwrap_or(tracing::Level::WARN)
        }
    }
}

fn parse_run(value: &str) -> Result<RunTime, String> {
    timestamps::parse_yyyymmddhh(value).map_err(|e| e.to_string())
}
