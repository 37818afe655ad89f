//! Command handlers for Sounding Catalog CLI
//!
//! This module implements the command handlers that turn parsed arguments
//! into catalog lookups and print the results as text or JSON.

use std::time::Instant;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::{Catalog, ListingClient, ListingFetcher, Product, RunTime, StationId};
use crate::cli::{GlobalArgs, ProductArgs, StationsArgs, SurveyArgs};
use crate::config::AppConfig;
use crate::errors::{DiscoveryError, Result};

/// Display format for run times in text output
const RUN_DISPLAY_FORMAT: &str = "%Y-%m-%d %HZ";

/// Runs published for one product
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunsReport {
    pub product: String,
    pub runs: Vec<RunTime>,
}

/// Stations published for one run of a product
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationsReport {
    pub product: String,
    pub run: RunTime,
    pub stations: Vec<StationId>,
}

/// One line of the survey table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveyEntry {
    pub product: String,
    pub latest_run: Option<RunTime>,
    pub station_count: Option<usize>,
    pub error: Option<String>,
}

/// Handle the products command
pub async fn handle_products(global: &GlobalArgs) -> Result<()> {
    let products: Vec<String> = Product::all().iter().map(Product::to_string).collect();

    if global.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
    } else {
        for product in products {
            println!("{}", product);
        }
    }
    Ok(())
}

/// Handle the runs command
pub async fn handle_runs(global: &GlobalArgs, config: &AppConfig, args: ProductArgs) -> Result<()> {
    let product = Product::parse(&args.source, &args.model)?;
    let catalog = build_catalog(config)?;

    info!("Listing runs for {}", product);
    let runs = catalog.list_runs(product).await?;
    let report = RunsReport {
        product: product.to_string(),
        runs,
    };

    if global.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_runs(&report, global.quiet));
    }
    Ok(())
}

/// Handle the stations command
///
/// Without `--run` the latest published run is used.
pub async fn handle_stations(
    global: &GlobalArgs,
    config: &AppConfig,
    args: StationsArgs,
) -> Result<()> {
    let product = Product::parse(&args.product.source, &args.product.model)?;
    let catalog = build_catalog(config)?;

    let run = match args.run {
        Some(run) => run,
        None => {
            let run = catalog.latest_run(product).await?;
            info!("Using latest run {} for {}", run, product);
            run
        }
    };

    let stations = catalog.list_stations(product, &run).await?;
    let report = StationsReport {
        product: product.to_string(),
        run,
        stations,
    };

    if global.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_stations(&report, global.quiet));
    }
    Ok(())
}

/// Handle the survey command
///
/// Every product is looked up concurrently. Failures are reported per
/// product and never abort the survey.
pub async fn handle_survey(global: &GlobalArgs, config: &AppConfig, args: SurveyArgs) -> Result<()> {
    let start_time = Instant::now();
    let catalog = build_catalog(config)?;
    let products = Product::all();
    let runs_only = args.runs_only;

    let progress = if global.json || global.quiet || !atty::is(atty::Stream::Stderr) {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(products.len() as u64);
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} Surveying products [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        bar
    };

    let entries = join_all(products.into_iter().map(|product| {
        let catalog = &catalog;
        let progress = &progress;
        async move {
            let entry = survey_product(catalog, product, runs_only).await;
            progress.set_message(entry.product.clone());
            progress.inc(1);
            entry
        }
    }))
    .await;
    progress.finish_and_clear();

    let failures = entries.iter().filter(|e| e.error.is_some()).count();
    info!(
        "Survey of {} products finished in {:?} ({} failed)",
        entries.len(),
        start_time.elapsed(),
        failures
    );

    if global.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_survey(&entries));
    }
    Ok(())
}

/// Build a catalog over the real listing client from configuration
pub fn build_catalog(config: &AppConfig) -> Result<Catalog<ListingClient>> {
    let (client_config, urls, psu_listing_ttl) = config.to_runtime_config()?;
    debug!("Building catalog with PSU listing TTL {:?}", psu_listing_ttl);
    let client = ListingClient::with_config(client_config)?;
    Ok(Catalog::with_settings(client, urls, psu_listing_ttl))
}

/// Latest run and station count of one product
pub async fn survey_product<F: ListingFetcher>(
    catalog: &Catalog<F>,
    product: Product,
    runs_only: bool,
) -> SurveyEntry {
    let mut entry = SurveyEntry {
        product: product.to_string(),
        latest_run: None,
        station_count: None,
        error: None,
    };

    let result = match catalog.latest_run(product).await {
        Ok(run) => {
            entry.latest_run = Some(run);
            if runs_only {
                Ok(())
            } else {
                catalog
                    .list_stations(product, &run)
                    .await
                    .map(|stations| entry.station_count = Some(stations.len()))
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        match e {
            DiscoveryError::NotImplemented { .. } => debug!("Skipping {}: {}", product, e),
            _ => warn!("Survey of {} failed: {}", product, e),
        }
        entry.error = Some(e.to_string());
    }
    entry
}

/// Text rendering of a runs report
pub fn render_runs(report: &RunsReport, quiet: bool) -> String {
    let mut out = String::new();
    if !quiet {
        out.push_str(&format!("{} ({} runs)\n", report.product, report.runs.len()));
    }
    for run in &report.runs {
        out.push_str(&format!("{}\n", run.format(RUN_DISPLAY_FORMAT)));
    }
    out
}

/// Text rendering of a stations report
pub fn render_stations(report: &StationsReport, quiet: bool) -> String {
    let mut out = String::new();
    if !quiet {
        out.push_str(&format!(
            "{} at {} ({} stations)\n",
            report.product,
            report.run.format(RUN_DISPLAY_FORMAT),
            report.stations.len()
        ));
    }
    for station in &report.stations {
        out.push_str(&format!("{}\n", station));
    }
    out
}

/// Text rendering of the survey table
pub fn render_survey(entries: &[SurveyEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.product.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in entries {
        let detail = match (&entry.latest_run, entry.station_count, &entry.error) {
            (_, _, Some(error)) => format!("error: {}", error),
            (Some(run), Some(count), None) => {
                format!("{}  {} stations", run.format(RUN_DISPLAY_FORMAT), count)
            }
            (Some(run), None, None) => run.format(RUN_DISPLAY_FORMAT).to_string(),
            (None, _, None) => "no runs".to_string(),
        };
        out.push_str(&format!("{:<width$}  {}\n", entry.product, detail, width = width));
    }
    out
}
