//! NCAR ensemble (OU mirror)
//!
//! Runs are `YYYYMMDD_HH/` directories; each holds one `<stn>.txt` per
//! ensemble grid point.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::join_url;
use crate::app::client::ListingFetcher;
use crate::app::models::timestamps::{self, YYYYMMDD_HH};
use crate::app::models::{RunTime, StationId};
use crate::errors::DiscoveryResult;

fn run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{8}_\d{2})").expect("NCAR run pattern is valid"))
}

fn station_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\w{3})\.txt").expect("NCAR station pattern is valid"))
}

/// Unique run directories in the listing, oldest first
pub(crate) fn scan_runs(text: &str) -> DiscoveryResult<Vec<RunTime>> {
    let runs = run_pattern()
        .captures_iter(text)
        .map(|cap| timestamps::parse_yyyymmdd_hh(&cap[1]))
        .collect::<DiscoveryResult<BTreeSet<_>>>()?;
    Ok(runs.into_iter().collect())
}

/// Station codes in a run directory, in listing order
pub(crate) fn scan_stations(text: &str) -> Vec<StationId> {
    station_pattern()
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

pub(crate) fn stations_url(base: &Url, run: &RunTime) -> DiscoveryResult<Url> {
    join_url(base, &format!("{}/", run.format(YYYYMMDD_HH)))
}

pub(crate) async fn list_runs<F: ListingFetcher>(
    fetcher: &F,
    base: &Url,
) -> DiscoveryResult<Vec<RunTime>> {
    let text = fetcher.fetch(base).await?;
    scan_runs(&text)
}

pub(crate) async fn list_stations<F: ListingFetcher>(
    fetcher: &F,
    base: &Url,
    run: &RunTime,
) -> DiscoveryResult<Vec<StationId>> {
    let url = stations_url(base, run)?;
    let text = fetcher.fetch(&url).await?;
    Ok(scan_stations(&text))
}
