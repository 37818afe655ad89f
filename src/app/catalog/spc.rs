//! Storm Prediction Center observed soundings
//!
//! The index page links one `YYMMDDHH_OBS/` directory per observation batch;
//! each batch page shows one image per station with the station code in the
//! `alt` attribute.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::join_url;
use crate::app::client::ListingFetcher;
use crate::app::models::timestamps::{self, YYMMDDHH};
use crate::app::models::{RunTime, StationId};
use crate::errors::DiscoveryResult;

fn run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{8})_OBS").expect("SPC run pattern is valid"))
}

fn station_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"alt="(\w{3}|\d{5})""#).expect("SPC station pattern is valid"))
}

/// Unique observation times in the index, oldest first
pub(crate) fn scan_runs(text: &str) -> DiscoveryResult<Vec<RunTime>> {
    let runs = run_pattern()
        .captures_iter(text)
        .map(|cap| timestamps::parse_yymmddhh(&cap[1]))
        .collect::<DiscoveryResult<BTreeSet<_>>>()?;
    Ok(runs.into_iter().collect())
}

/// Station codes on a batch page, in page order
pub(crate) fn scan_stations(text: &str) -> Vec<StationId> {
    station_pattern()
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

pub(crate) fn stations_url(base: &Url, run: &RunTime) -> DiscoveryResult<Url> {
    join_url(base, &format!("{}_OBS/", run.format(YYMMDDHH)))
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
