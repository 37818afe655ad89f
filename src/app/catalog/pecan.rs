//! OU PECAN ensemble
//!
//! Only one campaign run is published, so run discovery returns it without
//! touching the network. Station files are named
//! `<stn>_<YYYYMMDDHH>.txt`; every member of the ensemble repeats the same
//! station, so codes are deduplicated.

use std::collections::BTreeSet;

use regex::Regex;
use url::Url;

use super::join_url;
use crate::app::client::ListingFetcher;
use crate::app::models::timestamps::{self, YYMMDDHH, YYYYMMDDHH};
use crate::app::models::{RunTime, StationId};
use crate::constants::sources::PECAN_FIXED_RUN;
use crate::errors::DiscoveryResult;

pub(crate) fn list_runs() -> DiscoveryResult<Vec<RunTime>> {
    Ok(vec![timestamps::parse_yymmddhh(PECAN_FIXED_RUN)?])
}

/// Unique station codes for `run`, sorted
pub(crate) fn scan_stations(text: &str, run: &RunTime) -> DiscoveryResult<Vec<StationId>> {
    let pattern = Regex::new(&format!(r"(\w{{3}})_{}\.txt", run.format(YYYYMMDDHH)))?;

    let stations: BTreeSet<StationId> = pattern
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect();
    Ok(stations.into_iter().collect())
}

pub(crate) fn stations_url(base: &Url, run: &RunTime) -> DiscoveryResult<Url> {
    join_url(base, &format!("{}/soundings/", run.format(YYMMDDHH)))
}

pub(crate) async fn list_stations<F: ListingFetcher>(
    fetcher: &F,
    base: &Url,
    run: &RunTime,
) -> DiscoveryResult<Vec<StationId>> {
    let url = stations_url(base, run)?;
    let text = fetcher.fetch(&url).await?;
    scan_stations(&text, run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn campaign_run() -> RunTime {
        NaiveDate::from_ymd_opt(2013, 6, 25)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_fixed_run() {
        assert_eq!(list_runs().unwrap(), vec![campaign_run()]);
    }

    #[test]
    fn test_scan_stations_dedupes_and_sorts() {
        let text = r#"
            <a href="OUN_2013062500.txt">OUN_2013062500.txt</a>
            <a href="DDC_2013062500.txt">DDC_2013062500.txt</a>
            <a href="OUN_2013062512.txt">OUN_2013062512.txt</a>
        "#;
        assert_eq!(
            scan_stations(text, &campaign_run()).unwrap(),
            vec!["DDC", "OUN"]
        );
    }

    #[test]
    fn test_stations_url() {
        let base = Url::parse("http://weather.ou.edu/~map/real_time_data/").unwrap();
        assert_eq!(
            stations_url(&base, &campaign_run()).unwrap().as_str(),
            "http://weather.ou.edu/~map/real_time_data/13062500/soundings/"
        );
    }
}
