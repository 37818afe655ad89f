//! Penn State BUFKIT mirror
//!
//! The mirror only advertises its newest run per model, through a
//! `<model>.<YYYYMMDDHHMM>.done` marker in the top-level listing, so run
//! discovery always yields a single run. Station files live under
//! `<MODEL>/<HH>/<token>_<station>.buf`.
//!
//! The NAM markers do not distinguish the standard (00/12Z) cycles from the
//! off-hour (06/18Z) ones. When the marker's hour has the wrong parity for
//! the requested cycles the run is stepped back six hours to the previous
//! cycle of the requested kind.

use chrono::{Duration, Timelike};
use regex::Regex;
use tracing::debug;
use url::Url;

use super::join_url;
use crate::app::cache::ListingCache;
use crate::app::client::ListingFetcher;
use crate::app::models::timestamps;
use crate::app::models::{Model, RunTime, StationId};
use crate::errors::{DiscoveryError, DiscoveryResult};

/// Which NAM cycles a lookup is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycles {
    /// 00Z and 12Z
    OnHour,
    /// 06Z and 18Z
    OffHour,
}

fn unsupported(model: Model) -> DiscoveryError {
    DiscoveryError::unknown("psu", model.as_str())
}

/// Newest run advertised for `model`, if any
pub(crate) fn scan_latest_run(text: &str, model: Model) -> DiscoveryResult<Option<RunTime>> {
    let name = model.psu_listing_name().ok_or_else(|| unsupported(model))?;
    let pattern = Regex::new(&format!(r"\b{}\.(\d{{12}})\.done", regex::escape(name)))?;

    let mut latest = None;
    for cap in pattern.captures_iter(text) {
        let run = timestamps::parse_yyyymmddhhmm(&cap[1])?;
        if latest.map_or(true, |current| run > current) {
            latest = Some(run);
        }
    }
    Ok(latest)
}

/// Step a NAM run back to the previous cycle of the requested kind
pub(crate) fn adjust_cycle(run: RunTime, model: Model, cycles: Cycles) -> RunTime {
    if !model.is_nam_family() {
        return run;
    }

    let wrong_parity = match cycles {
        Cycles::OffHour => matches!(run.hour(), 0 | 12),
        Cycles::OnHour => matches!(run.hour(), 6 | 18),
    };

    if wrong_parity {
        run - Duration::hours(6)
    } else {
        run
    }
}

/// Station codes in a model/cycle directory listing
pub(crate) fn scan_stations(text: &str, model: Model) -> DiscoveryResult<Vec<StationId>> {
    let token = model.psu_file_token().ok_or_else(|| unsupported(model))?;
    let pattern = Regex::new(&format!(r"\b{}_(\w+)\.buf", token))?;

    Ok(pattern
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect())
}

pub(crate) fn stations_url(base: &Url, model: Model, run: &RunTime) -> DiscoveryResult<Url> {
    let directory = model.psu_directory().ok_or_else(|| unsupported(model))?;
    join_url(base, &format!("{}/{:02}/", directory, run.hour()))
}

pub(crate) async fn list_runs<F: ListingFetcher>(
    fetcher: &F,
    cache: &ListingCache,
    base: &Url,
    model: Model,
    cycles: Cycles,
) -> DiscoveryResult<Vec<RunTime>> {
    let text = cache.get_or_fetch(|| fetcher.fetch(base)).await?;

    let run = scan_latest_run(&text, model)?.ok_or_else(|| {
        DiscoveryError::not_found(format!("{} run marker", model), base.as_str())
    })?;
    let adjusted = adjust_cycle(run, model, cycles);
    if adjusted != run {
        debug!("Adjusted {} run {} to {} for {:?} cycles", model, run, adjusted, cycles);
    }

    Ok(vec![adjusted])
}

pub(crate) async fn list_stations<F: ListingFetcher>(
    fetcher: &F,
    base: &Url,
    model: Model,
    run: &RunTime,
) -> DiscoveryResult<Vec<StationId>> {
    let url = stations_url(base, model, run)?;
    let text = fetcher.fetch(&url).await?;
    scan_stations(&text, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> RunTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    const LISTING: &str = "\
-rw-r--r--   1 ftp ftp     0 Jan 01 03:10 gfs.201201010000.done
-rw-r--r--   1 ftp ftp     0 Jan 01 02:40 nam.201201010000.done
-rw-r--r--   1 ftp ftp     0 Jan 01 02:55 nam4km.201201010600.done
-rw-r--r--   1 ftp ftp     0 Jan 01 03:05 hrrr.201201010200.done
drwxr-xr-x   2 ftp ftp  4096 Jan 01 03:10 GFS
drwxr-xr-x   2 ftp ftp  4096 Jan 01 03:10 NAM4KM";

    #[test]
    fn test_scan_latest_run() {
        assert_eq!(
            scan_latest_run(LISTING, Model::Gfs).unwrap(),
            Some(at(2012, 1, 1, 0))
        );
        assert_eq!(
            scan_latest_run(LISTING, Model::Nam4km).unwrap(),
            Some(at(2012, 1, 1, 6))
        );
        assert_eq!(scan_latest_run(LISTING, Model::Sref).unwrap(), None);
    }

    #[test]
    fn test_nam_marker_does_not_match_nam4km() {
        let text = "nam4km.201201010600.done";
        assert_eq!(scan_latest_run(text, Model::Nam).unwrap(), None);
    }

    #[test]
    fn test_latest_of_several_markers() {
        let text = "rap.201201010100.done\nrap.201201010300.done\nrap.201201010200.done";
        assert_eq!(
            scan_latest_run(text, Model::Rap).unwrap(),
            Some(at(2012, 1, 1, 3))
        );
    }

    #[test]
    fn test_off_hour_adjustment() {
        for hour in [0, 12] {
            let raw = at(2012, 1, 2, hour);
            assert_eq!(
                adjust_cycle(raw, Model::Nam, Cycles::OffHour),
                raw - Duration::hours(6)
            );
        }
        for hour in [6, 18] {
            let raw = at(2012, 1, 2, hour);
            assert_eq!(adjust_cycle(raw, Model::Nam4km, Cycles::OffHour), raw);
        }
    }

    #[test]
    fn test_on_hour_adjustment() {
        for hour in [6, 18] {
            let raw = at(2012, 1, 2, hour);
            assert_eq!(
                adjust_cycle(raw, Model::Nam4km, Cycles::OnHour),
                raw - Duration::hours(6)
            );
        }
        for hour in [0, 12] {
            let raw = at(2012, 1, 2, hour);
            assert_eq!(adjust_cycle(raw, Model::Nam, Cycles::OnHour), raw);
        }
    }

    #[test]
    fn test_non_nam_never_adjusted() {
        let raw = at(2012, 1, 2, 6);
        assert_eq!(adjust_cycle(raw, Model::Gfs, Cycles::OnHour), raw);
        assert_eq!(adjust_cycle(raw, Model::Rap, Cycles::OffHour), raw);
    }

    #[test]
    fn test_adjustment_crosses_midnight() {
        let raw = at(2012, 1, 2, 0);
        assert_eq!(
            adjust_cycle(raw, Model::Nam, Cycles::OffHour),
            at(2012, 1, 1, 18)
        );
    }

    #[test]
    fn test_scan_stations() {
        let text = "\
-rw-r--r--   1 ftp ftp 812345 Jan 01 03:10 namm_kbna.buf
-rw-r--r--   1 ftp ftp 812345 Jan 01 03:10 nam_kmsp.buf
-rw-r--r--   1 ftp ftp 812345 Jan 01 03:10 nam4km_kbna.buf
-rw-r--r--   1 ftp ftp 812345 Jan 01 03:10 namm_kbna.buf";

        assert_eq!(
            scan_stations(text, Model::Nam).unwrap(),
            vec!["kbna", "kmsp", "kbna"]
        );
        assert_eq!(scan_stations(text, Model::Nam4km).unwrap(), vec!["kbna"]);
    }

    #[test]
    fn test_gfs_files_use_gfs3_prefix() {
        let text = "gfs3_kbna.buf\ngfs_kmso.buf";
        assert_eq!(scan_stations(text, Model::Gfs).unwrap(), vec!["kbna"]);
    }

    #[test]
    fn test_stations_url() {
        let base = Url::parse("ftp://ftp.meteo.psu.edu/pub/bufkit/").unwrap();
        assert_eq!(
            stations_url(&base, Model::Nam4km, &at(2012, 1, 1, 6))
                .unwrap()
                .as_str(),
            "ftp://ftp.meteo.psu.edu/pub/bufkit/NAM4KM/06/"
        );
    }

    #[test]
    fn test_models_outside_psu_are_rejected() {
        assert!(matches!(
            scan_latest_run(LISTING, Model::Observed),
            Err(DiscoveryError::UnknownSource { .. })
        ));
    }
}
