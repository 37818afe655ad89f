//! Integration tests for run and station discovery
//!
//! These tests drive the public catalog API against canned listings that
//! mirror what each source actually serves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use sounding_catalog::app::{Catalog, ListingFetcher, Model, Product, Source, SourceUrls};
use sounding_catalog::errors::{DiscoveryError, FetchError, FetchResult};
use url::Url;

const SPC_INDEX: &str = r#"<html><body>
<a href="12010100_OBS/">12010100_OBS/</a>
<a href="12010112_OBS/">12010112_OBS/</a>
<a href="12010100_OBS/">12010100_OBS/</a>
</body></html>"#;

const SPC_RUN_PAGE: &str = r#"<map name="stations">
<area href="../OUN.gif" alt="OUN">
<area href="../72357.gif" alt="72357">
<area href="../legend.gif" alt="legend">
</map>"#;

const PSU_LISTING: &str = "\
-rw-r--r--   1 ftp ftp 0 Jan 01 03:10 gfs.201201010000.done
-rw-r--r--   1 ftp ftp 0 Jan 01 09:10 nam.201201010600.done
-rw-r--r--   1 ftp ftp 0 Jan 01 09:20 nam4km.201201010600.done
-rw-r--r--   1 ftp ftp 0 Jan 01 05:00 rap.201201010400.done
drwxr-xr-x   2 ftp ftp 4096 Jan 01 00:00 GFS
drwxr-xr-x   2 ftp ftp 4096 Jan 01 00:00 NAM";

const NCAR_INDEX: &str = r#"<a href="20150601_00/">20150601_00/</a>
<a href="20150531_00/">20150531_00/</a>"#;

/// Serves canned pages and counts every request
#[derive(Default, Clone)]
struct CannedFetcher {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<AtomicUsize>,
}

impl CannedFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, text)| (url.to_string(), text.to_string()))
                    .collect(),
            ),
            requests: Arc::default(),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ListingFetcher for CannedFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn test_urls() -> SourceUrls {
    SourceUrls {
        spc: Url::parse("http://spc.test/exper/soundings/").unwrap(),
        psu: Url::parse("ftp://psu.test/pub/bufkit/").unwrap(),
        pecan: Url::parse("http://ou.test/real_time_data/").unwrap(),
        ncar_ens: Url::parse("http://sharp.test/ncarens/").unwrap(),
    }
}

fn catalog(pages: &[(&str, &str)]) -> (Catalog<CannedFetcher>, CannedFetcher) {
    let fetcher = CannedFetcher::new(pages);
    let catalog = Catalog::with_settings(fetcher.clone(), test_urls(), Duration::from_secs(300));
    (catalog, fetcher)
}

#[tokio::test]
async fn test_spc_runs_then_stations() {
    let (catalog, _) = catalog(&[
        ("http://spc.test/exper/soundings/", SPC_INDEX),
        ("http://spc.test/exper/soundings/12010112_OBS/", SPC_RUN_PAGE),
    ]);
    let product = Product::parse("spc", "observed").unwrap();

    let runs = catalog.list_runs(product).await.unwrap();
    assert_eq!(runs, vec![at(2012, 1, 1, 0), at(2012, 1, 1, 12)]);

    let latest = catalog.latest_run(product).await.unwrap();
    let stations = catalog.list_stations(product, &latest).await.unwrap();
    assert_eq!(stations, vec!["OUN", "72357"]);
}

#[tokio::test(start_paused = true)]
async fn test_psu_products_share_one_listing_fetch() {
    let (catalog, fetcher) = catalog(&[("ftp://psu.test/pub/bufkit/", PSU_LISTING)]);

    let gfs = Product::parse("psu", "gfs").unwrap();
    let nam = Product::parse("psu", "nam").unwrap();
    let nam_off = Product::parse("psu_off", "4km nam").unwrap();

    assert_eq!(catalog.list_runs(gfs).await.unwrap(), vec![at(2012, 1, 1, 0)]);
    // on-hour NAM marker at 06Z belongs to the 00Z cycle
    assert_eq!(catalog.list_runs(nam).await.unwrap(), vec![at(2012, 1, 1, 0)]);
    // off-hour NAM keeps 06Z
    assert_eq!(catalog.list_runs(nam_off).await.unwrap(), vec![at(2012, 1, 1, 6)]);
    assert_eq!(fetcher.request_count(), 1);

    tokio::time::advance(Duration::from_secs(301)).await;
    catalog.list_runs(gfs).await.unwrap();
    assert_eq!(fetcher.request_count(), 2);
}

#[tokio::test]
async fn test_psu_missing_marker_is_not_found() {
    let (catalog, _) = catalog(&[("ftp://psu.test/pub/bufkit/", PSU_LISTING)]);
    let sref = Product::new(Source::Psu, Model::Sref).unwrap();

    match catalog.list_runs(sref).await {
        Err(DiscoveryError::NotFound { url, .. }) => {
            assert_eq!(url, "ftp://psu.test/pub/bufkit/")
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_psu_stations_for_run_hour() {
    let (catalog, _) = catalog(&[(
        "ftp://psu.test/pub/bufkit/NAM/06/",
        "nam_kokc.buf\nnamm_ktul.buf\nnam4km_kdfw.buf\n",
    )]);
    let nam_off = Product::new(Source::PsuOff, Model::Nam).unwrap();

    let stations = catalog
        .list_stations(nam_off, &at(2012, 1, 1, 6))
        .await
        .unwrap();
    assert_eq!(stations, vec!["kokc", "ktul"]);
}

#[tokio::test]
async fn test_ncar_runs_and_stations() {
    let (catalog, _) = catalog(&[
        ("http://sharp.test/ncarens/", NCAR_INDEX),
        (
            "http://sharp.test/ncarens/20150601_00/",
            "OUN.txt DDC.txt OUN.txt",
        ),
    ]);
    let product = Product::new(Source::NcarEns, Model::NcarEnsemble).unwrap();

    let runs = catalog.list_runs(product).await.unwrap();
    assert_eq!(runs, vec![at(2015, 5, 31, 0), at(2015, 6, 1, 0)]);

    let stations = catalog.list_stations(product, &runs[1]).await.unwrap();
    assert_eq!(stations, vec!["OUN", "DDC", "OUN"]);
}

#[test]
fn test_pecan_run_needs_no_listing() {
    let (catalog, fetcher) = catalog(&[]);
    let product = Product::parse("ou_pecan", "pecan ensemble").unwrap();

    let runs = tokio_test::block_on(catalog.list_runs(product)).unwrap();
    assert_eq!(runs, vec![at(2013, 6, 25, 0)]);
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_propagated() {
    let (catalog, _) = catalog(&[]);
    let product = Product::parse("ncar_ens", "ncar ensemble").unwrap();

    assert!(matches!(
        catalog.list_runs(product).await,
        Err(DiscoveryError::Transport(FetchError::Status { status: 404, .. }))
    ));
}

#[test]
fn test_unknown_pairs_are_rejected() {
    assert!(matches!(
        Product::parse("spc", "gfs"),
        Err(DiscoveryError::UnknownSource { .. })
    ));
    assert!(matches!(
        Product::parse("nowhere", "gfs"),
        Err(DiscoveryError::UnknownSource { .. })
    ));
}
