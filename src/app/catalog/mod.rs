//! Run and station discovery
//!
//! A [`Catalog`] answers two questions for every published [`Product`]:
//! which runs are currently available, and which stations are available for
//! one of those runs. Each answer costs one listing fetch (PSU run lookups
//! may be served from the shared listing cache instead).
//!
//! Per-source routines live in their own modules:
//! - `spc`: Storm Prediction Center observed soundings
//! - `psu`: Penn State BUFKIT mirror, standard and off-hour NAM cycles
//! - `pecan`: OU PECAN ensemble
//! - `ncar`: NCAR ensemble
//!
//! Station lists are deduplicated for PECAN only; the other sources return
//! codes exactly as they appear in the listing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sounding_catalog::app::{Catalog, ListingClient, Product};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(ListingClient::new()?);
//! let product = Product::parse("psu", "gfs")?;
//!
//! let runs = catalog.list_runs(product).await?;
//! if let Some(run) = runs.last() {
//!     let stations = catalog.list_stations(product, run).await?;
//!     println!("{} stations for {}", stations.len(), run);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::app::cache::ListingCache;
use crate::app::client::ListingFetcher;
use crate::app::models::{Product, RunTime, Source, StationId};
use crate::constants::{cache, sources};
use crate::errors::{DiscoveryError, DiscoveryResult, FetchError};

mod ncar;
mod pecan;
pub mod psu;
mod spc;

pub use psu::Cycles;

/// Base listing URLs for each source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    /// SPC soundings index
    pub spc: Url,
    /// PSU BUFKIT mirror root
    pub psu: Url,
    /// OU PECAN real-time data root
    pub pecan: Url,
    /// NCAR ensemble directory
    pub ncar_ens: Url,
}

impl Default for SourceUrls {
    fn default() -> Self {
        let parse = |url: &str| Url::parse(url).expect("Built-in source URL should be valid");
        Self {
            spc: parse(sources::SPC_BASE_URL),
            psu: parse(sources::PSU_BASE_URL),
            pecan: parse(sources::PECAN_BASE_URL),
            ncar_ens: parse(sources::NCAR_ENS_BASE_URL),
        }
    }
}

pub(crate) fn join_url(base: &Url, path: &str) -> DiscoveryResult<Url> {
    base.join(path).map_err(|e| {
        DiscoveryError::from(FetchError::InvalidUrl {
            url: format!("{}{}", base, path),
            error: e.to_string(),
        })
    })
}

/// Discovers runs and stations through a [`ListingFetcher`]
#[derive(Debug)]
pub struct Catalog<F> {
    fetcher: F,
    urls: SourceUrls,
    psu_cache: ListingCache,
}

impl<F: ListingFetcher> Catalog<F> {
    /// Creates a catalog using the built-in source URLs and a five minute PSU cache
    pub fn new(fetcher: F) -> Self {
        Self::with_settings(fetcher, SourceUrls::default(), cache::PSU_LISTING_TTL)
    }

    /// Creates a catalog with explicit source URLs and PSU listing TTL
    pub fn with_settings(fetcher: F, urls: SourceUrls, psu_listing_ttl: Duration) -> Self {
        Self {
            fetcher,
            urls,
            psu_cache: ListingCache::new(psu_listing_ttl),
        }
    }

    /// Runs currently published for `product`, oldest first and without duplicates
    ///
    /// # Errors
    ///
    /// - `DiscoveryError::Transport` if the listing cannot be fetched
    /// - `DiscoveryError::NotFound` if a PSU listing has no marker for the model
    /// - `DiscoveryError::NotImplemented` for NSSL products
    pub async fn list_runs(&self, product: Product) -> DiscoveryResult<Vec<RunTime>> {
        debug!("Listing runs for {}", product);
        let model = product.model();

        let runs = match product.source() {
            Source::Spc => spc::list_runs(&self.fetcher, &self.urls.spc).await?,
            Source::Psu => {
                psu::list_runs(
                    &self.fetcher,
                    &self.psu_cache,
                    &self.urls.psu,
                    model,
                    Cycles::OnHour,
                )
                .await?
            }
            Source::PsuOff => {
                psu::list_runs(
                    &self.fetcher,
                    &self.psu_cache,
                    &self.urls.psu,
                    model,
                    Cycles::OffHour,
                )
                .await?
            }
            Source::OuPecan => pecan::list_runs()?,
            Source::NcarEns => ncar::list_runs(&self.fetcher, &self.urls.ncar_ens).await?,
            Source::Nssl => return Err(not_implemented(product)),
        };

        debug!("Found {} runs for {}", runs.len(), product);
        Ok(runs)
    }

    /// Stations published for `product` at `run`
    ///
    /// # Errors
    ///
    /// - `DiscoveryError::Transport` if the run listing cannot be fetched
    /// - `DiscoveryError::NotImplemented` for NSSL products
    pub async fn list_stations(
        &self,
        product: Product,
        run: &RunTime,
    ) -> DiscoveryResult<Vec<StationId>> {
        debug!("Listing stations for {} at {}", product, run);
        let model = product.model();

        let stations = match product.source() {
            Source::Spc => spc::list_stations(&self.fetcher, &self.urls.spc, run).await?,
            Source::Psu | Source::PsuOff => {
                psu::list_stations(&self.fetcher, &self.urls.psu, model, run).await?
            }
            Source::OuPecan => pecan::list_stations(&self.fetcher, &self.urls.pecan, run).await?,
            Source::NcarEns => {
                ncar::list_stations(&self.fetcher, &self.urls.ncar_ens, run).await?
            }
            Source::Nssl => return Err(not_implemented(product)),
        };

        debug!("Found {} stations for {} at {}", stations.len(), product, run);
        Ok(stations)
    }

    /// Newest run published for `product`
    ///
    /// # Errors
    ///
    /// As [`Catalog::list_runs`], plus `DiscoveryError::NotFound` when no run is listed
    pub async fn latest_run(&self, product: Product) -> DiscoveryResult<RunTime> {
        self.list_runs(product)
            .await?
            .pop()
            .ok_or_else(|| DiscoveryError::not_found("runs", product.to_string()))
    }

    /// Source URLs in use
    pub fn urls(&self) -> &SourceUrls {
        &self.urls
    }

    /// The shared PSU listing cache
    pub fn psu_cache(&self) -> &ListingCache {
        &self.psu_cache
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

fn not_implemented(product: Product) -> DiscoveryError {
    DiscoveryError::NotImplemented {
        source_name: product.source().to_string(),
    }
}
