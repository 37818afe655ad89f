//! Prelude module for Sounding Catalog Library
//!
//! Re-exports the items needed for typical usage with a single
//! `use sounding_catalog::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sounding_catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let catalog = Catalog::new(ListingClient::new()?);
//!     let product = Product::parse("psu", "gfs")?;
//!
//!     let run = catalog.latest_run(product).await?;
//!     let stations = catalog.list_stations(product, &run).await?;
//!     println!("{} {}: {} stations", product, run, stations.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, DiscoveryError, FetchError, Result};

pub use crate::app::{
    Catalog, ClientConfig, Cycles, ListingCache, ListingClient, ListingFetcher, Model, Product,
    RunTime, Source, SourceUrls, StationId,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_RATE_LIMIT_RPS, PSU_LISTING_TTL, USER_AGENT};

pub use tokio;
