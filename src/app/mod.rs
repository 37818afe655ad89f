//! Core application logic for Sounding Catalog
//!
//! This module contains the listing client, the source/model data model, the
//! PSU listing cache and the catalog that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sounding_catalog::app::{Catalog, ListingClient, Product};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(ListingClient::new()?);
//!
//! for product in Product::all() {
//!     match catalog.latest_run(product).await {
//!         Ok(run) => println!("{}: {}", product, run),
//!         Err(e) => eprintln!("{}: {}", product, e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod models;

// Re-export main public API
pub use cache::ListingCache;
pub use catalog::{Catalog, Cycles, SourceUrls};
pub use client::{ClientConfig, ListingClient, ListingFetcher};
pub use models::{Model, Product, RunTime, Source, StationId};
