//! Sounding Catalog Library
//!
//! Discovers which weather sounding runs and stations are currently published
//! by SPC, the Penn State BUFKIT mirror, OU PECAN and the NCAR ensemble
//! mirror, by scraping their directory listings.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
