//! Application constants for Sounding Catalog
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable holding a `tracing` filter directive
    pub const LOG_FILTER: &str = "SOUNDING_CATALOG_LOG";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Sounding-Catalog/0.1.0 (Sounding Discovery Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
}

/// FTP transport constants
pub mod ftp {
    /// Default control port
    pub const DEFAULT_PORT: u16 = 21;

    /// Anonymous login user
    pub const ANONYMOUS_USER: &str = "anonymous";

    /// Anonymous login password
    pub const ANONYMOUS_PASSWORD: &str = "anonymous@";
}

/// Rate limiting configuration
pub mod limits {
    /// Default rate limit for listing requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// Data source base URLs
pub mod sources {
    /// SPC observed soundings index
    pub const SPC_BASE_URL: &str = "http://www.spc.noaa.gov/exper/soundings/";

    /// PSU BUFKIT anonymous FTP mirror
    pub const PSU_BASE_URL: &str = "ftp://ftp.meteo.psu.edu/pub/bufkit/";

    /// OU PECAN real-time data directory
    pub const PECAN_BASE_URL: &str = "http://weather.ou.edu/~map/real_time_data/";

    /// NCAR ensemble soundings mirror
    pub const NCAR_ENS_BASE_URL: &str = "http://sharp.weather.ou.edu/soundings/ncarens/";

    /// The only PECAN run served, as `YYMMDDHH`
    pub const PECAN_FIXED_RUN: &str = "13062500";
}

/// Listing cache constants
pub mod cache {
    use super::Duration;

    /// How long the PSU top-level listing stays valid
    pub const PSU_LISTING_TTL: Duration = Duration::from_secs(5 * 60);
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "sounding-catalog.toml";

    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "sounding-catalog";

    /// File name under the user config dir
    pub const USER_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use cache::PSU_LISTING_TTL;
pub use http::USER_AGENT;
pub use limits::DEFAULT_RATE_LIMIT_RPS;
