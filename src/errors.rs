//! Error types for Sounding Catalog
//!
//! This module defines the error types for every layer of the crate. Errors
//! are never retried internally; recovery is left to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Listing transport errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// FTP session or listing failed
    #[error("FTP listing of {url} failed: {message}")]
    Ftp { url: String, message: String },

    /// The URL scheme is neither HTTP(S) nor FTP
    #[error("Unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// Invalid URL provided or built
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Rate limiter could not be built
    #[error("Invalid rate limit: {reason}")]
    RateLimiter { reason: String },

    /// Blocking transfer task did not complete
    #[error("Blocking transfer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run and station discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The listing could not be fetched
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// The fetched listing did not contain the expected marker
    #[error("No {what} found in listing at {url}")]
    NotFound { what: String, url: String },

    /// The source/model pairing is not one that is published
    #[error("Unknown source/model combination: {source_name} / {model}")]
    UnknownSource { source_name: String, model: String },

    /// The source exists but has no discovery routine
    #[error("Discovery is not implemented for source '{source_name}'")]
    NotImplemented { source_name: String },

    /// A matched token did not form a valid calendar time
    #[error("Invalid run timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// A listing pattern built for a model failed to compile
    #[error("Invalid listing pattern")]
    Pattern(#[from] regex::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error reading configuration
    #[error("Failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Discovery error
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Discovery(DiscoveryError::Transport(err))
    }
}

impl DiscoveryError {
    /// Build a `NotFound` error for the given listing
    pub fn not_found(what: impl Into<String>, url: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            url: url.into(),
        }
    }

    /// Build an `UnknownSource` error from the raw keys
    pub fn unknown(source: impl Into<String>, model: impl Into<String>) -> Self {
        Self::UnknownSource {
            source_name: source.into(),
            model: model.into(),
        }
    }
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Discovery(DiscoveryError::Transport(_)) => "transport",
            AppError::Discovery(DiscoveryError::NotFound { .. }) => "not-found",
            AppError::Discovery(DiscoveryError::UnknownSource { .. }) => "unknown-source",
            AppError::Discovery(DiscoveryError::NotImplemented { .. }) => "not-implemented",
            AppError::Discovery(DiscoveryError::InvalidTimestamp { .. })
            | AppError::Discovery(DiscoveryError::Pattern(_)) => "parse",
            AppError::Config(_) => "config",
            AppError::Json(_) => "output",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Discovery result type alias
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
