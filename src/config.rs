//! Configuration management for Sounding Catalog
//!
//! Configuration is optional: every setting has a built-in default, and a
//! TOML file only needs the keys it wants to change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, SourceUrls};
use crate::constants::{cache, config as paths, http, limits, logging, sources};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listing client settings
    pub client: ClientConfigToml,
    /// Source base URLs
    pub sources: SourcesConfigToml,
    /// Listing cache settings
    pub cache: CacheConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// User agent for HTTP requests
    pub user_agent: String,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// TOML-friendly source URL configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfigToml {
    /// SPC soundings index
    pub spc_base_url: String,
    /// PSU BUFKIT mirror root (ftp:// or http://)
    pub psu_base_url: String,
    /// OU PECAN real-time data root
    pub pecan_base_url: String,
    /// NCAR ensemble directory
    pub ncar_ens_base_url: String,
}

impl Default for SourcesConfigToml {
    fn default() -> Self {
        Self {
            spc_base_url: sources::SPC_BASE_URL.to_string(),
            psu_base_url: sources::PSU_BASE_URL.to_string(),
            pecan_base_url: sources::PECAN_BASE_URL.to_string(),
            ncar_ens_base_url: sources::NCAR_ENS_BASE_URL.to_string(),
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfigToml {
    /// How long the PSU top-level listing is reused (e.g. "5m", "90s")
    #[serde(with = "humantime_serde")]
    pub psu_listing_ttl: Duration,
}

impl Default for CacheConfigToml {
    fn default() -> Self {
        Self {
            psu_listing_ttl: cache::PSU_LISTING_TTL,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the first file found in the
    /// standard locations is used, falling back to defaults.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }),
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(paths::LOCAL_FILE_NAME)];
        if let Ok(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        if let Some(path) = &found {
            debug!("Found config file: {}", path.display());
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(paths::APP_DIR_NAME)
            .join(paths::USER_FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be at least 1".to_string(),
            });
        }
        self.sources.to_runtime_config().map(|_| ())
    }

    /// Convert to the runtime pieces the catalog is built from
    pub fn to_runtime_config(&self) -> ConfigResult<(ClientConfig, SourceUrls, Duration)> {
        Ok((
            self.client.to_runtime_config(),
            self.sources.to_runtime_config()?,
            self.cache.psu_listing_ttl,
        ))
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
            user_agent: self.user_agent.clone(),
            ..Default::default()
        }
    }
}

impl SourcesConfigToml {
    /// Parse the configured URLs
    pub fn to_runtime_config(&self) -> ConfigResult<SourceUrls> {
        Ok(SourceUrls {
            spc: parse_base_url("sources.spc_base_url", &self.spc_base_url)?,
            psu: parse_base_url("sources.psu_base_url", &self.psu_base_url)?,
            pecan: parse_base_url("sources.pecan_base_url", &self.pecan_base_url)?,
            ncar_ens: parse_base_url("sources.ncar_ens_base_url", &self.ncar_ens_base_url)?,
        })
    }
}

/// Parse a directory URL, adding the trailing slash relative joins rely on
fn parse_base_url(field: &str, value: &str) -> ConfigResult<Url> {
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    };

    Url::parse(&normalized).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
