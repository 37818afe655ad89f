//! Listing transport for the sounding data servers
//!
//! Every discovery lookup reads exactly one directory listing. The catalog
//! only depends on the [`ListingFetcher`] trait; [`ListingClient`] is the
//! production implementation and dispatches on the URL scheme:
//! - `http` / `https`: a single rate-limited GET
//! - `ftp`: an anonymous `LIST` of the URL path
//!
//! The module is organized into specialized components:
//! - `config`: client configuration and building
//! - `http`: HTTP GET with rate limiting
//! - `ftp`: anonymous FTP listings

use std::future::Future;

use url::Url;

use crate::errors::{FetchError, FetchResult};

// Module declarations
pub mod config;
pub mod ftp;
pub mod http;

pub use config::ClientConfig;

use ftp::FtpHandler;
use http::HttpHandler;

/// Reads the text of one directory listing
pub trait ListingFetcher: Send + Sync {
    /// Fetch the listing at `url` as text
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult<String>> + Send;
}

/// Client that reads listings over HTTP(S) and FTP
#[derive(Debug)]
pub struct ListingClient {
    http_handler: HttpHandler,
    ftp_handler: FtpHandler,
}

impl ListingClient {
    /// Creates a client with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built
    pub fn new() -> FetchResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built or the rate
    /// limit is zero
    pub fn with_config(config: ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;
        let ftp_handler = FtpHandler::new(config.request_timeout);

        tracing::debug!(
            "Created listing client ({} req/s, timeout {:?})",
            config.rate_limit_rps,
            config.request_timeout
        );

        Ok(Self {
            http_handler,
            ftp_handler,
        })
    }
}

impl ListingFetcher for ListingClient {
    async fn fetch(&self, url: &Url) -> FetchResult<String> {
        match url.scheme() {
            "http" | "https" => self.http_handler.get_page(url).await,
            "ftp" => {
                self.http_handler.throttle().await;
                self.ftp_handler.list(url).await
            }
            other => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }
}
