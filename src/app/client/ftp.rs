//! Anonymous FTP directory listings
//!
//! The PSU BUFKIT mirror is served over FTP. A listing is one anonymous
//! session: connect, log in, `LIST` the URL path, quit. `suppaftp` is
//! synchronous, so the session runs on tokio's blocking pool.

use std::io;
use std::net::ToSocketAddrs;
use std::time::Duration;

use suppaftp::{FtpError, FtpStream};
use url::Url;

use crate::constants::ftp;
use crate::errors::{FetchError, FetchResult};

/// FTP listing handler
#[derive(Debug, Clone)]
pub struct FtpHandler {
    timeout: Duration,
}

impl FtpHandler {
    /// Creates a handler whose connect and read operations time out after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Lists the directory named by `url`, one entry per line
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the URL has no host and
    /// `FetchError::Ftp` if any step of the session fails
    pub async fn list(&self, url: &Url) -> FetchResult<String> {
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
                error: "missing host".to_string(),
            })?
            .to_string();
        let port = url.port().unwrap_or(ftp::DEFAULT_PORT);
        let path = url.path().to_string();
        let timeout = self.timeout;

        let lines = tokio::task::spawn_blocking(move || list_blocking(&host, port, &path, timeout))
            .await?
            .map_err(|e| FetchError::Ftp {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Listed {} ({} entries)", url, lines.len());
        Ok(lines.join("\n"))
    }
}

fn list_blocking(
    host: &str,
    port: u16,
    path: &str,
    timeout: Duration,
) -> Result<Vec<String>, FtpError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(FtpError::ConnectionError)?
        .next()
        .ok_or_else(|| {
            FtpError::ConnectionError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address for {}", host),
            ))
        })?;

    let mut stream = FtpStream::connect_timeout(addr, timeout)?;
    stream
        .get_ref()
        .set_read_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;
    stream.login(ftp::ANONYMOUS_USER, ftp::ANONYMOUS_PASSWORD)?;

    let lines = stream.list(Some(path))?;

    // The listing is already in hand; a failed QUIT changes nothing.
    let _ = stream.quit();
    Ok(lines)
}
