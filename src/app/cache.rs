//! Single-slot listing cache
//!
//! The PSU mirror publishes one top-level directory listing that covers every
//! model, so run lookups for any PSU model share one cached copy. The copy
//! expires after a fixed time-to-live; there is no other eviction.
//!
//! The slot is guarded by an async mutex that is held across the fetch, so
//! concurrent lookups inside one TTL window trigger a single download.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sounding_catalog::app::ListingCache;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = ListingCache::new(Duration::from_secs(300));
//! let text = cache
//!     .get_or_fetch(|| async { Ok::<_, std::io::Error>("gfs.201201010000.done".to_string()) })
//!     .await?;
//! assert!(text.contains(".done"));
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::constants::cache::PSU_LISTING_TTL;

#[derive(Debug)]
struct CachedListing {
    text: String,
    fetched_at: Instant,
}

/// Time-limited cache holding one listing
#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    slot: Mutex<Option<CachedListing>>,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(PSU_LISTING_TTL)
    }
}

impl ListingCache {
    /// Create an empty cache whose entry lives for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached listing, or run `fetch` and store its result
    ///
    /// A failed fetch leaves the previous entry in place and returns the error.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() <= self.ttl {
                debug!(
                    "Reusing cached listing ({} bytes, {:?} old)",
                    cached.text.len(),
                    cached.fetched_at.elapsed()
                );
                return Ok(cached.text.clone());
            }
        }

        let text = fetch().await?;
        info!("Refreshed cached listing ({} bytes)", text.len());
        *slot = Some(CachedListing {
            text: text.clone(),
            fetched_at: Instant::now(),
        });
        Ok(text)
    }

    /// Whether a fetch right now would be served from the cache
    pub async fn is_fresh(&self) -> bool {
        self.slot
            .lock()
            .await
            .as_ref()
            .is_some_and(|cached| cached.fetched_at.elapsed() <= self.ttl)
    }

    /// Drop the cached entry
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}
