//! Page Tracker
//!
//! Counts how often each URL is fetched. A counter lives for a fixed window
//! after its most recent access; the page content itself is never cached.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::backend::SharedBackend;
use crate::error::Result;
use crate::pages::PageFetcher;

/// Window an access counter survives after its last increment.
pub const DEFAULT_COUNT_TTL: Duration = Duration::from_secs(10);

/// Backend key of the access counter for `url`, `count: <url>`.
///
/// The space after the colon is part of the key, so counters written by
/// other clients of the same Redis database are shared.
pub fn count_key(url: &str) -> String {
    format!("count: {}", url)
}

// == Page Tracker ==
/// Fetches pages while keeping expiring per-URL access counters.
pub struct PageTracker {
    backend: SharedBackend,
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
}

impl PageTracker {
    // == Constructor ==
    /// Creates a tracker with the default 10 second window.
    pub fn new(backend: SharedBackend, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_ttl(backend, fetcher, DEFAULT_COUNT_TTL)
    }

    /// Creates a tracker whose counters expire `ttl` after the last access.
    pub fn with_ttl(backend: SharedBackend, fetcher: Arc<dyn PageFetcher>, ttl: Duration) -> Self {
        Self {
            backend,
            fetcher,
            ttl,
        }
    }

    // == Tracked Fetch ==
    /// Counts an access to `url`, refreshes its window, then fetches it.
    ///
    /// The access is counted even when the fetch fails.
    pub async fn tracked_fetch(&self, url: &str) -> Result<String> {
        let key = count_key(url);
        let count = self.backend.incr(&key).await?;
        self.backend.expire(&key, self.ttl).await?;
        debug!("{} accessed {} times in the current window", url, count);

        self.fetcher.fetch(url).await
    }

    // == Access Count ==
    /// Accesses to `url` in the current window, 0 once the counter expired.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        let count = self
            .backend
            .get(&count_key(url))
            .await?
            .and_then(|raw| String::from_utf8(raw).ok())
            .and_then(|text| text.parse().ok())
            .unwrap_or(0);
        Ok(count)
    }
}
