//! Page Fetching
//!
//! The content-retrieval side of the page tracker.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

// == Page Fetcher ==
/// Produces the content behind a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// Fetches pages over HTTP with reqwest.
///
/// The body is returned whatever the response status.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::new();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
