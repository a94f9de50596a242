//! Cached page fetcher with bounded network and file concurrency.

use std::sync::Arc;
use std::time::Duration;

use limitless_api::{Client, Error as ApiError};
use scraper::Html;
use tokio::sync::Semaphore;

use crate::cache::DiskCache;

/// Page client wrapper that adds the disk cache and the connection cap.
///
/// Cache hits bypass the network entirely. A miss performs one request while
/// holding a network permit, then writes the body back to the cache. Any
/// failure along the way is logged and reported as `None`; nothing in here
/// returns an error to the caller.
pub struct CachedFetcher {
    client: Client,
    cache: DiskCache,
    network: Semaphore,
}

impl CachedFetcher {
    pub fn new(client: Client, cache: DiskCache, max_connections: usize) -> Self {
        Self {
            client,
            cache,
            network: Semaphore::new(max_connections.max(1)),
        }
    }

    /// Builds a fetcher for one site, sharing the given file-handle semaphore.
    pub fn for_site(
        base_url: &str,
        timeout: Duration,
        cache_dir: impl Into<std::path::PathBuf>,
        files: Arc<Semaphore>,
        max_connections: usize,
    ) -> Result<Self, ApiError> {
        let client = Client::with_timeout(base_url, timeout)?;
        Ok(Self::new(
            client,
            DiskCache::new(cache_dir, files),
            max_connections,
        ))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    /// Fetches and parses a page, consulting the cache when `use_cache` is set.
    pub async fn fetch_page(&self, url: &str, use_cache: bool) -> Option<Html> {
        let body = self.fetch_body(url, use_cache).await?;
        Some(Html::parse_document(&body))
    }

    /// Fetches the raw body of a page, consulting the cache when `use_cache`
    /// is set. Live responses are always written back to the cache.
    pub async fn fetch_body(&self, url: &str, use_cache: bool) -> Option<String> {
        if use_cache {
            if let Some(body) = self.cache.read(url).await {
                tracing::debug!("url {} is in cache", url);
                return Some(body);
            }
        }

        tracing::debug!("url {} is not in cache, requesting from source", url);
        let body = match self.request(url).await {
            Ok(body) => body,
            Err(ApiError::HttpStatus { status, body }) => {
                tracing::error!("HTTP request failed for {} with status {}: {}", url, status, body);
                return None;
            }
            Err(ApiError::Timeout) => {
                tracing::error!("HTTP request timed out for {}", url);
                return None;
            }
            Err(e) => {
                tracing::error!("HTTP request failed for {}: {}", url, e);
                return None;
            }
        };

        if body.trim().is_empty() {
            tracing::error!("No HTML content available for {}", url);
            return None;
        }

        self.cache.write(url, &body).await;
        Some(body)
    }

    async fn request(&self, url: &str) -> Result<String, ApiError> {
        let _permit = self
            .network
            .acquire()
            .await
            .map_err(|_| ApiError::RequestFailed)?;
        self.client.get_text(url).await
    }
}
