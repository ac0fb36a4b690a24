//! Concurrent cover downloads
//!
//! Covers are fetched before rendering with at most `max_concurrent`
//! requests in flight. A failed download only leaves that item's cover empty.

use crate::config::FetchConfig;
use crate::{Error, GalleryItem, Result};
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// HTTP client shared by all cover requests of one page.
#[derive(Clone)]
pub struct CoverFetcher {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    timeout_ms: u64,
    base_url: Option<String>,
}

impl CoverFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        if config.max_concurrent == 0 {
            return Err(Error::Config("fetch.max_concurrent must be at least 1".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            timeout_ms: config.timeout_ms,
            base_url: config.base_url.clone(),
        })
    }

    /// Number of requests that may start right now.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Download one cover. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::Other(format!("Fetch permit unavailable: {}", e)))?;

        let resp = self.client.get(url).send().await.map_err(|e| self.map_err(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{} returned {}", url, status)));
        }
        let body = resp.bytes().await.map_err(|e| self.map_err(e))?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }

    /// Fetch covers for every item that has no bytes yet. Items without a
    /// cover URL use the album cover under `base_url` when one is configured.
    /// Returns how many covers were filled in.
    pub async fn fill_covers(&self, items: &mut [GalleryItem]) -> usize {
        let pending: Vec<(usize, String)> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.cover().is_none())
            .filter_map(|(i, item)| self.cover_url_for(item).map(|u| (i, u)))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let results = join_all(pending.iter().map(|(_, url)| self.fetch(url))).await;

        let mut filled = 0;
        for ((index, url), result) in pending.into_iter().zip(results) {
            match result {
                Ok(bytes) => {
                    items[index].set_cover(Some(bytes));
                    filled += 1;
                }
                Err(e) => warn!(
                    "Cover for {} not fetched from {}: {}",
                    items[index].identifier(),
                    url,
                    e
                ),
            }
        }
        filled
    }

    /// URL a cover would be fetched from, if any.
    pub fn cover_url_for(&self, item: &GalleryItem) -> Option<String> {
        if let Some(url) = item.cover_url() {
            return Some(url.to_string());
        }
        let base = self.base_url.as_deref()?;
        match album_cover_url(base, item.identifier()) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("No cover URL for {}: {}", item.identifier(), e);
                None
            }
        }
    }

    fn map_err(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout_ms)
        } else {
            Error::Network(e.to_string())
        }
    }
}

/// Cover URL of an album on the manga site rooted at `base`.
///
/// A leading `JM` on the identifier is dropped.
///
/// # Examples
///
/// ```
/// let url = mangagrid::fetch::album_cover_url("https://example.org", "JM350234").unwrap();
/// assert_eq!(url, "https://example.org/media/albums/350234_3x4.jpg");
/// ```
pub fn album_cover_url(base: &str, identifier: &str) -> Result<String> {
    let id = identifier.trim();
    let id = id
        .strip_prefix("JM")
        .or_else(|| id.strip_prefix("jm"))
        .unwrap_or(id);
    if id.is_empty() {
        return Err(Error::Config(format!("no album id in {:?}", identifier)));
    }

    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let root = Url::parse(&base).map_err(|e| Error::Config(format!("{}: {}", base, e)))?;
    let url = root
        .join(&format!("media/albums/{}_3x4.jpg", id))
        .map_err(|e| Error::Config(e.to_string()))?;
    Ok(url.to_string())
}
