use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::store::CacheStore;
use crate::feed::{FeedSource, RawFeed, SourceError};

/// Read-through cache over another [`FeedSource`].
///
/// Lookup order per URL: a fresh cache record wins outright; otherwise the
/// inner source is consulted and its result stored. When the live fetch
/// fails but a stale record exists, the stale record is served so one bad
/// round does not blank out a previously good feed.
#[derive(Clone)]
pub struct FeedCache {
    store: CacheStore,
    source: Arc<dyn FeedSource>,
    ttl: Option<Duration>,
}

impl FeedCache {
    /// Wraps `source` with the given store.
    ///
    /// A `ttl` of `None` means records never go stale; every URL is
    /// fetched live at most once per cache lifetime.
    pub fn new(store: CacheStore, source: Arc<dyn FeedSource>, ttl: Option<Duration>) -> Self {
        Self { store, source, ttl }
    }

    fn is_fresh(&self, fetched_at: i64, now: i64) -> bool {
        match self.ttl {
            None => true,
            Some(ttl) => now.saturating_sub(fetched_at) < ttl.as_secs() as i64,
        }
    }

    async fn fetch(&self, url: &str) -> Result<RawFeed, SourceError> {
        let now = Utc::now().timestamp();

        // A broken store degrades to live-only operation
        let (cached, read_error) = match self.store.get(url).await {
            Ok(record) => (record, None),
            Err(e) => {
                tracing::warn!(feed = %url, error = %e, "Cache read failed, trying live fetch");
                (None, Some(e.to_string()))
            }
        };

        if let Some(record) = &cached {
            if self.is_fresh(record.fetched_at, now) {
                tracing::debug!(feed = %url, "Cache hit");
                return Ok(record.feed.clone());
            }
        }

        match self.source.retrieve(url).await {
            Ok(feed) => {
                if let Err(e) = self.store.put(url, &feed, now).await {
                    tracing::warn!(feed = %url, error = %e, "Cache write failed");
                }
                Ok(feed)
            }
            Err(err) => {
                if let Some(record) = cached {
                    tracing::warn!(
                        feed = %url,
                        error = %err,
                        "Live fetch failed, serving stale record"
                    );
                    Ok(record.feed)
                } else if let Some(cache_err) = read_error {
                    Err(SourceError::Cache(format!(
                        "{cache_err} (live fetch also failed: {err})"
                    )))
                } else {
                    Err(err)
                }
            }
        }
    }
}

#[async_trait]
impl FeedSource for FeedCache {
    async fn retrieve(&self, url: &str) -> Result<RawFeed, SourceError> {
        self.fetch(url).await
    }
}
