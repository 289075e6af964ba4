use std::collections::{BTreeMap, HashMap};
use std::mem;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cache::{CacheStore, FeedCache};
use crate::config::{ConfigError, MixerConfig};
use crate::feed::{fetch_all, FeedSource, HttpFeedSource, RawFeed, SourceError};
use crate::mix::{mix_entries, CanonicalEntry};
use crate::serialize::{atom, json, rss, FeedHeader};

/// Fetches a set of feeds, merges their newest entries, and renders the
/// result as Atom, RSS, or JSON.
///
/// The mixed entry list is computed lazily on first use and memoized;
/// [`FeedMixer::set_feeds`] discards it. Failures collected during a
/// round stay per URL in [`FeedMixer::errors`] while the surviving feeds
/// still produce output.
pub struct FeedMixer {
    config: MixerConfig,
    feeds: Vec<String>,
    source: Arc<dyn FeedSource>,
    mixed: Option<Vec<CanonicalEntry>>,
    errors: BTreeMap<String, SourceError>,
}

impl FeedMixer {
    /// Creates a mixer over an explicit source.
    ///
    /// Fails when the configuration is unusable (blank title, zero
    /// concurrency). The feed list is capped at `config.max_feeds`.
    pub fn new(mut config: MixerConfig, source: Arc<dyn FeedSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        let feeds = truncate_feeds(mem::take(&mut config.feeds), config.max_feeds);
        Ok(Self {
            config,
            feeds,
            source,
            mixed: None,
            errors: BTreeMap::new(),
        })
    }

    /// Creates a mixer with the standard stack: an HTTP source wrapped by
    /// the disk-backed cache at `config.cache_path`.
    pub async fn open(config: MixerConfig) -> Result<Self> {
        let http =
            HttpFeedSource::with_timeout(config.request_timeout()).context("Failed to build HTTP client")?;
        let store = CacheStore::open(&config.cache_path)
            .await
            .with_context(|| format!("Failed to open feed cache at {}", config.cache_path))?;
        let cache = FeedCache::new(store, Arc::new(http), config.cache_ttl());
        Ok(Self::new(config, Arc::new(cache))?)
    }

    /// URLs currently in the mix, in priority order.
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// Replaces the feed list and discards the memoized mix.
    pub fn set_feeds(&mut self, feeds: Vec<String>) {
        self.feeds = truncate_feeds(feeds, self.config.max_feeds);
        self.mixed = None;
        self.errors.clear();
    }

    /// Failures from the most recent fetch round, keyed by URL.
    pub fn errors(&self) -> &BTreeMap<String, SourceError> {
        &self.errors
    }

    /// The merged entry list, fetched on first call and memoized until
    /// the feed list changes.
    pub async fn mixed_entries(&mut self) -> &[CanonicalEntry] {
        self.ensure_mixed().await;
        self.mixed.as_deref().unwrap_or_default()
    }

    /// Renders the mix as an Atom 1.0 document.
    pub async fn atom_feed(&mut self) -> Result<String> {
        self.ensure_mixed().await;
        atom::write(&self.header(), self.mixed.as_deref().unwrap_or_default())
    }

    /// Renders the mix as an RSS 2.0 document.
    pub async fn rss_feed(&mut self) -> Result<String> {
        self.ensure_mixed().await;
        rss::write(&self.header(), self.mixed.as_deref().unwrap_or_default())
    }

    /// Renders the mix as a JSON array of entries.
    pub async fn json_feed(&mut self) -> Result<String> {
        self.ensure_mixed().await;
        json::write(self.mixed.as_deref().unwrap_or_default())
    }

    fn header(&self) -> FeedHeader<'_> {
        FeedHeader {
            title: &self.config.title,
            link: &self.config.link,
            description: &self.config.description,
        }
    }

    async fn ensure_mixed(&mut self) {
        if self.mixed.is_none() {
            self.refresh().await;
        }
    }

    /// Runs one fetch round and rebuilds the memoized mix.
    async fn refresh(&mut self) {
        let outcomes = fetch_all(
            Arc::clone(&self.source),
            &self.feeds,
            self.config.max_concurrency,
        )
        .await;

        // Outcomes arrive in completion order; restore the configured
        // order so ties in the merge stay deterministic.
        let position: HashMap<String, usize> = self
            .feeds
            .iter()
            .enumerate()
            .map(|(idx, url)| (url.clone(), idx))
            .collect();

        self.errors.clear();
        let mut succeeded: Vec<(usize, RawFeed)> = Vec::new();
        for outcome in outcomes {
            let pos = position.get(&outcome.url).copied().unwrap_or(usize::MAX);
            match outcome.result {
                Ok(feed) => succeeded.push((pos, feed)),
                Err(err) => {
                    self.errors.insert(outcome.url, err);
                }
            }
        }
        succeeded.sort_by_key(|(pos, _)| *pos);

        let feeds: Vec<RawFeed> = succeeded.into_iter().map(|(_, feed)| feed).collect();
        let entries = mix_entries(feeds, self.config.keep_limit());

        tracing::debug!(
            entries = entries.len(),
            failed = self.errors.len(),
            "Mixed feed entries"
        );
        self.mixed = Some(entries);
    }
}

fn truncate_feeds(mut feeds: Vec<String>, max_feeds: usize) -> Vec<String> {
    if feeds.len() > max_feeds {
        tracing::warn!(
            kept = max_feeds,
            dropped = feeds.len() - max_feeds,
            "Feed list exceeds max_feeds, truncating"
        );
        feeds.truncate(max_feeds);
    }
    feeds
}
