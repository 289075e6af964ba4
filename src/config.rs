//! Configuration file parser for feedmixer.toml.
//!
//! The config file is optional; a missing file yields `MixerConfig::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Feed title must not be empty")]
    EmptyTitle,

    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level mixer configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Title of the mixed output feed.
    pub title: String,

    /// Link advertised by the mixed output feed.
    pub link: String,

    /// Description (Atom subtitle) of the mixed output feed.
    pub description: String,

    /// Feed URLs to mix, in priority order. Ties in publication time are
    /// broken in favor of feeds listed earlier.
    pub feeds: Vec<String>,

    /// Number of leading entries to keep per feed. Negative keeps everything.
    pub num_keep: i64,

    /// Upper bound on simultaneous feed fetches.
    pub max_concurrency: usize,

    /// Hard cap on the number of feeds per mix; extra URLs are dropped.
    pub max_feeds: usize,

    /// Path of the SQLite cache database (":memory:" for no persistence).
    pub cache_path: String,

    /// Seconds before a cached feed goes stale. Absent means cached
    /// records never expire.
    pub cache_ttl_seconds: Option<u64>,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            link: String::new(),
            description: String::new(),
            feeds: Vec::new(),
            num_keep: 3,
            max_concurrency: 5,
            max_feeds: 100,
            cache_path: "fmcache.db".to_string(),
            cache_ttl_seconds: None,
            request_timeout_secs: 30,
        }
    }
}

impl MixerConfig {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(MixerConfig::default())`
    /// - Empty file → `Ok(MixerConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted or
        // maliciously large file into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "title",
                "link",
                "description",
                "feeds",
                "num_keep",
                "max_concurrency",
                "max_feeds",
                "cache_path",
                "cache_ttl_seconds",
                "request_timeout_secs",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: MixerConfig = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reject values the mixer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    /// Per-feed keep limit; `None` means keep every entry.
    pub fn keep_limit(&self) -> Option<usize> {
        if self.num_keep < 0 {
            None
        } else {
            Some(self.num_keep as usize)
        }
    }

    /// Cache freshness window, if one is configured.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_seconds.map(Duration::from_secs)
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
