use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use url::Url;

use super::model::RawFeed;
use super::parser::parse_feed;

/// Per-request timeout applied to every live fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const USER_AGENT: &str = concat!("feedmixer/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while retrieving a single feed.
///
/// These cover the lifecycle of one source: URL validation, network
/// issues, HTTP errors, oversized bodies, parsing failures, and cache
/// problems. A failing source stays out of the mix for that round; it
/// never aborts the others.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured feed URL is not a valid absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body could not be parsed as RSS, Atom, or JSON Feed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Cache store failed while no live result was available either
    #[error("Cache error: {0}")]
    Cache(String),
}

/// A place feeds come from.
///
/// The HTTP client implements this directly; the cache wraps another
/// source and implements it too, so the orchestrator never cares which
/// one it holds.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieves and parses the feed at `url`.
    async fn retrieve(&self, url: &str) -> Result<RawFeed, SourceError>;
}

/// Live HTTP retrieval with a per-request timeout and body size cap.
///
/// Requests are made exactly once; a failed source simply reports its
/// error for this round rather than retrying.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn retrieve(&self, url: &str) -> Result<RawFeed, SourceError> {
        // Reject bad URLs before touching the network
        Url::parse(url).map_err(|e| SourceError::InvalidUrl(format!("{url}: {e}")))?;

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| SourceError::Timeout)?
            .map_err(SourceError::Network)?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
        parse_feed(&bytes).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SourceError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SourceError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SourceError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SourceError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
