use std::sync::Arc;

use futures::stream::{self, StreamExt};

use super::model::RawFeed;
use super::source::{FeedSource, SourceError};

/// Outcome of a single source retrieval.
///
/// Carries the URL for correlation and either the parsed feed or the
/// error that kept it out of the mix.
pub struct FetchOutcome {
    /// The feed URL this outcome belongs to
    pub url: String,
    /// The parsed feed, or the error that occurred
    pub result: Result<RawFeed, SourceError>,
}

/// Retrieves every URL concurrently through the given source.
///
/// Runs at most `max_concurrency` retrievals at a time. Each source
/// succeeds or fails on its own; one bad feed never cancels the rest.
/// Outcomes come back in completion order, not input order.
pub async fn fetch_all(
    source: Arc<dyn FeedSource>,
    urls: &[String],
    max_concurrency: usize,
) -> Vec<FetchOutcome> {
    if urls.is_empty() {
        return Vec::new();
    }

    // buffer_unordered(0) would never poll anything
    let concurrency = max_concurrency.max(1);

    stream::iter(urls.iter().cloned())
        .map(|url| {
            let source = Arc::clone(&source);

            async move {
                let result = source.retrieve(&url).await;
                if let Err(e) = &result {
                    tracing::warn!(feed = %url, error = %e, "Feed retrieval failed");
                }
                FetchOutcome { url, result }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await
}
