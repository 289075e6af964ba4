//! Feed retrieval module for RSS/Atom/JSON feed parsing and fetching.
//!
//! This module covers everything between a feed URL and a parsed
//! [`RawFeed`]:
//!
//! - **Parsing**: Convert feed documents into the raw item model
//! - **Sources**: The [`FeedSource`] seam plus the live HTTP implementation
//! - **Fan-out**: Concurrent retrieval of many URLs under a concurrency cap
//!
//! # Architecture
//!
//! The module is organized into four submodules:
//!
//! - [`model`] - Raw feed/item/timestamp types shared with the cache
//! - [`parser`] - Low-level feed parsing using the `feed-rs` crate
//! - [`source`] - The retrieval trait and HTTP client behind it
//! - [`fetcher`] - Bounded-concurrency fan-out over a list of URLs

mod fetcher;
mod model;
mod parser;
mod source;

pub use fetcher::{fetch_all, FetchOutcome};
pub use model::{RawAuthor, RawEnclosure, RawFeed, RawItem, RawTimestamp};
pub use parser::parse_feed;
pub use source::{FeedSource, HttpFeedSource, SourceError, DEFAULT_TIMEOUT};
