//! Disk-backed feed caching.
//!
//! Two pieces cooperate here:
//!
//! - [`CacheStore`] - SQLite persistence for parsed feeds, keyed by URL
//! - [`FeedCache`] - a read-through [`crate::feed::FeedSource`] that
//!   consults the store before the wrapped source and falls back to stale
//!   records when a live fetch fails
//!
//! Freshness is driven by an optional TTL; without one, a cached feed is
//! never refetched.

mod read_through;
mod store;

pub use read_through::FeedCache;
pub use store::{CacheRecord, CacheStore};
