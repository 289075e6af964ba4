//! Merging and normalization of fetched feeds.
//!
//! The pipeline runs in two steps:
//!
//! - [`merge`] - per-feed keep limit, feed-author fallback, and the
//!   stable reverse-chronological sort across all feeds
//! - [`normalize`] - raw items become [`CanonicalEntry`] values with
//!   resolved UTC timestamps and empty-string defaults
//!
//! [`mix_entries`] chains both for callers that want the finished list.

mod entry;
mod merge;
mod normalize;

pub use entry::{CanonicalEntry, Enclosure};
pub use merge::{merge, mix_entries};
pub use normalize::normalize;
