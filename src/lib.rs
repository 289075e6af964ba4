//! feedmixer fetches a list of syndication feeds and mixes their newest
//! entries into a single Atom, RSS, or JSON feed.
//!
//! The pipeline behind [`FeedMixer`]:
//!
//! - [`feed`] - retrieval: parsing, the [`feed::FeedSource`] seam, the
//!   HTTP client, and bounded-concurrency fan-out
//! - [`cache`] - a disk-backed read-through cache that short-circuits
//!   refetches and serves stale records when a live fetch fails
//! - [`mix`] - per-feed keep limits and the deterministic
//!   reverse-chronological merge into canonical entries
//! - [`serialize`] - Atom 1.0, RSS 2.0, and JSON renderings of the mix
//!
//! Each source fails independently; one unreachable or malformed feed
//! never poisons the rest of the mix.

pub mod cache;
pub mod config;
pub mod feed;
pub mod mix;
pub mod mixer;
pub mod serialize;

pub use config::MixerConfig;
pub use mixer::FeedMixer;
