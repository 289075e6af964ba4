//! Output formats for the mixed feed.
//!
//! All three serializers consume the same canonical entry list:
//!
//! - [`atom`] - Atom 1.0 with RFC 3339 dates
//! - [`rss`] - RSS 2.0 with RFC 2822 dates
//! - [`json`] - the entry list serialized directly as JSON
//!
//! The XML writers share the same event-based pattern and emit
//! 2-space-indented documents.

pub mod atom;
pub mod json;
pub mod rss;

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::mix::CanonicalEntry;

/// Channel-level metadata shared by every output format.
#[derive(Debug, Clone, Copy)]
pub struct FeedHeader<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
}

/// Writes `<name>text</name>`, leaving escaping to the writer.
fn text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {name} element"))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .with_context(|| format!("Failed to write {name} text"))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {name} end"))?;
    Ok(())
}

/// Newest publication date across the entries, used as the feed-level
/// updated/last-build time.
fn latest_entry_date(entries: &[CanonicalEntry]) -> Option<DateTime<Utc>> {
    entries.iter().filter_map(|e| e.pubdate).max()
}
