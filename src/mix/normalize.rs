use chrono::{DateTime, TimeZone, Utc};

use super::entry::{CanonicalEntry, Enclosure};
use crate::feed::{RawItem, RawTimestamp};

/// Converts one raw item into its canonical form.
///
/// Missing text fields become empty strings. Declared timestamps are
/// resolved against the UTC calendar; leap seconds clamp to 59 and
/// anything still unrepresentable becomes `None` rather than dropping the
/// entry.
pub fn normalize(item: RawItem) -> CanonicalEntry {
    let (author_name, author_email, author_link) = match item.author {
        Some(author) => (author.name, author.email, author.link),
        None => (None, None, None),
    };

    CanonicalEntry {
        title: item.title.unwrap_or_default(),
        link: item.link.unwrap_or_default(),
        description: item.description.unwrap_or_default(),
        author_name,
        author_email,
        author_link,
        pubdate: item.published.as_ref().and_then(resolve_timestamp),
        updateddate: item.updated.as_ref().and_then(resolve_timestamp),
        comments: item.comments,
        unique_id: item.id,
        item_copyright: item.license,
        categories: item.tags,
        enclosures: item.enclosures.into_iter().map(Enclosure::from).collect(),
    }
}

/// Resolves declared calendar fields to a concrete UTC instant.
///
/// Seconds clamp to 59 because the calendar rejects the leap-second
/// value 60 that some feeds publish.
fn resolve_timestamp(ts: &RawTimestamp) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(
        ts.year,
        ts.month,
        ts.day,
        ts.hour,
        ts.minute,
        ts.second.min(59),
    )
    .single()
}
