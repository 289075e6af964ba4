use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feed::RawEnclosure;

/// A merged feed entry in its canonical, format-independent shape.
///
/// Field names follow the classic feed-generator vocabulary so the
/// serializers map onto Atom/RSS elements without renaming. Missing text
/// fields collapse to empty strings; missing dates stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub author_link: Option<String>,
    pub pubdate: Option<DateTime<Utc>>,
    pub updateddate: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub unique_id: Option<String>,
    pub item_copyright: Option<String>,
    pub categories: Vec<String>,
    pub enclosures: Vec<Enclosure>,
}

/// Media attachment carried through to the output formats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enclosure {
    pub href: String,
    pub length: String,
    pub mime_type: String,
}

impl From<RawEnclosure> for Enclosure {
    fn from(raw: RawEnclosure) -> Self {
        Self {
            href: raw.href,
            length: raw.length,
            mime_type: raw.mime_type,
        }
    }
}
