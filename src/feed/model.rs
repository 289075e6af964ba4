use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Raw Feed Model
// ============================================================================

/// A parsed feed reduced to the fields the mixer cares about.
///
/// This is the unit stored in the feed cache, so every field round-trips
/// through serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeed {
    /// Feed-level title, if the document declared one
    pub title: Option<String>,
    /// Feed-level author, used as a fallback for items without their own
    pub author: Option<RawAuthor>,
    /// Items in document order
    pub items: Vec<RawItem>,
}

/// A single feed item as parsed, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub author: Option<RawAuthor>,
    pub published: Option<RawTimestamp>,
    pub updated: Option<RawTimestamp>,
    pub comments: Option<String>,
    pub id: Option<String>,
    pub license: Option<String>,
    pub tags: Vec<String>,
    pub enclosures: Vec<RawEnclosure>,
}

/// Author attribution as it appears in the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub link: Option<String>,
}

impl RawAuthor {
    /// True when no attribution field carries a value.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.link.is_none()
    }
}

/// An attached media resource.
///
/// `length` and `mime_type` stay as strings because feeds routinely omit or
/// mangle them; empty means the source did not say.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEnclosure {
    pub href: String,
    pub length: String,
    pub mime_type: String,
}

// ============================================================================
// Timestamps
// ============================================================================

/// A broken-down UTC timestamp preserved exactly as the source declared it.
///
/// Feeds occasionally publish leap-second times (second == 60) that no
/// calendar type accepts, so items keep this field-wise form until
/// normalization clamps it. Field order makes the derived `Ord`
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl RawTimestamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Breaks a parsed datetime into calendar fields.
    ///
    /// chrono carries leap seconds in the nanosecond field; fold them back
    /// into second 60 so the clamp happens in one place downstream.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let leap = u32::from(dt.nanosecond() >= 1_000_000_000);
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second() + leap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamp_ordering_is_chronological() {
        let older = RawTimestamp::new(2023, 12, 31, 23, 59, 59);
        let newer = RawTimestamp::new(2024, 1, 1, 0, 0, 0);
        assert!(older < newer);

        let same_day_earlier = RawTimestamp::new(2024, 6, 1, 8, 30, 0);
        let same_day_later = RawTimestamp::new(2024, 6, 1, 17, 0, 0);
        assert!(same_day_earlier < same_day_later);
    }

    #[test]
    fn leap_second_surfaces_as_second_sixty() {
        let naive = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_000_000_000)
            .unwrap();
        let dt = DateTime::from_naive_utc_and_offset(naive, Utc);

        let ts = RawTimestamp::from_datetime(&dt);
        assert_eq!(ts.second, 60);
        assert_eq!(ts.minute, 59);
    }

    #[test]
    fn ordinary_datetime_keeps_its_fields() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_nano_opt(12, 45, 30, 0)
            .unwrap();
        let dt = DateTime::from_naive_utc_and_offset(naive, Utc);

        assert_eq!(
            RawTimestamp::from_datetime(&dt),
            RawTimestamp::new(2024, 3, 15, 12, 45, 30)
        );
    }

    #[test]
    fn feed_round_trips_through_serde() {
        let feed = RawFeed {
            title: Some("Example".to_string()),
            author: Some(RawAuthor {
                name: Some("A. Author".to_string()),
                email: None,
                link: None,
            }),
            items: vec![RawItem {
                title: Some("Post".to_string()),
                link: Some("https://example.com/post".to_string()),
                published: Some(RawTimestamp::new(2024, 1, 1, 0, 0, 0)),
                tags: vec!["news".to_string()],
                ..Default::default()
            }],
        };

        let json = serde_json::to_string(&feed).unwrap();
        let back: RawFeed = serde_json::from_str(&json).unwrap();
        assert_eq!(feed, back);
    }
}
