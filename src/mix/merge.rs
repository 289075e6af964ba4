use super::entry::CanonicalEntry;
use super::normalize::normalize;
use crate::feed::{RawFeed, RawItem};

/// Takes the leading `num_keep` items from each feed and merges them into
/// one reverse-chronological list.
///
/// `num_keep` of `None` keeps everything. Items without their own author
/// inherit the feed-level author before merging. The sort is stable and
/// descending on the declared publication time; undated items sink to the
/// end, and ties keep their input order, so feeds listed earlier win.
pub fn merge(feeds: Vec<RawFeed>, num_keep: Option<usize>) -> Vec<RawItem> {
    let mut items: Vec<RawItem> = Vec::new();

    for feed in feeds {
        let RawFeed {
            author,
            items: feed_items,
            ..
        } = feed;
        let keep = num_keep.unwrap_or(feed_items.len());

        for mut item in feed_items.into_iter().take(keep) {
            if item.author.is_none() {
                item.author = author.clone();
            }
            items.push(item);
        }
    }

    items.sort_by(|a, b| b.published.cmp(&a.published));
    items
}

/// Full pipeline from parsed feeds to canonical entries.
pub fn mix_entries(feeds: Vec<RawFeed>, num_keep: Option<usize>) -> Vec<CanonicalEntry> {
    merge(feeds, num_keep).into_iter().map(normalize).collect()
}
