use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{latest_entry_date, text_element, FeedHeader};
use crate::mix::CanonicalEntry;

/// Renders the entry list as an RSS 2.0 document.
pub fn write(header: &FeedHeader<'_>, entries: &[CanonicalEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    // <rss version="2.0"><channel>
    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer
        .write_event(Event::Start(rss))
        .context("Failed to write rss element")?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .context("Failed to write channel element")?;

    text_element(&mut writer, "title", header.title)?;
    text_element(&mut writer, "link", header.link)?;
    text_element(&mut writer, "description", header.description)?;

    let last_build = latest_entry_date(entries).unwrap_or_else(Utc::now);
    text_element(&mut writer, "lastBuildDate", &last_build.to_rfc2822())?;

    for entry in entries {
        write_item(&mut writer, entry)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .context("Failed to write channel end")?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .context("Failed to write rss end")?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).context("Generated RSS feed contains invalid UTF-8")
}

fn write_item(writer: &mut Writer<Cursor<Vec<u8>>>, entry: &CanonicalEntry) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .context("Failed to write item element")?;

    text_element(writer, "title", &entry.title)?;
    text_element(writer, "link", &entry.link)?;
    text_element(writer, "description", &entry.description)?;

    // RSS expresses authors as an email string; name-only attributions
    // have no valid slot and are left out
    match (&entry.author_email, &entry.author_name) {
        (Some(email), Some(name)) => {
            text_element(writer, "author", &format!("{email} ({name})"))?
        }
        (Some(email), None) => text_element(writer, "author", email)?,
        _ => {}
    }

    if let Some(pubdate) = &entry.pubdate {
        text_element(writer, "pubDate", &pubdate.to_rfc2822())?;
    }

    if let Some(comments) = &entry.comments {
        text_element(writer, "comments", comments)?;
    }

    if let Some(unique_id) = &entry.unique_id {
        text_element(writer, "guid", unique_id)?;
    }

    // RSS allows a single enclosure per item; extras are dropped
    if let Some(enclosure) = entry.enclosures.first() {
        let mut element = BytesStart::new("enclosure");
        element.push_attribute(("url", enclosure.href.as_str()));
        element.push_attribute(("length", enclosure.length.as_str()));
        element.push_attribute(("type", enclosure.mime_type.as_str()));
        writer
            .write_event(Event::Empty(element))
            .context("Failed to write enclosure element")?;
    }

    for term in &entry.categories {
        text_element(writer, "category", term)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .context("Failed to write item end")?;

    Ok(())
}
