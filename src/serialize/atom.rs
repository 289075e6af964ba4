use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{latest_entry_date, text_element, FeedHeader};
use crate::mix::CanonicalEntry;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Renders the entry list as an Atom 1.0 document.
pub fn write(header: &FeedHeader<'_>, entries: &[CanonicalEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    // <feed xmlns="http://www.w3.org/2005/Atom">
    let mut feed = BytesStart::new("feed");
    feed.push_attribute(("xmlns", ATOM_NS));
    writer
        .write_event(Event::Start(feed))
        .context("Failed to write feed element")?;

    text_element(&mut writer, "title", header.title)?;
    if !header.link.is_empty() {
        let mut link = BytesStart::new("link");
        link.push_attribute(("href", header.link));
        link.push_attribute(("rel", "alternate"));
        writer
            .write_event(Event::Empty(link))
            .context("Failed to write feed link")?;
    }

    // Atom requires a feed-level updated element even for an empty mix
    let feed_updated = latest_entry_date(entries).unwrap_or_else(Utc::now);
    text_element(&mut writer, "updated", &rfc3339(&feed_updated))?;

    let feed_id = if header.link.is_empty() {
        header.title
    } else {
        header.link
    };
    text_element(&mut writer, "id", feed_id)?;

    if !header.description.is_empty() {
        text_element(&mut writer, "subtitle", header.description)?;
    }

    for entry in entries {
        write_entry(&mut writer, entry, &feed_updated)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("feed")))
        .context("Failed to write feed end")?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).context("Generated Atom feed contains invalid UTF-8")
}

fn write_entry(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    entry: &CanonicalEntry,
    feed_updated: &DateTime<Utc>,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("entry")))
        .context("Failed to write entry element")?;

    text_element(writer, "title", &entry.title)?;

    if !entry.link.is_empty() {
        let mut link = BytesStart::new("link");
        link.push_attribute(("href", entry.link.as_str()));
        link.push_attribute(("rel", "alternate"));
        writer
            .write_event(Event::Empty(link))
            .context("Failed to write entry link")?;
    }

    if let Some(pubdate) = &entry.pubdate {
        text_element(writer, "published", &rfc3339(pubdate))?;
    }

    // Every entry needs an updated element; fall back through pubdate to
    // the feed-level time
    let updated = entry.updateddate.or(entry.pubdate).unwrap_or(*feed_updated);
    text_element(writer, "updated", &rfc3339(&updated))?;

    // Atom authors require a name, so name-less attributions are skipped
    if let Some(name) = &entry.author_name {
        writer
            .write_event(Event::Start(BytesStart::new("author")))
            .context("Failed to write author element")?;
        text_element(writer, "name", name)?;
        if let Some(email) = &entry.author_email {
            text_element(writer, "email", email)?;
        }
        if let Some(uri) = &entry.author_link {
            text_element(writer, "uri", uri)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("author")))
            .context("Failed to write author end")?;
    }

    let id = entry.unique_id.as_deref().unwrap_or(entry.link.as_str());
    text_element(writer, "id", id)?;

    if !entry.description.is_empty() {
        let mut summary = BytesStart::new("summary");
        summary.push_attribute(("type", "html"));
        writer
            .write_event(Event::Start(summary))
            .context("Failed to write summary element")?;
        writer
            .write_event(Event::Text(quick_xml::events::BytesText::new(
                &entry.description,
            )))
            .context("Failed to write summary text")?;
        writer
            .write_event(Event::End(BytesEnd::new("summary")))
            .context("Failed to write summary end")?;
    }

    for term in &entry.categories {
        let mut category = BytesStart::new("category");
        category.push_attribute(("term", term.as_str()));
        writer
            .write_event(Event::Empty(category))
            .context("Failed to write category element")?;
    }

    for enclosure in &entry.enclosures {
        let mut link = BytesStart::new("link");
        link.push_attribute(("rel", "enclosure"));
        link.push_attribute(("href", enclosure.href.as_str()));
        if !enclosure.length.is_empty() {
            link.push_attribute(("length", enclosure.length.as_str()));
        }
        if !enclosure.mime_type.is_empty() {
            link.push_attribute(("type", enclosure.mime_type.as_str()));
        }
        writer
            .write_event(Event::Empty(link))
            .context("Failed to write enclosure link")?;
    }

    if let Some(rights) = &entry.item_copyright {
        text_element(writer, "rights", rights)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("entry")))
        .context("Failed to write entry end")?;

    Ok(())
}

fn rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::mix::Enclosure;

    fn header() -> FeedHeader<'static> {
        FeedHeader {
            title: "Mixed Feed",
            link: "https://mix.example.com/",
            description: "Several feeds in one",
        }
    }

    fn entry_at(title: &str, ymd_hms: (i32, u32, u32, u32, u32, u32)) -> CanonicalEntry {
        let (y, mo, d, h, mi, s) = ymd_hms;
        CanonicalEntry {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            description: format!("About {title}"),
            pubdate: Some(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn renders_feed_level_metadata() {
        let entries = vec![entry_at("one", (2024, 6, 15, 8, 30, 0))];
        let xml = write(&header(), &entries).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<title>Mixed Feed</title>"));
        assert!(xml.contains(r#"<link href="https://mix.example.com/" rel="alternate"/>"#));
        assert!(xml.contains("<subtitle>Several feeds in one</subtitle>"));
        assert!(xml.contains("<id>https://mix.example.com/</id>"));
        // Feed-level updated takes the newest entry date
        assert!(xml.contains("<updated>2024-06-15T08:30:00Z</updated>"));
    }

    #[test]
    fn renders_entry_dates_in_rfc3339() {
        let mut entry = entry_at("one", (2024, 6, 15, 8, 30, 0));
        entry.updateddate = Some(Utc.with_ymd_and_hms(2024, 6, 16, 9, 0, 0).unwrap());
        let xml = write(&header(), &[entry]).unwrap();

        assert!(xml.contains("<published>2024-06-15T08:30:00Z</published>"));
        assert!(xml.contains("<updated>2024-06-16T09:00:00Z</updated>"));
    }

    #[test]
    fn entry_id_falls_back_to_link() {
        let entry = entry_at("one", (2024, 6, 15, 8, 30, 0));
        let xml = write(&header(), &[entry]).unwrap();
        assert!(xml.contains("<id>https://example.com/one</id>"));

        let mut with_id = entry_at("two", (2024, 6, 15, 8, 30, 0));
        with_id.unique_id = Some("urn:two".to_string());
        let xml = write(&header(), &[with_id]).unwrap();
        assert!(xml.contains("<id>urn:two</id>"));
    }

    #[test]
    fn author_requires_a_name() {
        let mut named = entry_at("named", (2024, 6, 15, 8, 0, 0));
        named.author_name = Some("A. Writer".to_string());
        named.author_email = Some("writer@example.com".to_string());
        let xml = write(&header(), &[named]).unwrap();
        assert!(xml.contains("<name>A. Writer</name>"));
        assert!(xml.contains("<email>writer@example.com</email>"));

        let mut email_only = entry_at("anon", (2024, 6, 15, 8, 0, 0));
        email_only.author_email = Some("anon@example.com".to_string());
        let xml = write(&header(), &[email_only]).unwrap();
        assert!(!xml.contains("<author>"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let mut entry = entry_at("amp", (2024, 6, 15, 8, 0, 0));
        entry.title = "Tom & Jerry <live>".to_string();
        let xml = write(&header(), &[entry]).unwrap();

        assert!(xml.contains("Tom &amp; Jerry &lt;live&gt;"));
        assert!(!xml.contains("Tom & Jerry <live>"));
    }

    #[test]
    fn enclosures_become_rel_enclosure_links() {
        let mut entry = entry_at("cast", (2024, 6, 15, 8, 0, 0));
        entry.enclosures = vec![Enclosure {
            href: "https://example.com/ep.mp3".to_string(),
            length: "2048".to_string(),
            mime_type: "audio/mpeg".to_string(),
        }];
        let xml = write(&header(), &[entry]).unwrap();

        assert!(xml.contains(
            r#"<link rel="enclosure" href="https://example.com/ep.mp3" length="2048" type="audio/mpeg"/>"#
        ));
    }

    #[test]
    fn empty_mix_is_still_a_valid_feed() {
        let xml = write(&header(), &[]).unwrap();
        assert!(xml.contains("<feed"));
        assert!(xml.contains("<updated>"));
        assert!(!xml.contains("<entry>"));
    }
}
