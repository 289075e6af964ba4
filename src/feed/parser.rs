use anyhow::Result;
use feed_rs::model::{Entry, MediaContent, Person};
use feed_rs::parser;

use super::model::{RawAuthor, RawEnclosure, RawFeed, RawItem, RawTimestamp};

/// Parses an RSS/Atom/JSON feed document into the mixer's raw model.
pub fn parse_feed(bytes: &[u8]) -> Result<RawFeed> {
    let feed = parser::parse(bytes)?;

    let title = feed.title.map(|t| t.content);
    let author = feed
        .authors
        .into_iter()
        .next()
        .map(convert_person)
        .filter(|a| !a.is_empty());
    let items = feed.entries.into_iter().map(convert_entry).collect();

    Ok(RawFeed {
        title,
        author,
        items,
    })
}

fn convert_entry(entry: Entry) -> RawItem {
    let link = entry.links.first().map(|l| l.href.clone());
    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));
    let title = entry.title.map(|t| t.content);
    let author = entry
        .authors
        .into_iter()
        .next()
        .map(convert_person)
        .filter(|a| !a.is_empty());
    let id = if entry.id.is_empty() {
        None
    } else {
        Some(entry.id)
    };
    let published = entry.published.map(|dt| RawTimestamp::from_datetime(&dt));
    let updated = entry.updated.map(|dt| RawTimestamp::from_datetime(&dt));
    let license = entry.rights.map(|r| r.content);
    let tags = entry
        .categories
        .into_iter()
        .map(|c| c.term)
        .filter(|t| !t.is_empty())
        .collect();
    let enclosures = entry
        .media
        .into_iter()
        .flat_map(|m| m.content)
        .filter_map(convert_media)
        .collect();

    RawItem {
        title,
        link,
        description,
        author,
        published,
        updated,
        // feed-rs does not surface the RSS <comments> element
        comments: None,
        id,
        license,
        tags,
        enclosures,
    }
}

fn convert_person(person: Person) -> RawAuthor {
    RawAuthor {
        name: non_empty(person.name),
        email: person.email.and_then(non_empty),
        link: person.uri.and_then(non_empty),
    }
}

fn convert_media(content: MediaContent) -> Option<RawEnclosure> {
    let href = content.url?.to_string();
    Some(RawEnclosure {
        href,
        length: content.size.map(|s| s.to_string()).unwrap_or_default(),
        mime_type: content
            .content_type
            .map(|m| m.to_string())
            .unwrap_or_default(),
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Example Feed</title>
    <link>https://example.com/</link>
    <description>Example</description>
    <item>
      <title>First Post</title>
      <link>https://example.com/first</link>
      <description>Hello world</description>
      <guid>post-1</guid>
      <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
      <category>news</category>
      <enclosure url="https://example.com/audio.mp3" length="123456" type="audio/mpeg"/>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Example</title>
  <id>urn:example</id>
  <updated>2024-02-01T12:00:00Z</updated>
  <author><name>Site Author</name><email>site@example.com</email></author>
  <entry>
    <title>Entry One</title>
    <id>urn:entry-1</id>
    <updated>2024-02-01T12:00:00Z</updated>
    <link href="https://example.com/one"/>
    <summary>Summary text</summary>
    <rights>CC BY-4.0</rights>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_item_fields() {
        let feed = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(feed.title.as_deref(), Some("Example Feed"));
        assert_eq!(feed.items.len(), 1);

        let item = &feed.items[0];
        assert_eq!(item.title.as_deref(), Some("First Post"));
        assert_eq!(item.link.as_deref(), Some("https://example.com/first"));
        assert_eq!(item.description.as_deref(), Some("Hello world"));
        assert_eq!(item.id.as_deref(), Some("post-1"));
        assert_eq!(item.published, Some(RawTimestamp::new(2024, 1, 1, 10, 0, 0)));
        assert_eq!(item.tags, vec!["news".to_string()]);

        assert_eq!(item.enclosures.len(), 1);
        let enclosure = &item.enclosures[0];
        assert_eq!(enclosure.href, "https://example.com/audio.mp3");
        assert_eq!(enclosure.length, "123456");
        assert_eq!(enclosure.mime_type, "audio/mpeg");
    }

    #[test]
    fn parses_atom_feed_author_and_entry_dates() {
        let feed = parse_feed(ATOM_SAMPLE.as_bytes()).unwrap();

        let author = feed.author.expect("feed-level author");
        assert_eq!(author.name.as_deref(), Some("Site Author"));
        assert_eq!(author.email.as_deref(), Some("site@example.com"));

        let item = &feed.items[0];
        assert_eq!(item.updated, Some(RawTimestamp::new(2024, 2, 1, 12, 0, 0)));
        assert_eq!(item.published, None);
        assert_eq!(item.license.as_deref(), Some("CC BY-4.0"));
        assert_eq!(item.description.as_deref(), Some("Summary text"));
        assert_eq!(item.id.as_deref(), Some("urn:entry-1"));
    }

    #[test]
    fn rejects_non_feed_bytes() {
        assert!(parse_feed(b"definitely not xml").is_err());
    }

    #[test]
    fn blank_author_fields_become_none() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blank Author</title>
  <id>urn:blank</id>
  <updated>2024-02-01T12:00:00Z</updated>
  <entry>
    <title>Entry</title>
    <id>urn:e1</id>
    <updated>2024-02-01T12:00:00Z</updated>
    <author><name>   </name></author>
  </entry>
</feed>"#;

        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(feed.items[0].author, None);
    }
}
