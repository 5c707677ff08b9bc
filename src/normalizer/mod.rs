use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{FreshetError, Result};
use crate::domain::{FeedMeta, PostCandidate};

/// Turns a raw document into channel metadata and an ordered list of items.
pub trait FeedParser {
    fn parse(&self, content: &str) -> Result<(FeedMeta, Vec<PostCandidate>)>;
}

/// [`FeedParser`] backed by feed-rs: RSS 0.9x/1.0/2.0, Atom and JSON Feed.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }
}

impl FeedParser for Normalizer {
    fn parse(&self, content: &str) -> Result<(FeedMeta, Vec<PostCandidate>)> {
        // Keep missing item ids empty instead of feed-rs's link/title hash.
        let feed = parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(content.as_bytes())
            .map_err(|e| FreshetError::MalformedDocument(e.to_string()))?;

        let meta = FeedMeta {
            title: feed.title.and_then(|t| decoded(&t.content)),
            description: feed.description.and_then(|d| decoded(&d.content)),
        };

        let items = feed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();

                let description = entry
                    .summary
                    .and_then(|s| decoded(&s.content))
                    .or_else(|| entry.content.and_then(|c| c.body).and_then(|b| decoded(&b)));

                PostCandidate {
                    title: entry.title.and_then(|t| decoded(&t.content)),
                    description,
                    link,
                    guid: Some(entry.id).filter(|id| !id.is_empty()),
                    published_at: entry
                        .published
                        .or(entry.updated)
                        .map(|dt| dt.with_timezone(&Utc)),
                }
            })
            .collect();

        Ok((meta, items))
    }
}

fn decoded(raw: &str) -> Option<String> {
    let text = decode_html_entities(raw.trim()).to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Lorem &amp; Ipsum</title>
    <link>https://example.com</link>
    <description>Updated every minute</description>
    <item>
      <title>Test Item 1</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      <description>This is item 1</description>
    </item>
    <item>
      <title>Test Item 2</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
      <description>This is item 2</description>
    </item>
    <item>
      <link>https://example.com/item3</link>
      <description>Untitled item</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <subtitle>An Atom test feed</subtitle>
  <id>urn:example:feed</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>This is Atom entry 1</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let (meta, items) = Normalizer::new().parse(RSS_SAMPLE).unwrap();

        assert_eq!(meta.title, Some("Lorem & Ipsum".into()));
        assert_eq!(meta.description, Some("Updated every minute".into()));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, Some("Test Item 1".into()));
        assert_eq!(items[0].link, "https://example.com/item1");
        assert_eq!(items[0].description, Some("This is item 1".into()));
        assert_eq!(items[0].guid, Some("item-1".into()));
        assert!(items[0].published_at.is_some());
        assert_eq!(items[1].title, Some("Test Item 2".into()));
    }

    #[test]
    fn test_item_without_title() {
        let (_, items) = Normalizer::new().parse(RSS_SAMPLE).unwrap();
        assert_eq!(items[2].title, None);
        assert_eq!(items[2].description, Some("Untitled item".into()));
    }

    #[test]
    fn test_item_without_guid_has_no_guid() {
        let (_, items) = Normalizer::new().parse(RSS_SAMPLE).unwrap();
        assert_eq!(items[1].guid, Some("item-2".into()));
        assert_eq!(items[2].guid, None);
    }

    #[test]
    fn test_parse_atom() {
        let (meta, items) = Normalizer::new().parse(ATOM_SAMPLE).unwrap();

        assert_eq!(meta.title, Some("Atom Test Feed".into()));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, Some("Atom Entry 1".into()));
        assert_eq!(items[0].link, "https://example.com/atom1");
        assert_eq!(items[0].guid, Some("atom-entry-1".into()));
    }

    #[test]
    fn test_items_keep_document_order() {
        let (_, items) = Normalizer::new().parse(RSS_SAMPLE).unwrap();
        let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/item1",
                "https://example.com/item2",
                "https://example.com/item3"
            ]
        );
    }

    #[test]
    fn test_html_is_malformed_document() {
        let err = Normalizer::new()
            .parse("<html><body>Not a feed</body></html>")
            .unwrap_err();
        assert!(matches!(err, FreshetError::MalformedDocument(_)));
    }

    #[test]
    fn test_garbage_is_malformed_document() {
        assert!(matches!(
            Normalizer::new().parse("definitely not xml"),
            Err(FreshetError::MalformedDocument(_))
        ));
    }
}
