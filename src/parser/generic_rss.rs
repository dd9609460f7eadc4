use anyhow::Result;
use feed_rs::model::Feed;
use std::collections::BTreeMap;

use crate::record::Record;
use crate::util::is_plausible_url;

/// Parses any RSS/Atom document via feed-rs and flattens its entries.
pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    let feed = feed_rs::parser::parse(text.as_bytes())?;
    Ok(records_from_feed(feed))
}

/// Maps feed entries to records: first plausible link wins, title and
/// published-or-updated timestamp carried over, categories become tags.
/// Shared with the specialized feed strategies.
pub(crate) fn records_from_feed(feed: Feed) -> Vec<Record> {
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry
                .links
                .into_iter()
                .map(|link| link.href)
                .find(|href| is_plausible_url(href))?;

            let title = entry
                .title
                .map(|t| t.content)
                .filter(|t| !t.trim().is_empty());
            let timestamp = entry.published.or(entry.updated);
            let tags = entry
                .categories
                .into_iter()
                .map(|c| c.label.unwrap_or(c.term))
                .filter(|t| !t.is_empty())
                .collect();

            Some(Record {
                url,
                title,
                timestamp,
                tags,
                meta: BTreeMap::new(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Example Blog</title>
    <item>
      <guid>1</guid>
      <title>First Post</title>
      <link>https://example.com/post/1</link>
      <pubDate>Tue, 14 Nov 2023 22:13:20 GMT</pubDate>
      <category>rust</category>
    </item>
    <item>
      <guid>2</guid>
      <title>Second Post</title>
      <link>https://example.com/post/2</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Feed</title>
  <entry>
    <id>1</id>
    <title>Entry</title>
    <link href="https://example.com/entry/1"/>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_rss_entries() {
        let records = extract(RSS, None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://example.com/post/1");
        assert_eq!(records[0].title.as_deref(), Some("First Post"));
        assert_eq!(records[0].tags, vec!["rust"]);
        assert!(records[0].timestamp.is_some());
        assert!(records[1].timestamp.is_none());
    }

    #[test]
    fn test_atom_entries() {
        let records = extract(ATOM, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/entry/1");
        assert_eq!(records[0].timestamp.unwrap().timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_non_feed_input_fails() {
        assert!(extract("<html><body>nope</body></html>", None).is_err());
        assert!(extract("plain text", None).is_err());
    }

    #[test]
    fn test_entries_without_links_dropped() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><guid>1</guid><title>No link</title></item>
</channel></rss>"#;
        assert!(extract(rss, None).unwrap().is_empty());
    }
}
