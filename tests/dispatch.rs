//! End-to-end dispatch behavior over the real strategy registry: format
//! attribution, fallback selection, idempotency, and totality.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::time::Duration;

use linkrake::{dispatch, parse_file, parse_urls, FAILED_TO_PARSE};

const BUDGET: Duration = Duration::from_secs(10);

const NETSCAPE_EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><A HREF="https://example.com/one" ADD_DATE="1700000000">One</A>
    <DT><A HREF="https://example.com/two" ADD_DATE="1700000010">Two</A>
    <DT><A HREF="https://example.com/three" ADD_DATE="1700000020">Three</A>
</DL><p>"#;

#[test]
fn netscape_export_selects_netscape_strategy() {
    // Three <a href> entries and no RSS/JSON markers: the Netscape parser
    // and the generic fallbacks tie at 3 records, so registry order must
    // give the win to the more specific Netscape strategy.
    let outcome = dispatch(NETSCAPE_EXPORT, None, BUDGET);
    assert_eq!(outcome.strategy, Some("Netscape HTML"));
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[0].url, "https://example.com/one");
    assert_eq!(outcome.records[0].title.as_deref(), Some("One"));
}

#[test]
fn unstructured_text_falls_through_to_plain_text() {
    let text = "random notes\nsee https://example.com/a for details,\n\
                also http://example.org/b (no markup anywhere)";
    let outcome = dispatch(text, None, BUDGET);
    assert_eq!(outcome.strategy, Some("Plain Text"));
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].url, "https://example.com/a");
    assert_eq!(outcome.records[1].url, "http://example.org/b");
}

#[test]
fn rss_feed_beats_fallback_on_yield() {
    // The fallback also sees the URLs inside the XML, but the RSS parser
    // understands the structure and is registered earlier.
    let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><guid>1</guid><title>A</title><link>https://example.com/a</link></item>
  <item><guid>2</guid><title>B</title><link>https://example.com/b</link></item>
</channel></rss>"#;
    let outcome = dispatch(rss, None, BUDGET);
    assert_eq!(outcome.strategy, Some("Generic RSS"));
    assert_eq!(outcome.records.len(), 2);
}

#[test]
fn html_page_with_relative_links_uses_root_url() {
    let html = r#"<html><body>
        <a href="/post/1">First</a>
        <a href="/post/2">Second</a>
    </body></html>"#;
    let outcome = dispatch(html, Some("https://blog.example"), BUDGET);
    assert_eq!(outcome.strategy, Some("Generic HTML"));
    assert_eq!(outcome.records[0].url, "https://blog.example/post/1");
}

#[test]
fn parse_file_roundtrip_is_idempotent() {
    let dir = std::env::temp_dir().join("linkrake_dispatch_idempotent");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bookmarks.html");
    std::fs::write(&path, NETSCAPE_EXPORT).unwrap();

    let (first_records, first_parser) = parse_file(&path, None, BUDGET).unwrap();
    let (second_records, second_parser) = parse_file(&path, None, BUDGET).unwrap();
    assert_eq!(first_parser, "Netscape HTML");
    assert_eq!(first_parser, second_parser);
    assert_eq!(first_records, second_records);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn parse_urls_reports_sentinel_on_no_match() {
    let urls = vec!["no scheme here".to_string(), "also nothing".to_string()];
    let (records, parser) = parse_urls(&urls, None, BUDGET);
    assert!(records.is_empty());
    assert_eq!(parser, FAILED_TO_PARSE);
}

#[test]
fn parse_urls_counts_each_candidate() {
    let urls = vec![
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
        "https://example.com/c".to_string(),
    ];
    let (records, parser) = parse_urls(&urls, None, BUDGET);
    assert_eq!(records.len(), 3);
    assert_eq!(parser, "Plain Text");
}

#[test]
fn fallback_url_matching_contract() {
    // The literal contract for the regex fallback.
    let cases: &[(&str, usize)] = &[
        ("https://example.com", 1),
        ("example.com", 0),
        ("ftp://example.com", 0),
        (
            // One URL embedded as a query-string value of another counts
            // as two distinct URLs.
            "https://a.example.com/one.html?url=http://example.com/inside",
            2,
        ),
    ];
    for (input, expected) in cases {
        let outcome = dispatch(input, None, BUDGET);
        assert_eq!(
            outcome.records.len(),
            *expected,
            "{:?} should yield {} records",
            input,
            expected
        );
        if *expected > 0 {
            assert_eq!(outcome.strategy, Some("Plain Text"));
        }
    }
}

proptest! {
    // Dispatch is total: any input terminates without panicking, and the
    // winner name is present exactly when records are.
    #[test]
    fn dispatch_is_total(input in ".{0,512}") {
        let outcome = dispatch(&input, None, BUDGET);
        prop_assert_eq!(outcome.records.is_empty(), outcome.strategy.is_none());
    }

    #[test]
    fn every_record_url_has_scheme_and_host(input in ".{0,512}") {
        let outcome = dispatch(&input, None, BUDGET);
        for record in &outcome.records {
            prop_assert!(url::Url::parse(&record.url).map(|u| u.has_host()).unwrap_or(false));
        }
    }
}
