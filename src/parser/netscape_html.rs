use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::record::Record;
use crate::util::{is_plausible_url, parse_epoch_seconds};

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// How far into the document the Netscape doctype marker must appear.
const SNIFF_WINDOW: usize = 512;

/// Parses the Netscape bookmark file format exported by every major browser
/// (and by Pocket's HTML export). The format is intentionally malformed
/// HTML — unclosed `<DT>`/`<p>` tags — which html5ever recovers from.
///
/// Entries look like:
/// `<DT><A HREF="https://…" ADD_DATE="1700000000" TAGS="a,b">Title</A>`
pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    let head = text.get(..SNIFF_WINDOW).unwrap_or(text);
    if !head.to_ascii_lowercase().contains("netscape-bookmark-file") {
        bail!("missing NETSCAPE-Bookmark-file doctype");
    }

    let document = Html::parse_document(text);
    let mut records = Vec::new();

    for anchor in document.select(&ANCHOR) {
        let element = anchor.value();
        let href = element.attr("href").unwrap_or_default().trim();
        if !is_plausible_url(href) {
            continue;
        }

        let title = anchor.text().collect::<String>();
        let title = title.trim();
        let timestamp = element.attr("add_date").and_then(parse_epoch_seconds);
        let tags = element
            .attr("tags")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut record = Record::new(href);
        record.title = (!title.is_empty()).then(|| title.to_string());
        record.timestamp = timestamp;
        record.tags = tags;
        records.push(record);
    }

    Ok(records)
}
