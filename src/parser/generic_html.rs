use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::record::Record;
use crate::util::is_plausible_url;

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Harvests every `<a href>` from an HTML document. Relative links are
/// resolved against `root_url` when one is provided; without it only
/// absolute links survive.
pub(crate) fn extract(text: &str, root_url: Option<&str>) -> Result<Vec<Record>> {
    let document = Html::parse_document(text);
    let base = root_url.and_then(|r| Url::parse(r).ok());

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for anchor in document.select(&ANCHOR) {
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("javascript:")
        {
            continue;
        }

        let url = if is_plausible_url(href) {
            href.to_string()
        } else if let Some(base) = &base {
            match base.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };
        if !is_plausible_url(&url) || !seen.insert(url.clone()) {
            continue;
        }

        let title = anchor.text().collect::<String>();
        let title = title.trim();

        let mut record = Record::new(url);
        record.title = (!title.is_empty()).then(|| title.to_string());
        records.push(record);
    }

    Ok(records)
}
