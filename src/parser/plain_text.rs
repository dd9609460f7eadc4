use anyhow::Result;
use std::collections::HashSet;

use crate::record::Record;
use crate::util::{find_urls, is_plausible_url};

/// Terminal fallback: brute-force URL-regex scan of raw text, line by line.
/// Matches anything, so it must stay last in the registry.
pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for line in text.lines() {
        for url in find_urls(line) {
            if is_plausible_url(url) && seen.insert(url.to_string()) {
                records.push(Record::new(url));
            }
        }
    }

    Ok(records)
}
