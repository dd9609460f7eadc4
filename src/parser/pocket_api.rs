use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::record::Record;
use crate::util::{is_plausible_url, parse_epoch_seconds};

/// Shape of a `GET /v3/get` Pocket API response dump: a `"list"` object
/// keyed by item id. The typed deserialization doubles as the format sniff —
/// any JSON without that shape fails here and falls through the registry.
#[derive(Deserialize)]
struct PocketExport {
    list: BTreeMap<String, PocketItem>,
}

#[derive(Deserialize)]
struct PocketItem {
    given_url: Option<String>,
    resolved_url: Option<String>,
    given_title: Option<String>,
    resolved_title: Option<String>,
    time_added: Option<String>,
    excerpt: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, serde_json::Value>,
}

pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    let export: PocketExport = serde_json::from_str(text)?;

    let mut records = Vec::new();
    for (item_id, item) in export.list {
        // Pocket keeps both the URL as saved and the post-redirect URL;
        // the resolved one is the canonical choice.
        let url = match item.resolved_url.or(item.given_url) {
            Some(url) if is_plausible_url(&url) => url,
            _ => continue,
        };

        let title = item
            .resolved_title
            .or(item.given_title)
            .filter(|t| !t.trim().is_empty());
        let timestamp = item.time_added.as_deref().and_then(parse_epoch_seconds);

        let mut meta = BTreeMap::new();
        meta.insert("pocket_item_id".to_string(), item_id);
        if let Some(excerpt) = item.excerpt.filter(|e| !e.trim().is_empty()) {
            meta.insert("excerpt".to_string(), excerpt);
        }

        records.push(Record {
            url,
            title,
            timestamp,
            tags: item.tags.into_keys().collect(),
            meta,
        });
    }

    Ok(records)
}
