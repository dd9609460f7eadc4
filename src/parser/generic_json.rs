use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::record::Record;
use crate::util::is_plausible_url;

const URL_KEYS: &[&str] = &["href", "url", "uri"];
const TITLE_KEYS: &[&str] = &["title", "description", "name"];
const TIME_KEYS: &[&str] = &["time", "created", "created_at", "date"];

/// Parses a JSON array of bookmark objects, the shape produced by Pinboard
/// and most "export as JSON" buttons: each object carries a URL under one
/// of a few conventional keys plus optional title/time/tags fields.
pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text)?;
    let items = value.as_array().context("not a JSON array")?;

    let mut records = Vec::new();
    for item in items {
        let Some(object) = item.as_object() else {
            continue;
        };

        let url = URL_KEYS
            .iter()
            .find_map(|k| object.get(*k).and_then(Value::as_str));
        let Some(url) = url else { continue };
        if !is_plausible_url(url) {
            continue;
        }

        let title = TITLE_KEYS
            .iter()
            .find_map(|k| object.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        let timestamp = TIME_KEYS
            .iter()
            .find_map(|k| object.get(*k))
            .and_then(parse_time);

        let mut record = Record::new(url);
        record.title = title;
        record.timestamp = timestamp;
        record.tags = object.get("tags").map(parse_tags).unwrap_or_default();
        records.push(record);
    }

    Ok(records)
}

/// Accepts RFC 3339 strings, epoch-second strings, or epoch-second numbers.
fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| crate::util::parse_epoch_seconds(s)),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    }
}

/// Tags arrive either as one delimited string ("a b" / "a,b") or as an
/// array of strings.
fn parse_tags(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split([' ', ','])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
