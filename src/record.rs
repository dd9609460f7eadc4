use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One extracted bookmark entry.
///
/// Created by a single extraction strategy during one dispatch pass and
/// never mutated afterwards; ownership moves to the caller with the
/// dispatch result. The `url` is always a syntactically plausible absolute
/// URL (scheme + host) — each strategy filters against
/// [`crate::util::is_plausible_url`] before emitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Absolute URL of the bookmark.
    pub url: String,
    /// Title or link text, when the source format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// When the bookmark was created/saved, when the source format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Tags in source order. Empty for formats without tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Source-specific extras (e.g. a Pocket item id or excerpt) that have
    /// no dedicated field. Opaque to the dispatcher.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl Record {
    /// A bare record carrying only a URL, as produced by the plain-text
    /// fallback strategy.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            timestamp: None,
            tags: Vec::new(),
            meta: BTreeMap::new(),
        }
    }
}
