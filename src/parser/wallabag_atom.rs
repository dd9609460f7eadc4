use anyhow::{bail, Result};

use crate::parser::generic_rss::records_from_feed;
use crate::record::Record;

/// Parses a Wallabag ATOM export. Wallabag feeds are ordinary ATOM, so the
/// only specialization is the sniff: the document must name wallabag as its
/// generator (or carry its namespace) before the general feed parser runs.
/// Without the sniff this entry would shadow Generic RSS for every feed.
pub(crate) fn extract(text: &str, _root_url: Option<&str>) -> Result<Vec<Record>> {
    if !text.contains("wallabag") {
        bail!("no wallabag marker in document");
    }
    let feed = feed_rs::parser::parse(text.as_bytes())?;
    Ok(records_from_feed(feed))
}
