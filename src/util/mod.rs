//! Shared helpers for URL scanning, filename derivation, and text cleanup.
//!
//! - **URL scanning**: the regex-based scanner behind the plain-text
//!   fallback strategy, plus the plausibility check every strategy applies
//!   before emitting a record
//! - **Text processing**: HTML entity decoding for captured documents

mod text;
mod urls;

pub use text::htmldecode;
pub use urls::{basename, find_urls, is_plausible_url};

use chrono::{DateTime, TimeZone, Utc};

/// Parses a Unix-epoch-seconds string (the timestamp shape used by Pocket
/// and Netscape exports) into a UTC datetime. Returns `None` for anything
/// unparseable or out of range.
pub fn parse_epoch_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epoch_seconds() {
        let ts = parse_epoch_seconds("1700000000").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(parse_epoch_seconds(" 1700000000 ").unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_epoch_seconds_rejects_garbage() {
        assert!(parse_epoch_seconds("").is_none());
        assert!(parse_epoch_seconds("not-a-number").is_none());
        assert!(parse_epoch_seconds("1700000000.5").is_none());
    }
}
