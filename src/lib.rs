//! linkrake extracts a best-effort list of URL records from a bookmark
//! export of unknown format: an RSS/Atom feed, a Pocket or Wallabag export,
//! a Netscape bookmark file, a JSON dump, arbitrary HTML, or plain text.
//!
//! The caller never declares the format. Instead, [`parser::dispatch`] runs
//! a fixed registry of extraction strategies — most-specific first, ending
//! in a brute-force URL-regex scan — against the same buffered input and
//! returns the result of whichever strategy yielded the most records.
//!
//! Before parsing, [`capture`] materializes the raw input (from memory, a
//! local path, or a remote URL fetched under a timeout) as a durable,
//! atomically-written file, so every run leaves behind the exact document
//! it parsed.

pub mod capture;
pub mod config;
pub mod parser;
pub mod record;
pub mod util;

pub use parser::{dispatch, parse_file, parse_urls, Dispatch, Strategy, FAILED_TO_PARSE, STRATEGIES};
pub use record::Record;
