//! Format-detection-by-trial: every registered extraction strategy runs
//! against the same buffered input and the one yielding the most records
//! wins.
//!
//! Content sniffing is unreliable — a browser bookmark export is valid
//! input to both the Netscape parser and a generic HTML parser — so instead
//! of trusting the first strategy that matches, the dispatcher tries them
//! all and uses yield count as a proxy for "this strategy actually
//! understood the structure". The registry is ordered most-specific first
//! and ties keep the earlier entry, biasing toward quality when counts are
//! equal.
//!
//! Strategy failures are ordinary control flow here: an `Err` from an
//! extractor means "this format does not apply" and is consumed inside the
//! dispatch loop, never propagated. Dispatch itself always terminates and
//! never fails.

mod generic_html;
mod generic_json;
mod generic_rss;
mod netscape_html;
mod plain_text;
mod pocket_api;
mod wallabag_atom;

use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::record::Record;

/// One extraction attempt: the full input text plus an optional base URL
/// for resolving relative links. Strategies are pure functions of the text —
/// no I/O, no state across calls. Incompatible or malformed input is
/// signaled with `Err`; an empty `Ok` is treated the same way by the
/// dispatcher.
pub type Extractor = fn(&str, Option<&str>) -> Result<Vec<Record>>;

/// A named entry in the strategy registry.
pub struct Strategy {
    pub name: &'static str,
    pub extract: Extractor,
}

/// The fixed strategy registry, most-specific first.
///
/// Order is significant: narrowly-sniffing export parsers run before the
/// general format parsers, which run before the universal plain-text
/// scanner. A generic parser can spuriously match a specialized export and
/// extract fewer or garbled records, so specificity comes first and the
/// tie-break (strict `>` in the dispatch loop) keeps the earlier entry.
pub static STRATEGIES: &[Strategy] = &[
    // Specialized exports
    Strategy {
        name: "Pocket API",
        extract: pocket_api::extract,
    },
    Strategy {
        name: "Wallabag ATOM",
        extract: wallabag_atom::extract,
    },
    // General formats
    Strategy {
        name: "Netscape HTML",
        extract: netscape_html::extract,
    },
    Strategy {
        name: "Generic RSS",
        extract: generic_rss::extract,
    },
    Strategy {
        name: "Generic JSON",
        extract: generic_json::extract,
    },
    Strategy {
        name: "Generic HTML",
        extract: generic_html::extract,
    },
    // Fallback
    Strategy {
        name: "Plain Text",
        extract: plain_text::extract,
    },
];

/// Sentinel strategy name reported when no strategy produced any records.
pub const FAILED_TO_PARSE: &str = "Failed to parse";

/// Outcome of one dispatch pass.
///
/// Invariant: `strategy.is_some()` exactly when `records` is non-empty.
#[derive(Debug)]
pub struct Dispatch {
    /// Records from the winning strategy, in source order.
    pub records: Vec<Record>,
    /// Name of the winning registry entry, `None` when nothing matched.
    pub strategy: Option<&'static str>,
    /// Wall-clock time the pass took, for the caller's bookkeeping.
    pub elapsed: Duration,
}

/// Runs every registered strategy against `text` and returns the best
/// result.
///
/// `budget` is advisory: strategies are not individually cancellable, so a
/// slow one can overrun it. Overruns are logged after the fact, nothing
/// more. This function never fails — total mismatch is reported through an
/// empty result, and each strategy's error is consumed locally at trace
/// level.
pub fn dispatch(text: &str, root_url: Option<&str>, budget: Duration) -> Dispatch {
    dispatch_over(STRATEGIES, text, root_url, budget)
}

fn dispatch_over(
    registry: &[Strategy],
    text: &str,
    root_url: Option<&str>,
    budget: Duration,
) -> Dispatch {
    let started = Instant::now();
    let mut best: Vec<Record> = Vec::new();
    let mut winner: Option<&'static str> = None;

    for strategy in registry {
        match (strategy.extract)(text, root_url) {
            Ok(records) if records.is_empty() => {
                tracing::trace!(strategy = strategy.name, "Strategy produced no records");
            }
            Ok(records) => {
                tracing::debug!(
                    strategy = strategy.name,
                    records = records.len(),
                    "Strategy matched"
                );
                if records.len() > best.len() {
                    best = records;
                    winner = Some(strategy.name);
                }
            }
            Err(error) => {
                tracing::trace!(
                    strategy = strategy.name,
                    error = %error,
                    "Strategy did not apply"
                );
            }
        }
    }

    let elapsed = started.elapsed();
    if elapsed > budget {
        tracing::warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "Dispatch exceeded its time budget"
        );
    }

    Dispatch {
        records: best,
        strategy: winner,
        elapsed,
    }
}

/// Parses an in-memory list of candidate URLs without touching the
/// filesystem: the list is joined into one newline-delimited buffer and
/// dispatched like any other document.
///
/// Returns the records plus the winning strategy name, or
/// [`FAILED_TO_PARSE`] with no records when nothing matched.
pub fn parse_urls(
    urls: &[String],
    root_url: Option<&str>,
    budget: Duration,
) -> (Vec<Record>, String) {
    let buffer = urls.join("\n");
    finish(dispatch(&buffer, root_url, budget))
}

/// Parses a captured source file: an RSS feed, bookmarks export, or plain
/// text file of URLs. The file is read fully into memory so every strategy
/// sees identical content.
///
/// Only I/O problems surface as errors; "no strategy matched" is reported
/// through the [`FAILED_TO_PARSE`] sentinel, same as [`parse_urls`].
pub fn parse_file(
    path: &Path,
    root_url: Option<&str>,
    budget: Duration,
) -> std::io::Result<(Vec<Record>, String)> {
    let text = std::fs::read_to_string(path)?;
    Ok(finish(dispatch(&text, root_url, budget)))
}

fn finish(outcome: Dispatch) -> (Vec<Record>, String) {
    match outcome.strategy {
        Some(name) => (outcome.records, name.to_string()),
        None => (Vec::new(), FAILED_TO_PARSE.to_string()),
    }
}
