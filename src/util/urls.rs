use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Matches one absolute http(s) URL starting at a scheme. The character
/// classes mirror what browsers accept in practice: an alphanumeric/symbol
/// run after the scheme, then anything up to a bracket, quote, angle
/// bracket, or whitespace. `ftp://` is deliberately excluded — the generic
/// scanner only harvests web URLs.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://(?:[a-zA-Z0-9]|[-_$@.&+!*(),]|[^\x00-\x7F])+[^\[\]<>"'\s]+"#)
        .expect("URL regex is valid")
});

/// Locates candidate scheme positions for the overlapping scan below.
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://").expect("scheme regex is valid"));

/// Finds every absolute http(s) URL in `text`, including URLs embedded
/// inside other URLs (e.g. as a query-string value).
///
/// A single left-to-right regex pass would swallow an embedded URL into its
/// container's match. Instead, every scheme occurrence is treated as a
/// candidate start and the URL pattern is re-anchored there, so
/// `https://a.com/?u=http://b.com` yields two matches.
pub fn find_urls(text: &str) -> Vec<&str> {
    SCHEME_RE
        .find_iter(text)
        .filter_map(|scheme| {
            URL_RE
                .find_at(text, scheme.start())
                .filter(|m| m.start() == scheme.start())
        })
        .map(|m| m.as_str())
        .collect()
}

/// Checks the minimum shape every extracted record URL must have:
/// a parseable absolute URL with a scheme and a host.
pub fn is_plausible_url(candidate: &str) -> bool {
    Url::parse(candidate).map(|u| u.has_host()).unwrap_or(false)
}

/// Derives a filename-safe base name from a path or URL: the last path
/// segment with query/fragment stripped and unsafe characters replaced.
/// Falls back to `"source"` when nothing usable remains.
pub fn basename(location: &str) -> String {
    let without_query = location.split(['?', '#']).next().unwrap_or(location);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);

    let cleaned: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "source".to_string()
    } else {
        cleaned
    }
}
