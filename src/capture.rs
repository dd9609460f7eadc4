//! Source Capture: acquire the raw input document and persist it durably
//! before any parsing happens.
//!
//! Every ingestion run first materializes its input as a file under
//! `<out_dir>/sources/`, named from a template with `{ts}` and `{basename}`
//! tokens. Writes are atomic (write-to-temp, fsync, rename), so a
//! concurrent reader or a crash mid-write can never observe a partial
//! document. A failed *capture* — unlike a failed parse — is unrecoverable
//! for the run: without the raw document there is nothing to parse, which
//! is why the download error kinds here are treated as fatal by the CLI.

use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::util::{basename, htmldecode};

/// Subdirectory of the output dir that receives captured documents.
pub const SOURCES_DIR_NAME: &str = "sources";

/// Default filename template for text captured from stdin.
pub const DEFAULT_TEXT_FILENAME: &str = "{ts}-stdin.txt";

/// Default filename template for captures from a path or URL.
pub const DEFAULT_FILE_FILENAME: &str = "{ts}-{basename}.txt";

/// Location prefixes treated as remote resources rather than local paths.
const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "ftp://"];

/// Cap on a downloaded source document.
const MAX_SOURCE_SIZE: usize = 32 * 1024 * 1024; // 32MB

/// Errors from acquiring or persisting a source document.
///
/// The download-side variants (`Download`, `Timeout`, `TooLarge`) are
/// unrecoverable for the ingestion run — see [`CaptureError::is_fatal`].
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The remote fetch failed (unreachable host, HTTP error, bad TLS, …).
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },
    /// The remote fetch did not complete within the caller's timeout.
    #[error("Download of {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    /// The response body exceeded the source size cap.
    #[error("Response from {url} exceeded {limit} bytes")]
    TooLarge { url: String, limit: usize },
    /// Reading a local source or writing the capture file failed.
    #[error("Source file error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// Whether this error means the run cannot continue. Parsing is
    /// meaningless without the raw document, so a failed remote capture is
    /// not downgraded to a recoverable condition.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CaptureError::Download { .. }
                | CaptureError::Timeout { .. }
                | CaptureError::TooLarge { .. }
        )
    }
}

/// Persists text that is already in memory (e.g. from stdin) as a source
/// document and returns its path.
pub fn capture_text(
    raw_text: &str,
    filename: &str,
    out_dir: &Path,
) -> Result<PathBuf, CaptureError> {
    capture_text_with_ts(raw_text, filename, out_dir, chrono::Utc::now().timestamp())
}

// Separated so tests can pin the timestamp.
#[doc(hidden)]
pub fn capture_text_with_ts(
    raw_text: &str,
    filename: &str,
    out_dir: &Path,
    ts: i64,
) -> Result<PathBuf, CaptureError> {
    write_source(raw_text, &render_filename(filename, ts, None), out_dir)
}

/// Acquires a source document from a local path or a remote URL and
/// persists it.
///
/// Locations starting with an allow-listed scheme (`http://`, `https://`,
/// `ftp://`) are downloaded under `timeout` with the response body
/// HTML-entity-decoded, matching what bookmark services hand out; anything
/// else is read verbatim from the filesystem. Download failures are fatal
/// for the run (see [`CaptureError::is_fatal`]).
pub async fn capture_path_or_url(
    location: &str,
    timeout: Duration,
    filename: &str,
    out_dir: &Path,
    client: &reqwest::Client,
) -> Result<PathBuf, CaptureError> {
    let ts = chrono::Utc::now().timestamp();
    let name = render_filename(filename, ts, Some(&basename(location)));

    let raw_text = if is_remote_location(location) {
        tracing::debug!(url = location, "Downloading remote source");
        let body = download_url(client, location, timeout).await?;
        htmldecode(&body).into_owned()
    } else {
        std::fs::read_to_string(location)?
    };

    write_source(&raw_text, &name, out_dir)
}

fn is_remote_location(location: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|s| location.starts_with(s))
}

/// Substitutes `{ts}` and `{basename}` template tokens.
fn render_filename(template: &str, ts: i64, basename: Option<&str>) -> String {
    let rendered = template.replace("{ts}", &ts.to_string());
    match basename {
        Some(b) => rendered.replace("{basename}", b),
        None => rendered,
    }
}

/// Writes the captured document atomically and emits the "source saved"
/// event the rest of the system keys observability off.
fn write_source(content: &str, filename: &str, out_dir: &Path) -> Result<PathBuf, CaptureError> {
    let sources_dir = out_dir.join(SOURCES_DIR_NAME);
    std::fs::create_dir_all(&sources_dir)?;

    let path = sources_dir.join(filename);
    atomic_write(&path, content)?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Saved input source");
    Ok(path)
}

/// Atomic write via write-to-temp-then-rename. The destination either holds
/// its complete prior content or the complete new content, never a partial
/// write, even under concurrent readers or a crash mid-write.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    // Randomized temp name: an attacker cannot pre-create a symlink at a
    // path they cannot predict, and create_new fails atomically if the
    // file somehow exists.
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    let written = temp_file
        .write_all(content.as_bytes())
        .and_then(|_| temp_file.sync_all());
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    drop(temp_file);

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// Fetches a URL with the whole transfer — connect, headers, and body —
/// bounded by one timeout, and the body bounded by [`MAX_SOURCE_SIZE`].
async fn download_url(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, CaptureError> {
    let bytes = tokio::time::timeout(timeout, fetch_body(client, url))
        .await
        .map_err(|_| CaptureError::Timeout {
            url: url.to_string(),
            timeout,
        })??;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, CaptureError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CaptureError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CaptureError::Download {
            url: url.to_string(),
            reason: format!("HTTP status {}", response.status()),
        });
    }

    // Fast path: trust Content-Length when present.
    if let Some(len) = response.content_length() {
        if len as usize > MAX_SOURCE_SIZE {
            return Err(CaptureError::TooLarge {
                url: url.to_string(),
                limit: MAX_SOURCE_SIZE,
            });
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CaptureError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len().saturating_add(chunk.len()) > MAX_SOURCE_SIZE {
            return Err(CaptureError::TooLarge {
                url: url.to_string(),
                limit: MAX_SOURCE_SIZE,
            });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
