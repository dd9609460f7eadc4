use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use linkrake::capture;
use linkrake::config::Config;
use linkrake::parser;
use linkrake::record::Record;

#[derive(Parser, Debug)]
#[command(
    name = "linkrake",
    about = "Extract URL records from bookmark exports, feeds, or raw text of unknown format"
)]
struct Args {
    /// Path or URL of the document to ingest; use '-' to read from stdin
    input: Option<String>,

    /// Parse these URLs directly, without capturing a source document
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Base URL used to resolve relative links in HTML inputs
    #[arg(long)]
    root_url: Option<String>,

    /// Per-download timeout in seconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory that receives the sources/ capture dir (overrides config)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Emit records as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

/// Get the config file path (~/.config/linkrake/config.toml)
fn config_file() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("linkrake")
            .join("config.toml")
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match config_file() {
        Some(path) => Config::load(&path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.timeout_secs));
    let out_dir = args.out_dir.unwrap_or(config.out_dir);
    // The dispatch budget is advisory; four download-timeouts is generous
    // enough that hitting it means something is pathological.
    let budget = timeout * 4;

    let (records, parser_name) = if !args.urls.is_empty() {
        parser::parse_urls(&args.urls, args.root_url.as_deref(), budget)
    } else {
        let input = args
            .input
            .context("No input given: pass a path, a URL, '-' for stdin, or --url")?;

        let source_path = if input == "-" {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            capture::capture_text(&raw, capture::DEFAULT_TEXT_FILENAME, &out_dir)?
        } else {
            let client = reqwest::Client::new();
            match capture::capture_path_or_url(
                &input,
                timeout,
                capture::DEFAULT_FILE_FILENAME,
                &out_dir,
                &client,
            )
            .await
            {
                Ok(path) => path,
                // A failed capture is unrecoverable: without the raw
                // document there is nothing to parse.
                Err(e) if e.is_fatal() => {
                    eprintln!("[!] Failed to capture {}", input);
                    eprintln!("    {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to read source {}", input));
                    return Err(err);
                }
            }
        };

        parser::parse_file(&source_path, args.root_url.as_deref(), budget)
            .with_context(|| format!("Failed to read captured source {}", source_path.display()))?
    };

    if records.is_empty() {
        eprintln!("{}: no URLs could be extracted from the input", parser_name);
        std::process::exit(1);
    }

    print_records(&records, &parser_name, args.json)?;
    Ok(())
}

fn print_records(records: &[Record], parser_name: &str, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }
    } else {
        eprintln!("Parsed {} records using {}", records.len(), parser_name);
        for record in records {
            match &record.title {
                Some(title) => writeln!(out, "{}\t{}", record.url, title)?,
                None => writeln!(out, "{}", record.url)?,
            }
        }
    }
    Ok(())
}
