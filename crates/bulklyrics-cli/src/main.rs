use anyhow::{Context, Result};
use arboard::Clipboard;
use bulklyrics_doc::{LyricsDocument, SaveError};
use bulklyrics_fetch::HttpFetcher;
use bulklyrics_model::{parse_songlist, RunState};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod run;

#[derive(Parser)]
#[command(name = "bulklyrics")]
#[command(about = "Fetch lyrics for a list of songs and bundle them into one .docx document")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Read the songlist from a file, one song per line (default: stdin)
    #[arg(short, long, conflicts_with = "clipboard")]
    input: Option<PathBuf>,

    /// Read the songlist from the system clipboard
    #[arg(short, long)]
    clipboard: bool,

    /// Output document path
    #[arg(short, long, default_value = "Bulk Lyrics.docx")]
    output: PathBuf,

    /// Also write the extracted song data as pretty-printed JSON
    #[arg(long)]
    dump_json: Option<PathBuf>,

    /// Open the saved document with the OS default handler
    #[arg(long)]
    open: bool,

    /// Abort the whole batch on the first fetch error instead of marking
    /// that song as not found
    #[arg(long)]
    fail_fast: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let text = read_songlist_input(&cli)?;
    let songs = parse_songlist(&text);
    if songs.is_empty() {
        tracing::warn!("No songs in input — nothing to do");
        return Ok(());
    }
    tracing::info!(songs = songs.len(), "Parsed songlist");

    // Cooperative cancellation: Ctrl-C flips a flag the run loop checks
    // once per song boundary, never mid-fetch.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Cancellation requested — stopping at the next song boundary");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let fetcher = HttpFetcher::new()?;
    let outcome = run::run_batch(&fetcher, &songs, cli.fail_fast, &cancel).await?;

    if let Some(dump) = &cli.dump_json {
        let json = serde_json::to_string_pretty(&outcome.songs)?;
        std::fs::write(dump, &json)
            .with_context(|| format!("Failed to write {}", dump.display()))?;
        tracing::info!(path = %dump.display(), songs = outcome.songs.len(), "Wrote song data JSON");
    }

    let Some(document) = outcome.document else {
        // Cancelled at a song boundary; nothing is persisted.
        return Ok(());
    };

    let mut state = outcome.state;
    let output = with_docx_extension(cli.output.clone());

    if save_with_retry(&document, &output)? {
        state = state.transition(RunState::Saved)?;
        if cli.open {
            open_document(&output)?;
        }
    } else {
        state = state.transition(RunState::Discarded)?;
        tracing::warn!("Document discarded — no file written");
    }

    tracing::info!(state = ?state, "Run complete");
    Ok(())
}

fn read_songlist_input(cli: &Cli) -> Result<String> {
    if cli.clipboard {
        let mut clipboard = Clipboard::new().context("Failed to access the clipboard")?;
        clipboard.get_text().context("Clipboard has no text content")
    } else if let Some(path) = &cli.input {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read songlist from {}", path.display()))
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read songlist from stdin")?;
        Ok(buf)
    }
}

/// Save, retrying on access-denied (the document is usually open in a word
/// processor). Returns `false` when the user gives up, leaving no file.
fn save_with_retry(document: &LyricsDocument, path: &Path) -> Result<bool> {
    loop {
        match document.save(path) {
            Ok(()) => return Ok(true),
            Err(e @ SaveError::AccessDenied { .. }) => {
                tracing::warn!("{e}");
                eprintln!("Press Enter to retry saving, or type q to give up.");
                let mut line = String::new();
                let n = std::io::stdin()
                    .read_line(&mut line)
                    .context("Failed to read retry confirmation")?;
                if n == 0 || line.trim().eq_ignore_ascii_case("q") {
                    return Ok(false);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn with_docx_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("docx");
    }
    path
}

/// Hand the saved document to the OS default handler.
fn open_document(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    let status = std::process::Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .status();
    #[cfg(target_os = "macos")]
    let status = std::process::Command::new("open").arg(path).status();
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let status = std::process::Command::new("xdg-open").arg(path).status();

    let status = status.with_context(|| format!("Failed to open {}", path.display()))?;
    anyhow::ensure!(status.success(), "Opener exited with {status}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_extension_added_when_missing() {
        assert_eq!(
            with_docx_extension(PathBuf::from("Bulk Lyrics")),
            PathBuf::from("Bulk Lyrics.docx")
        );
        assert_eq!(
            with_docx_extension(PathBuf::from("out.docx")),
            PathBuf::from("out.docx")
        );
    }
}
