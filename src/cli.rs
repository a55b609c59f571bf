//! Command-line interface for transcript-enrich
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Annotated transcripts and multi-language captions from speech-recognition output
#[derive(Parser, Debug)]
#[command(
    name = "transcript-enrich",
    version,
    about = "Annotated transcripts and multi-language captions from speech-recognition output"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Correction dictionary (JSON object of "raw phrase": "replacement")
    #[arg(long, short = 'd', global = true, value_name = "PATH")]
    pub dictionary: Option<PathBuf>,

    /// Enrichment service base URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Skip the enrichment service: no entities, untranslated captions
    #[arg(long, global = true)]
    pub offline: bool,

    /// Maximum concurrent enrichment calls (overrides config)
    #[arg(long, global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-call timeout. Examples: 30s, 500ms, 2m, 0 to disable
    #[arg(long, global = true, value_name = "DURATION", value_parser = parse_timeout_ms)]
    pub timeout: Option<u64>,

    /// Suppress everything but errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a timeout string into milliseconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`30s`, `500ms`, `5m`), and compound (`1m30s`). A non-zero
/// duration below one millisecond is rejected, since `0` means no timeout.
fn parse_timeout_ms(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return secs
            .checked_mul(1000)
            .ok_or_else(|| format!("timeout too large: {s}"));
    }
    let duration = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    let millis = u64::try_from(duration.as_millis()).map_err(|_| format!("timeout too large: {s}"))?;
    if millis == 0 && !duration.is_zero() {
        return Err(format!("timeout must be at least 1ms or 0 to disable: {s}"));
    }
    Ok(millis)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an annotated HTML transcript with entities and quality metrics
    Annotate {
        /// Transcript JSON from the speech-recognition service
        transcript: PathBuf,
        /// Media file the transcript belongs to (referenced by the page)
        media: String,
        /// Media MIME type, e.g. video/mp4 or audio/mpeg
        media_type: String,
        /// Output file (default: stdout)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Render WebVTT caption tracks for the source and target languages
    Captions {
        /// Transcript JSON from the speech-recognition service
        transcript: PathBuf,
        /// Target languages, comma-separated (default: from config)
        #[arg(long, short = 'l', value_name = "LANGS")]
        languages: Option<String>,
        /// Directory for <stem>_<lang>.vtt files (default: next to the transcript)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}
