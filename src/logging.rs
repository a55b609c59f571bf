//! Log subscriber setup for the binary.
//!
//! Logs go to stderr so documents written to stdout stay clean.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the given CLI flags.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn,transcript_enrich=info",
        1 => "info,transcript_enrich=debug",
        _ => "debug,transcript_enrich=trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the flags.
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("log subscriber already installed");
    }
}
