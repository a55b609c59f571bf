//! transcript-enrich - annotated transcripts and captions from speech recognition output
//!
//! Normalizes a recognizer token stream (dictionary correction, confidence
//! tiers, speaker and pause segmentation, bounded chunking), sends the chunks
//! to an enrichment service under a concurrency cap, and renders an annotated
//! HTML transcript or WebVTT caption tracks.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod confidence;
pub mod config;
pub mod defaults;
pub mod dictionary;
pub mod dispatch;
pub mod enrichment;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod speaker;
pub mod transcript;

// Input
pub use dictionary::Dictionary;
pub use transcript::{Token, Transcript, load_transcript, parse_transcript};

// Core stages
pub use confidence::{Tier, classify};
pub use dispatch::{Chunk, ChunkState, DispatchStats, Dispatcher};
pub use normalize::{NormalizedTranscript, Normalizer};
pub use render::{CaptionTrack, Document, MediaSource, OutputMode};

// Enrichment service port
#[cfg(feature = "http-client")]
pub use enrichment::HttpEnrichmentClient;
pub use enrichment::{
    EchoEnrichmentClient, EnrichmentClient, EnrichmentError, Entity, MockEnrichmentClient,
};

// Composition
pub use pipeline::{Pipeline, PipelineOutput, RunSummary};

// Error handling
pub use error::{EnrichError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_has_hash_only_when_built_from_git() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(ver.contains('+'), "expected '+<hash>', got: {}", ver);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
