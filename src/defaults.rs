//! Default configuration constants for transcript-enrich.
//!
//! Shared between `config` and the components that fall back to them when
//! built without a configuration file.

/// Gap between two tokens (seconds) treated as a pause.
///
/// A pause starts a new fragment and, in caption mode, ends the current sentence.
pub const PAUSE_THRESHOLD_SECS: f64 = 0.9;

/// Maximum span of a single fragment in seconds before a boundary is forced.
pub const MAX_FRAGMENT_SECS: f64 = 3.0;

/// Chunk length after which the next punctuation token closes the chunk.
pub const SENTENCE_SPLIT_CHARS: usize = 4500;

/// Hard upper bound on chunk length.
///
/// The enrichment service rejects requests of 5000 characters or more.
pub const HARD_CAP_CHARS: usize = 4900;

/// Sentence length (caption mode) after which a sentence is closed at the next term.
pub const SENTENCE_MAX_CHARS: usize = 4900;

/// Width of a metrics bucket in seconds.
pub const METRICS_BUCKET_SECS: f64 = 10.0;

/// Terms with a confidence strictly below this count as "unsure" in the metrics.
pub const UNSURE_THRESHOLD: f64 = 0.5;

/// Confidence reported for tokens that carry no confidence value.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Concurrent entity-extraction requests.
pub const ENTITY_CONCURRENCY: usize = 1;

/// Concurrent translation requests.
pub const TRANSLATION_CONCURRENCY: usize = 3;

/// Quiet period after the last returned dispatch token before completion is signalled.
pub const QUIESCENCE_MS: u64 = 250;

/// Per-call timeout for enrichment requests, in milliseconds.
pub const CALL_TIMEOUT_MS: u64 = 30_000;

/// Language of the recognized speech.
pub const SOURCE_LANGUAGE: &str = "en";

/// Caption languages produced in addition to the source language.
pub const TARGET_LANGUAGES: &[&str] = &["es"];

/// Entity type excluded from the entities table.
pub const IGNORED_ENTITY_TYPE: &str = "QUANTITY";

/// Entities must score strictly above this to be listed.
pub const ENTITY_MIN_SCORE: f64 = 0.5;

/// Terms per caption line.
pub const CAPTION_LINE_TERMS: usize = 7;

/// How long each caption cue stays on screen, in seconds.
pub const CUE_DURATION_SECS: u64 = 3;

/// Environment variable overriding the enrichment service endpoint.
pub const ENDPOINT_ENV: &str = "TRANSCRIPT_ENRICH_ENDPOINT";

/// Environment variable overriding the caption target languages (comma-separated).
pub const LANGUAGES_ENV: &str = "TRANSCRIPT_ENRICH_LANGUAGES";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_split_below_hard_cap() {
        assert!(SENTENCE_SPLIT_CHARS < HARD_CAP_CHARS);
        assert!(HARD_CAP_CHARS < 5000);
    }

    #[test]
    fn concurrency_defaults_are_positive() {
        assert!(ENTITY_CONCURRENCY >= 1);
        assert!(TRANSLATION_CONCURRENCY >= 1);
    }
}
