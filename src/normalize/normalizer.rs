//! The token stream normalizer.

use crate::config::NormalizerConfig;
use crate::confidence::classify;
use crate::dictionary::Dictionary;
use crate::normalize::chunker::{ChunkBuilder, ChunkLimits};
use crate::normalize::fragment::{BoundaryMarker, BoundaryReason, Fragment, Term};
use crate::normalize::metrics::MetricsTable;
use crate::normalize::sentence::{Sentence, SentenceCollector};
use crate::speaker::SpeakerLocator;
use crate::transcript::Transcript;

/// Everything the renderers and the dispatcher need from one pass over the tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTranscript {
    pub fragments: Vec<Fragment>,
    /// Entity-extraction chunks, in order.
    pub chunks: Vec<String>,
    /// Translation units for caption tracks, in order.
    pub sentences: Vec<Sentence>,
    pub metrics: MetricsTable,
}

/// Walks a transcript once and produces fragments, chunks, sentences and metrics.
pub struct Normalizer<'a> {
    config: &'a NormalizerConfig,
    dictionary: &'a Dictionary,
}

/// Mutable state of a single walk.
struct WalkState<'s> {
    previous_end: f64,
    last_boundary: f64,
    last_speaker: Option<&'s str>,
    fragments: Vec<Fragment>,
}

impl<'s> WalkState<'s> {
    fn new() -> Self {
        Self {
            previous_end: 0.0,
            last_boundary: 0.0,
            last_speaker: None,
            fragments: Vec::new(),
        }
    }
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a NormalizerConfig, dictionary: &'a Dictionary) -> Self {
        Self { config, dictionary }
    }

    pub fn normalize(&self, transcript: &Transcript) -> NormalizedTranscript {
        let tokens = &transcript.tokens;
        let mut locator = SpeakerLocator::new(transcript.speaker_segments.as_deref());
        let mut state = WalkState::new();
        let mut chunks = ChunkBuilder::new(ChunkLimits {
            sentence_split_chars: self.config.sentence_split_chars,
            hard_cap_chars: self.config.hard_cap_chars,
        });
        let mut sentences = SentenceCollector::new(self.config.sentence_max_chars);
        let mut metrics =
            MetricsTable::new(self.config.metrics_bucket_secs, self.config.unsure_threshold);
        let mut corrections = 0usize;

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let speaker = locator.advance(token);
            let start = token.start_time;
            let pause =
                start.is_some_and(|s| s - state.previous_end > self.config.pause_threshold_secs);

            if let Some(reason) = self.boundary_reason(&state, speaker, start, pause) {
                let start_time = start.unwrap_or(state.previous_end);
                let index = state.fragments.len();
                state.fragments.push(Fragment::new(
                    index,
                    BoundaryMarker {
                        start_time,
                        speaker: speaker.map(str::to_string),
                        speaker_continues: speaker.is_some() && speaker == state.last_speaker,
                        reason,
                    },
                ));
                state.last_boundary = start_time;
                state.last_speaker = speaker;
            }

            let corrected = self.dictionary.correct_at(tokens, i);
            let consumed = &tokens[i..i + corrected.consumed_token_count];
            if corrected.consumed_token_count > 1 {
                corrections += 1;
            }
            if let Some(end) = consumed.iter().rev().find_map(|t| t.end_time) {
                state.previous_end = end;
            }

            let punctuation = token.is_punctuation();
            let term = Term {
                tier: classify(corrected.confidence),
                confidence: corrected.confidence,
                punctuation,
                text: corrected.display_text,
            };

            chunks.push(&term.text, punctuation);
            if let Some(fragment) = state.fragments.last() {
                sentences.push(
                    &term.text,
                    punctuation,
                    pause,
                    fragment.cue_number(),
                    fragment.marker.start_time,
                );
            }
            if let Some(time) = start {
                metrics.record(time, term.confidence);
            }
            if let Some(fragment) = state.fragments.last_mut() {
                fragment.terms.push(term);
            }

            i += corrected.consumed_token_count;
        }

        let normalized = NormalizedTranscript {
            fragments: state.fragments,
            chunks: chunks.finish(),
            sentences: sentences.finish(),
            metrics,
        };
        tracing::debug!(
            tokens = tokens.len(),
            fragments = normalized.fragments.len(),
            chunks = normalized.chunks.len(),
            sentences = normalized.sentences.len(),
            multi_token_corrections = corrections,
            "normalized token stream"
        );
        normalized
    }

    /// First matching boundary trigger, in priority order.
    fn boundary_reason(
        &self,
        state: &WalkState<'_>,
        speaker: Option<&str>,
        start: Option<f64>,
        pause: bool,
    ) -> Option<BoundaryReason> {
        if state.fragments.is_empty() {
            Some(BoundaryReason::First)
        } else if speaker != state.last_speaker {
            Some(BoundaryReason::SpeakerChange)
        } else if pause {
            Some(BoundaryReason::Pause)
        } else if start.is_some_and(|s| s - state.last_boundary > self.config.max_fragment_secs) {
            Some(BoundaryReason::MaxSpan)
        } else {
            None
        }
    }
}
