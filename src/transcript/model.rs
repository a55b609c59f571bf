//! Token stream data model.

use crate::defaults;

/// Whether a token is a spoken word or inferred punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punctuation,
}

/// One recognition hypothesis for a token.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub content: String,
    /// Engine confidence in `[0, 1]`.
    pub confidence: f64,
}

/// A single recognized word or punctuation mark.
///
/// Always carries at least one alternative; the first one is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub alternatives: Vec<Alternative>,
}

impl Token {
    /// Creates a timed word token with a single alternative.
    pub fn word(text: &str, start_time: f64, end_time: f64, confidence: f64) -> Self {
        Self {
            kind: TokenKind::Word,
            start_time: Some(start_time),
            end_time: Some(end_time),
            alternatives: vec![Alternative {
                content: text.to_string(),
                confidence,
            }],
        }
    }

    /// Creates an untimed punctuation token.
    pub fn punctuation(text: &str) -> Self {
        Self {
            kind: TokenKind::Punctuation,
            start_time: None,
            end_time: None,
            alternatives: vec![Alternative {
                content: text.to_string(),
                confidence: defaults::DEFAULT_CONFIDENCE,
            }],
        }
    }

    /// Overrides the confidence of the primary alternative.
    #[cfg(test)]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        if let Some(first) = self.alternatives.first_mut() {
            first.confidence = confidence;
        }
        self
    }

    /// Text of the primary alternative.
    pub fn text(&self) -> &str {
        self.alternatives
            .first()
            .map(|a| a.content.as_str())
            .unwrap_or("")
    }

    /// Confidence of the primary alternative.
    pub fn confidence(&self) -> f64 {
        self.alternatives
            .first()
            .map(|a| a.confidence)
            .unwrap_or(defaults::DEFAULT_CONFIDENCE)
    }

    pub fn is_punctuation(&self) -> bool {
        self.kind == TokenKind::Punctuation
    }
}

/// A speaker turn, `[start_time, end_time]` inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub speaker_id: String,
}

impl SpeakerSegment {
    pub fn new(start_time: f64, end_time: f64, speaker_id: &str) -> Self {
        Self {
            start_time,
            end_time,
            speaker_id: speaker_id.to_string(),
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

/// A fully loaded transcript: the token stream and, when diarization ran,
/// the speaker segments ordered by start time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub tokens: Vec<Token>,
    pub speaker_segments: Option<Vec<SpeakerSegment>>,
}

impl Transcript {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            speaker_segments: None,
        }
    }

    pub fn with_speakers(mut self, segments: Vec<SpeakerSegment>) -> Self {
        self.speaker_segments = Some(segments);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_token_accessors() {
        let token = Token::word("hello", 1.0, 1.5, 0.82);
        assert_eq!(token.text(), "hello");
        assert_eq!(token.confidence(), 0.82);
        assert!(!token.is_punctuation());
        assert_eq!(token.start_time, Some(1.0));
    }

    #[test]
    fn punctuation_defaults_to_full_confidence() {
        let token = Token::punctuation(",");
        assert!(token.is_punctuation());
        assert_eq!(token.confidence(), 1.0);
        assert_eq!(token.start_time, None);
    }

    #[test]
    fn with_confidence_overrides_primary() {
        let token = Token::punctuation(".").with_confidence(0.3);
        assert_eq!(token.confidence(), 0.3);
    }

    #[test]
    fn segment_bounds_are_inclusive() {
        let segment = SpeakerSegment::new(1.0, 2.0, "spk_0");
        assert!(segment.contains(1.0));
        assert!(segment.contains(2.0));
        assert!(!segment.contains(2.01));
        assert!(!segment.contains(0.99));
    }
}
