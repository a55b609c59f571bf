//! Reads speech-recognition JSON documents into a [`Transcript`].
//!
//! The expected shape follows the common batch transcription output:
//!
//! ```json
//! { "results": {
//!     "items": [ { "type": "pronunciation", "start_time": "0.0", "end_time": "0.4",
//!                  "alternatives": [ { "content": "hi", "confidence": "0.95" } ] } ],
//!     "speaker_labels": { "segments": [ { "start_time": "0.0", "end_time": "4.2",
//!                                         "speaker_label": "spk_0" } ] } } }
//! ```
//!
//! Times and confidences may be JSON strings or numbers.

use crate::defaults;
use crate::error::{EnrichError, Result};
use crate::transcript::model::{Alternative, SpeakerSegment, Token, TokenKind, Transcript};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawDocument {
    results: RawResults,
}

#[derive(Debug, Deserialize)]
struct RawResults {
    items: Vec<RawItem>,
    #[serde(default)]
    speaker_labels: Option<RawSpeakerLabels>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    start_time: Option<NumberOrString>,
    #[serde(default)]
    end_time: Option<NumberOrString>,
    #[serde(default)]
    alternatives: Vec<RawAlternative>,
}

#[derive(Debug, Deserialize)]
struct RawAlternative {
    content: String,
    #[serde(default)]
    confidence: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
struct RawSpeakerLabels {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start_time: NumberOrString,
    end_time: NumberOrString,
    speaker_label: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    /// `Ok(None)` for blank strings.
    fn to_f64(&self) -> std::result::Result<Option<f64>, String> {
        match self {
            NumberOrString::Number(n) => Ok(Some(*n)),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(None),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| format!("'{s}' is not a number: {e}")),
        }
    }
}

/// Load and parse a transcript file.
pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnrichError::TranscriptNotFound {
                path: path.display().to_string(),
            }
        } else {
            EnrichError::Io(e)
        }
    })?;
    let transcript = parse_transcript(&contents)?;
    tracing::debug!(
        path = %path.display(),
        tokens = transcript.tokens.len(),
        speakers = transcript.speaker_segments.is_some(),
        "loaded transcript"
    );
    Ok(transcript)
}

/// Parse a transcript document from a JSON string.
pub fn parse_transcript(json: &str) -> Result<Transcript> {
    let document: RawDocument =
        serde_json::from_str(json).map_err(|e| EnrichError::TranscriptParse {
            message: e.to_string(),
        })?;

    let tokens = document
        .results
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| convert_item(index, item))
        .collect::<Result<Vec<_>>>()?;

    let speaker_segments = match document.results.speaker_labels {
        Some(labels) => {
            let mut segments = labels
                .segments
                .into_iter()
                .map(convert_segment)
                .collect::<Result<Vec<_>>>()?;
            segments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
            Some(segments)
        }
        None => None,
    };

    Ok(Transcript {
        tokens,
        speaker_segments,
    })
}

fn convert_item(index: usize, item: RawItem) -> Result<Token> {
    let invalid = |message: String| EnrichError::InvalidToken { index, message };

    let kind = match item.kind.as_str() {
        "punctuation" => TokenKind::Punctuation,
        _ => TokenKind::Word,
    };
    if item.alternatives.is_empty() {
        return Err(invalid("token has no alternatives".to_string()));
    }

    let start_time = match &item.start_time {
        Some(v) => v.to_f64().map_err(invalid)?,
        None => None,
    };
    let end_time = match &item.end_time {
        Some(v) => v.to_f64().map_err(invalid)?,
        None => None,
    };

    let alternatives = item
        .alternatives
        .into_iter()
        .map(|alt| -> Result<Alternative> {
            let confidence = match &alt.confidence {
                Some(v) => v.to_f64().map_err(invalid)?,
                None => None,
            }
            .unwrap_or(defaults::DEFAULT_CONFIDENCE);
            Ok(Alternative {
                content: alt.content,
                confidence,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Token {
        kind,
        start_time,
        end_time,
        alternatives,
    })
}

fn convert_segment(segment: RawSegment) -> Result<SpeakerSegment> {
    let time = |value: &NumberOrString| -> Result<f64> {
        value
            .to_f64()
            .map_err(|message| EnrichError::TranscriptParse { message })?
            .ok_or_else(|| EnrichError::TranscriptParse {
                message: format!("speaker segment {} has a blank time", segment.speaker_label),
            })
    };
    Ok(SpeakerSegment {
        start_time: time(&segment.start_time)?,
        end_time: time(&segment.end_time)?,
        speaker_id: segment.speaker_label.clone(),
    })
}
