//! WebVTT caption tracks.
//!
//! The primary track has one cue per fragment. Translated tracks spread
//! each sentence's translation over the cues the sentence was spoken in,
//! `ceil(words / cues)` words per cue with earlier cues filled first.

use crate::normalize::{Fragment, Sentence};
use crate::render::template::escape;
use crate::render::timestamp::{TimestampStyle, cue_end, format_offset};

/// One WebVTT cue.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub number: usize,
    pub start: f64,
    pub body: String,
}

/// Cue layout shared by primary and translated tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueLayout {
    /// Line break cadence, in terms.
    pub line_terms: usize,
    pub duration_secs: u64,
}

impl CueLayout {
    pub fn new(line_terms: usize, duration_secs: u64) -> Self {
        Self {
            line_terms: line_terms.max(1),
            duration_secs,
        }
    }
}

/// Serializes cues as a WebVTT document.
pub fn render_track(cues: &[Cue], layout: CueLayout) -> String {
    let body = cues
        .iter()
        .map(|cue| {
            format!(
                "{}\n{} --> {}\n{}",
                cue.number,
                format_offset(cue.start, TimestampStyle::Dot),
                format_offset(cue_end(cue.start, layout.duration_secs), TimestampStyle::Dot),
                cue.body.trim_end()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("WEBVTT\n\n{}\n", body)
}

/// Cues for the source-language track.
pub fn primary_cues(fragments: &[Fragment], layout: CueLayout) -> Vec<Cue> {
    fragments
        .iter()
        .map(|fragment| {
            let mut body = String::new();
            let mut line_terms = 1usize;
            for term in &fragment.terms {
                if term.punctuation && (body.ends_with(' ') || body.ends_with('\n')) {
                    body.pop();
                }
                let text = escape(&term.text);
                match term.tier.caption_class() {
                    Some(class) => body.push_str(&format!("<c.{}>{} </c>", class, text)),
                    None => {
                        body.push_str(&text);
                        body.push(' ');
                    }
                }
                if line_terms % layout.line_terms == 0 || (line_terms > 1 && term.punctuation) {
                    body.push('\n');
                    line_terms = 1;
                }
                line_terms += 1;
            }
            Cue {
                number: fragment.cue_number(),
                start: fragment.marker.start_time,
                body,
            }
        })
        .collect()
}

/// The source-language WebVTT track.
pub fn render_primary(fragments: &[Fragment], layout: CueLayout) -> String {
    render_track(&primary_cues(fragments, layout), layout)
}

/// Cues for one target language.
///
/// `translations[i]` belongs to `sentences[i]`; `None` (a failed
/// translation) leaves that sentence out of the track.
pub fn translated_cues(
    sentences: &[Sentence],
    translations: &[Option<String>],
    layout: CueLayout,
) -> Vec<Cue> {
    let mut cues: Vec<Cue> = Vec::new();

    for (sentence, translation) in sentences.iter().zip(translations) {
        let Some(translation) = translation else {
            continue;
        };
        if sentence.chunks.is_empty() {
            continue;
        }

        let words: Vec<&str> = translation.split_whitespace().collect();
        let per_cue = words.len().div_ceil(sentence.chunks.len());

        for (i, chunk) in sentence.chunks.iter().enumerate() {
            // A sentence picking up where the previous one stopped shares its cue.
            if cues.last().is_none_or(|cue| cue.number != chunk.cue) {
                cues.push(Cue {
                    number: chunk.cue,
                    start: chunk.start_time,
                    body: String::new(),
                });
            }
            let Some(cue) = cues.last_mut() else {
                continue;
            };

            let from = (i * per_cue).min(words.len());
            let to = ((i + 1) * per_cue).min(words.len());
            let mut line_terms = 1usize;
            for word in &words[from..to] {
                if line_terms % layout.line_terms == 0 {
                    cue.body.push('\n');
                } else if !cue.body.is_empty() && !cue.body.ends_with('\n') {
                    cue.body.push(' ');
                }
                cue.body.push_str(&escape(word));
                line_terms += 1;
            }
        }
    }
    cues
}

/// One translated WebVTT track.
pub fn render_translation(
    sentences: &[Sentence],
    translations: &[Option<String>],
    layout: CueLayout,
) -> String {
    render_track(&translated_cues(sentences, translations, layout), layout)
}
