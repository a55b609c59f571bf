//! Output rendering.

pub mod annotated;
pub mod captions;
pub mod entities;
pub mod template;
pub mod timestamp;

pub use annotated::render_annotated;
pub use captions::{Cue, CueLayout, render_primary, render_translation};
pub use entities::{EntitySummary, EntityTable};
pub use template::MediaSource;
pub use timestamp::{TimestampStyle, format_offset};

/// What a run produces.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    /// HTML transcript with entities and metrics for the given media.
    Annotated { media: MediaSource },
    /// WebVTT tracks: the source language plus one per target language.
    Captions { target_languages: Vec<String> },
}

/// A WebVTT track for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language: String,
    pub vtt: String,
}

/// A finished document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Annotated(String),
    Captions(Vec<CaptionTrack>),
}

impl Document {
    /// Files to write, named after `stem`: `<stem>.html` or `<stem>_<lang>.vtt`.
    pub fn files(&self, stem: &str) -> Vec<(String, &str)> {
        match self {
            Document::Annotated(html) => vec![(format!("{stem}.html"), html.as_str())],
            Document::Captions(tracks) => tracks
                .iter()
                .map(|t| (format!("{}_{}.vtt", stem, t.language), t.vtt.as_str()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_file_names() {
        let doc = Document::Captions(vec![
            CaptionTrack {
                language: "en".to_string(),
                vtt: "WEBVTT\n\n\n".to_string(),
            },
            CaptionTrack {
                language: "es".to_string(),
                vtt: "WEBVTT\n\n\n".to_string(),
            },
        ]);
        let names: Vec<String> = doc.files("talk").into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["talk_en.vtt", "talk_es.vtt"]);

        let html = Document::Annotated("<html></html>".to_string());
        assert_eq!(html.files("talk")[0].0, "talk.html");
    }
}
