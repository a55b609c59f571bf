//! Fragments: the time-ordered units of rendered transcript output.

use crate::confidence::Tier;

/// Why a new fragment was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryReason {
    /// The very first token.
    First,
    /// The speaker differs from the one at the previous boundary.
    SpeakerChange,
    /// Silence since the previous token exceeded the pause threshold.
    Pause,
    /// The fragment has spanned longer than the maximum fragment length.
    MaxSpan,
}

/// Time and speaker marker that opens a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMarker {
    pub start_time: f64,
    pub speaker: Option<String>,
    /// Same speaker as the previous fragment.
    pub speaker_continues: bool,
    pub reason: BoundaryReason,
}

/// A corrected, classified term.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub text: String,
    pub confidence: f64,
    pub tier: Tier,
    /// Punctuation attaches to the preceding term without a space.
    pub punctuation: bool,
}

/// A run of terms between two boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Position in the fragment sequence, starting at 0.
    pub index: usize,
    pub marker: BoundaryMarker,
    pub terms: Vec<Term>,
}

impl Fragment {
    pub fn new(index: usize, marker: BoundaryMarker) -> Self {
        Self {
            index,
            marker,
            terms: Vec::new(),
        }
    }

    /// 1-based number used for caption cues.
    pub fn cue_number(&self) -> usize {
        self.index + 1
    }

    /// Terms joined with spaces, punctuation attached.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for term in &self.terms {
            if !text.is_empty() && !term.punctuation {
                text.push(' ');
            }
            text.push_str(&term.text);
        }
        text
    }
}
