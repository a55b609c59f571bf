//! Speaker attribution from diarization segments.

use crate::transcript::{SpeakerSegment, Token};

/// Returns the speaker whose segment contains `time`.
///
/// Linear scan; the first matching segment wins. `None` when speaker data is
/// unavailable or no segment covers `time`.
pub fn locate(segments: Option<&[SpeakerSegment]>, time: f64) -> Option<&str> {
    segments?
        .iter()
        .find(|segment| segment.contains(time))
        .map(|segment| segment.speaker_id.as_str())
}

/// Tracks the current speaker across a token stream.
///
/// The speaker is only re-evaluated for tokens that carry a start time;
/// untimed tokens (inferred punctuation) keep the previous speaker.
#[derive(Debug, Clone)]
pub struct SpeakerLocator<'a> {
    segments: Option<&'a [SpeakerSegment]>,
    current: Option<&'a str>,
}

impl<'a> SpeakerLocator<'a> {
    pub fn new(segments: Option<&'a [SpeakerSegment]>) -> Self {
        Self {
            segments,
            current: None,
        }
    }

    /// Updates the current speaker for `token` and returns it.
    pub fn advance(&mut self, token: &Token) -> Option<&'a str> {
        if let Some(start) = token.start_time {
            self.current = locate(self.segments, start);
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<SpeakerSegment> {
        vec![
            SpeakerSegment::new(0.0, 2.0, "spk_0"),
            SpeakerSegment::new(2.0, 5.0, "spk_1"),
            SpeakerSegment::new(6.0, 8.0, "spk_0"),
        ]
    }

    #[test]
    fn locate_first_matching_segment() {
        let segs = segments();
        assert_eq!(locate(Some(&segs), 1.0), Some("spk_0"));
        // shared boundary resolves to the earlier segment
        assert_eq!(locate(Some(&segs), 2.0), Some("spk_0"));
        assert_eq!(locate(Some(&segs), 3.5), Some("spk_1"));
        assert_eq!(locate(Some(&segs), 7.0), Some("spk_0"));
    }

    #[test]
    fn locate_gap_and_unavailable() {
        let segs = segments();
        assert_eq!(locate(Some(&segs), 5.5), None);
        assert_eq!(locate(None, 1.0), None);
    }

    #[test]
    fn locator_is_sticky_for_untimed_tokens() {
        let segs = segments();
        let mut locator = SpeakerLocator::new(Some(&segs));

        assert_eq!(locator.advance(&Token::word("hey", 3.0, 3.2, 1.0)), Some("spk_1"));
        assert_eq!(locator.advance(&Token::punctuation("?")), Some("spk_1"));
        assert_eq!(locator.advance(&Token::word("yo", 6.5, 6.7, 1.0)), Some("spk_0"));
        assert_eq!(locator.advance(&Token::punctuation(".")), Some("spk_0"));
    }

    #[test]
    fn locator_without_data_never_attributes() {
        let mut locator = SpeakerLocator::new(None);
        assert_eq!(locator.advance(&Token::word("hey", 3.0, 3.2, 1.0)), None);
    }
}
