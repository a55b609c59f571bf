//! Sentence collection for translated caption tracks.
//!
//! A sentence is the translation unit. It ends at punctuation, at a pause, or
//! once it grows past the length ceiling, and remembers which caption cues
//! (fragments) its words were spoken in so that a translation can be spread
//! back over the same cues.

use crate::defaults;

/// A caption cue a sentence spans, with the cue's start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceChunk {
    /// 1-based cue number.
    pub cue: usize,
    pub start_time: f64,
}

/// A translation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sentence {
    pub text: String,
    /// Cues in first-seen order, without duplicates.
    pub chunks: Vec<SentenceChunk>,
}

impl Sentence {
    fn register(&mut self, cue: usize, start_time: f64) {
        if !self.chunks.iter().any(|c| c.cue == cue) {
            self.chunks.push(SentenceChunk { cue, start_time });
        }
    }
}

/// Builds sentences from the normalized term stream.
#[derive(Debug, Clone)]
pub struct SentenceCollector {
    max_chars: usize,
    current: Sentence,
    sentences: Vec<Sentence>,
}

impl Default for SentenceCollector {
    fn default() -> Self {
        Self::new(defaults::SENTENCE_MAX_CHARS)
    }
}

impl SentenceCollector {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            current: Sentence::default(),
            sentences: Vec::new(),
        }
    }

    /// Adds a term spoken in cue `cue` (which started at `cue_start`).
    ///
    /// `pause_before` marks a silence before this term long enough to end the
    /// running sentence.
    pub fn push(
        &mut self,
        text: &str,
        punctuation: bool,
        pause_before: bool,
        cue: usize,
        cue_start: f64,
    ) {
        if punctuation {
            self.current.text.push_str(text);
            if !self.current.chunks.is_empty() {
                self.current.register(cue, cue_start);
            }
            self.close();
            return;
        }

        let too_long = self.current.text.chars().count() > self.max_chars;
        if (pause_before && !self.current.text.is_empty()) || too_long {
            self.close();
        }
        if !self.current.text.is_empty() {
            self.current.text.push(' ');
        }
        self.current.text.push_str(text);
        self.current.register(cue, cue_start);
    }

    /// Closes the trailing sentence and returns all sentences in order.
    pub fn finish(mut self) -> Vec<Sentence> {
        self.close();
        self.sentences
    }

    fn close(&mut self) {
        let mut sentence = std::mem::take(&mut self.current);
        if sentence.text.trim().is_empty() {
            return;
        }
        sentence.text = sentence.text.trim().to_string();
        self.sentences.push(sentence);
    }
}
