//! Size-bounded text chunking for enrichment requests.
//!
//! Accumulates corrected terms and closes a chunk when:
//! - a punctuation term lands after the buffer passed the sentence-split mark
//! - the next term would push the buffer past the hard cap
//! - the buffer reaches the hard cap exactly
//!
//! Lengths are counted in characters. No emitted chunk exceeds the hard cap.

use crate::defaults;

/// Chunk size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    /// Close at the next punctuation once the buffer is longer than this.
    pub sentence_split_chars: usize,
    /// Never exceed this many characters.
    pub hard_cap_chars: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            sentence_split_chars: defaults::SENTENCE_SPLIT_CHARS,
            hard_cap_chars: defaults::HARD_CAP_CHARS,
        }
    }
}

/// Accumulates terms into chunks.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    limits: ChunkLimits,
    buffer: String,
    buffer_chars: usize,
    chunks: Vec<String>,
}

impl ChunkBuilder {
    pub fn new(limits: ChunkLimits) -> Self {
        Self {
            limits: ChunkLimits {
                hard_cap_chars: limits.hard_cap_chars.max(1),
                ..limits
            },
            buffer: String::new(),
            buffer_chars: 0,
            chunks: Vec::new(),
        }
    }

    /// Appends a term. Punctuation attaches without a separating space.
    pub fn push(&mut self, text: &str, punctuation: bool) {
        let cap = self.limits.hard_cap_chars;
        let len = text.chars().count();
        if len == 0 {
            return;
        }

        if len > cap {
            self.flush();
            self.push_oversized(text);
            return;
        }

        let separator = usize::from(self.buffer_chars > 0 && !punctuation);
        if self.buffer_chars + separator + len > cap {
            self.flush();
        }
        if self.buffer_chars > 0 && !punctuation {
            self.buffer.push(' ');
            self.buffer_chars += 1;
        }
        self.buffer.push_str(text);
        self.buffer_chars += len;

        if self.buffer_chars >= cap
            || (punctuation && self.buffer_chars > self.limits.sentence_split_chars)
        {
            self.flush();
        }
    }

    /// Closes the trailing partial chunk and returns all chunks in order.
    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }

    fn flush(&mut self) {
        let text = self.buffer.trim();
        if !text.is_empty() {
            self.chunks.push(text.to_string());
        }
        self.buffer.clear();
        self.buffer_chars = 0;
    }

    /// Splits a single term longer than the cap on character boundaries.
    fn push_oversized(&mut self, text: &str) {
        let cap = self.limits.hard_cap_chars;
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = chars.chunks(cap).peekable();
        while let Some(piece) = pieces.next() {
            self.buffer = piece.iter().collect();
            self.buffer_chars = piece.len();
            if pieces.peek().is_some() || self.buffer_chars >= cap {
                self.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(split: usize, cap: usize) -> ChunkBuilder {
        ChunkBuilder::new(ChunkLimits {
            sentence_split_chars: split,
            hard_cap_chars: cap,
        })
    }

    #[test]
    fn single_sentence_is_one_chunk() {
        let mut b = builder(4500, 4900);
        b.push("hi", false);
        b.push(".", true);
        assert_eq!(b.finish(), vec!["hi.".to_string()]);
    }

    #[test]
    fn punctuation_after_split_mark_closes_chunk() {
        let mut b = builder(5, 100);
        b.push("hello", false);
        b.push("there", false);
        b.push(".", true);
        b.push("next", false);
        assert_eq!(b.finish(), vec!["hello there.", "next"]);
    }

    #[test]
    fn words_never_split_on_sentence_mark_alone() {
        let mut b = builder(5, 100);
        b.push("aaaaaa", false);
        b.push("bbbbbb", false);
        assert_eq!(b.chunks.len(), 0);
        assert_eq!(b.finish(), vec!["aaaaaa bbbbbb"]);
    }

    #[test]
    fn flushes_before_exceeding_cap() {
        let mut b = builder(10, 10);
        b.push("abcd", false);
        b.push("efgh", false); // "abcd efgh" = 9
        b.push("ij", false); // would be 12
        let chunks = b.finish();
        assert_eq!(chunks, vec!["abcd efgh", "ij"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn buffer_exactly_at_cap_flushes() {
        let mut b = builder(10, 10);
        b.push("abcd", false);
        b.push("efghi", false); // exactly 10
        assert_eq!(b.chunks.len(), 1);
        b.push("z", false);
        assert_eq!(b.finish(), vec!["abcd efghi", "z"]);
    }

    #[test]
    fn oversized_term_is_split() {
        let mut b = builder(4, 4);
        b.push("xy", false);
        b.push("abcdefghij", false);
        b.push("k", false);
        let chunks = b.finish();
        assert_eq!(chunks, vec!["xy", "abcd", "efgh", "ij k"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut b = builder(100, 5);
        b.push("ñandú", false); // 5 chars, 7 bytes
        assert_eq!(b.chunks.len(), 1);
        assert_eq!(b.finish(), vec!["ñandú"]);
    }

    #[test]
    fn empty_builder_yields_nothing() {
        assert!(builder(10, 10).finish().is_empty());
    }
}
