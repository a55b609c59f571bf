//! Correction dictionary for recognized terms.
//!
//! Maps exact raw phrases (single tokens or multi-word idioms) to their
//! corrected spelling. Lookups are exact string matches; there is no fuzzy
//! or partial matching. Multi-token windows are tried longest first so that
//! an idiom is never shadowed by a shorter entry.

use crate::error::{EnrichError, Result};
use crate::transcript::Token;
use std::collections::HashMap;
use std::path::Path;

/// Longest n-gram window tried by [`Dictionary::correct_at`].
pub const MAX_WINDOW: usize = 3;

/// Result of correcting the tokens starting at one index.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedTerm {
    pub display_text: String,
    /// Minimum confidence over the consumed tokens.
    pub confidence: f64,
    /// Number of raw tokens this term replaces (1..=3).
    pub consumed_token_count: usize,
}

/// Exact-match phrase dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from `(raw, corrected)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a flat JSON object `{ "raw phrase": "corrected" }`.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Loads a dictionary file.
    ///
    /// A missing file is an input error, the same as a malformed one.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EnrichError::DictionaryNotFound {
                    path: path.display().to_string(),
                }
            } else {
                EnrichError::Io(e)
            }
        })?;
        let dictionary = Self::from_json(&contents).map_err(|e| EnrichError::DictionaryParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), entries = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the correction for `phrase`, or `phrase` itself.
    pub fn correct<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.entries.get(phrase).map(String::as_str).unwrap_or(phrase)
    }

    /// Looks up `phrase`, returning only actual corrections.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    /// Corrects the term starting at `tokens[index]`.
    ///
    /// Tries a 3-token window, then 2 tokens, then the single token. A window
    /// only counts as a match when the dictionary holds that exact phrase;
    /// windows that run past the end of the stream are skipped.
    ///
    /// Panics if `index` is out of bounds.
    pub fn correct_at(&self, tokens: &[Token], index: usize) -> CorrectedTerm {
        let remaining = tokens.len() - index;
        for window in (2..=MAX_WINDOW.min(remaining)).rev() {
            let slice = &tokens[index..index + window];
            let phrase = join_ngram(slice);
            if let Some(corrected) = self.lookup(&phrase) {
                return CorrectedTerm {
                    display_text: corrected.to_string(),
                    confidence: slice
                        .iter()
                        .map(Token::confidence)
                        .fold(f64::INFINITY, f64::min),
                    consumed_token_count: window,
                };
            }
        }

        let token = &tokens[index];
        CorrectedTerm {
            display_text: self.correct(token.text()).to_string(),
            confidence: token.confidence(),
            consumed_token_count: 1,
        }
    }
}

/// Joins token texts into a lookup key: words separated by a space,
/// punctuation attached to the preceding text.
pub fn join_ngram(tokens: &[Token]) -> String {
    let mut phrase = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && !token.is_punctuation() {
            phrase.push(' ');
        }
        phrase.push_str(token.text());
    }
    phrase
}
