//! Error types for transcript-enrich.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    // Input errors (fatal before any dispatch begins)
    #[error("Transcript file not found at {path}")]
    TranscriptNotFound { path: String },

    #[error("Failed to parse transcript: {message}")]
    TranscriptParse { message: String },

    #[error("Dictionary file not found at {path}")]
    DictionaryNotFound { path: String },

    #[error("Failed to parse dictionary {path}: {message}")]
    DictionaryParse { path: String, message: String },

    #[error("Invalid token at index {index}: {message}")]
    InvalidToken { index: usize, message: String },

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Enrichment errors that abort the whole run
    #[error("Enrichment aborted: {message}")]
    FatalDispatch { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl EnrichError {
    /// Whether this error originates from reading the input documents.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EnrichError::TranscriptNotFound { .. }
                | EnrichError::TranscriptParse { .. }
                | EnrichError::DictionaryNotFound { .. }
                | EnrichError::DictionaryParse { .. }
                | EnrichError::InvalidToken { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
