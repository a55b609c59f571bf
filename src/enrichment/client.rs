//! The enrichment service port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An entity detected in a chunk of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub text: String,
    pub score: f64,
}

impl Entity {
    pub fn new(entity_type: &str, text: &str, score: f64) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            text: text.to_string(),
            score,
        }
    }
}

/// Errors returned by an enrichment call.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentError {
    /// The call failed; the chunk is marked failed and the run continues.
    Recoverable(String),
    /// The service cannot be used at all; the run is aborted.
    Fatal(String),
}

impl EnrichmentError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EnrichmentError::Fatal(_))
    }

    pub fn message(&self) -> &str {
        match self {
            EnrichmentError::Recoverable(msg) | EnrichmentError::Fatal(msg) => msg,
        }
    }
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            EnrichmentError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for EnrichmentError {}

/// External entity-extraction and translation service.
///
/// Implementations must be shareable across the dispatcher's tasks.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    /// Detects entities in `text` written in `language`.
    async fn extract_entities(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<Entity>, EnrichmentError>;

    /// Translates `text` from `source` to `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EnrichmentError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Offline client: finds no entities and returns text untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEnrichmentClient;

#[async_trait]
impl EnrichmentClient for EchoEnrichmentClient {
    async fn extract_entities(
        &self,
        _text: &str,
        _language: &str,
    ) -> Result<Vec<Entity>, EnrichmentError> {
        Ok(Vec::new())
    }

    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, EnrichmentError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}
