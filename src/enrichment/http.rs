//! Enrichment over a JSON HTTP service.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST /entities` with `{text, language_code}` returning `{entities: [{type, text, score}]}`
//! - `POST /translate` with `{text, source_language_code, target_language_code}`
//!   returning `{translated_text}`
//!
//! Rejected credentials (401/403) are fatal; every other failure is recoverable.

use crate::enrichment::client::{EnrichmentClient, Entity, EnrichmentError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EntitiesRequest<'a> {
    text: &'a str,
    language_code: &'a str,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

/// HTTP client for the enrichment service.
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEnrichmentClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, EnrichmentError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| EnrichmentError::Recoverable(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if let Some(error) = classify_status(status) {
            return Err(error);
        }

        response
            .text()
            .await
            .map_err(|e| EnrichmentError::Recoverable(format!("Failed to read response: {e}")))
    }
}

/// Maps a non-success status to an error.
fn classify_status(status: StatusCode) -> Option<EnrichmentError> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(EnrichmentError::Fatal(format!(
            "Enrichment service rejected credentials ({status})"
        )))
    } else {
        Some(EnrichmentError::Recoverable(format!(
            "Enrichment service returned status {status}"
        )))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, EnrichmentError> {
    serde_json::from_str(body)
        .map_err(|e| EnrichmentError::Recoverable(format!("Unexpected response format: {e}")))
}

#[async_trait]
impl EnrichmentClient for HttpEnrichmentClient {
    async fn extract_entities(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<Entity>, EnrichmentError> {
        let body = self
            .post(
                "entities",
                &EntitiesRequest {
                    text,
                    language_code: language,
                },
            )
            .await?;
        Ok(parse::<EntitiesResponse>(&body)?.entities)
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EnrichmentError> {
        let body = self
            .post(
                "translate",
                &TranslateRequest {
                    text,
                    source_language_code: source,
                    target_language_code: target,
                },
            )
            .await?;
        Ok(parse::<TranslateResponse>(&body)?.translated_text)
    }

    fn name(&self) -> &str {
        "http"
    }
}
