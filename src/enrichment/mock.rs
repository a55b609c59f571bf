//! Scripted enrichment client for tests.

use crate::enrichment::client::{EnrichmentClient, Entity, EnrichmentError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock enrichment client.
///
/// Responses are keyed by the exact request text. Unknown texts get no
/// entities and an echoed translation prefixed with the target language.
#[derive(Debug, Clone, Default)]
pub struct MockEnrichmentClient {
    entities: HashMap<String, Vec<Entity>>,
    translations: HashMap<(String, String), String>,
    failures: HashMap<String, EnrichmentError>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

struct CallGuard<'a>(&'a AtomicUsize);

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockEnrichmentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `entities` for requests with exactly `text`.
    pub fn with_entities(mut self, text: &str, entities: Vec<Entity>) -> Self {
        self.entities.insert(text.to_string(), entities);
        self
    }

    /// Return `translation` when `text` is translated into `target`.
    pub fn with_translation(mut self, text: &str, target: &str, translation: &str) -> Self {
        self.translations
            .insert((text.to_string(), target.to_string()), translation.to_string());
        self
    }

    /// Fail requests for `text` with a recoverable error.
    pub fn with_failure(mut self, text: &str) -> Self {
        self.failures.insert(
            text.to_string(),
            EnrichmentError::Recoverable(format!("mock failure for {:?}", text)),
        );
        self
    }

    /// Fail requests for `text` with a fatal error.
    pub fn with_fatal(mut self, text: &str) -> Self {
        self.failures.insert(
            text.to_string(),
            EnrichmentError::Fatal("mock credentials rejected".to_string()),
        );
        self
    }

    /// Delay responses for `text`.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Delay every response without a per-text delay.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Highest number of calls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Total calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, text: &str) -> Result<CallGuard<'_>, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = CallGuard(&self.in_flight);

        let delay = self.delays.get(text).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.failures.get(text) {
            Some(error) => Err(error.clone()),
            None => Ok(guard),
        }
    }
}

#[async_trait]
impl EnrichmentClient for MockEnrichmentClient {
    async fn extract_entities(
        &self,
        text: &str,
        _language: &str,
    ) -> Result<Vec<Entity>, EnrichmentError> {
        let _guard = self.enter(text).await?;
        Ok(self.entities.get(text).cloned().unwrap_or_default())
    }

    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, EnrichmentError> {
        let _guard = self.enter(text).await?;
        let key = (text.to_string(), target.to_string());
        Ok(self
            .translations
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target, text)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
