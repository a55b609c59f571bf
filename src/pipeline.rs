//! Transcript enrichment pipeline.
//!
//! Composes the flow:
//! transcript → normalize → dispatch to the enrichment service → render

use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::dispatch::{DispatchStats, Dispatcher};
use crate::enrichment::EnrichmentClient;
use crate::error::Result;
use crate::normalize::{NormalizedTranscript, Normalizer};
use crate::render::captions::{CueLayout, render_primary, render_translation};
use crate::render::{CaptionTrack, Document, EntityTable, MediaSource, OutputMode, render_annotated};
use crate::transcript::Transcript;
use std::sync::Arc;

/// Counters from one run, for logging and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fragments: usize,
    pub chunks: usize,
    pub sentences: usize,
    pub dispatch: DispatchStats,
}

/// A rendered document with its run counters.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document: Document,
    pub summary: RunSummary,
}

/// Shared normalizer and dispatcher configuration with a renderer per output mode.
pub struct Pipeline {
    config: Config,
    dictionary: Dictionary,
    client: Arc<dyn EnrichmentClient>,
}

impl Pipeline {
    pub fn new(config: Config, dictionary: Dictionary, client: Arc<dyn EnrichmentClient>) -> Self {
        Self {
            config,
            dictionary,
            client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs only the normalizer.
    pub fn normalize(&self, transcript: &Transcript) -> NormalizedTranscript {
        Normalizer::new(&self.config.normalizer, &self.dictionary).normalize(transcript)
    }

    /// Produces the document for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnrichError::FatalDispatch`] when the enrichment service
    /// fails fatally; no document is produced in that case.
    pub async fn run(&self, transcript: &Transcript, mode: &OutputMode) -> Result<PipelineOutput> {
        let normalized = self.normalize(transcript);
        tracing::info!(
            client = self.client.name(),
            tokens = transcript.tokens.len(),
            fragments = normalized.fragments.len(),
            chunks = normalized.chunks.len(),
            "transcript normalized"
        );

        let output = match mode {
            OutputMode::Annotated { media } => self.annotate(&normalized, media).await?,
            OutputMode::Captions { target_languages } => {
                self.captions(&normalized, target_languages).await?
            }
        };

        let stats = output.summary.dispatch;
        tracing::info!(
            submitted = stats.submitted,
            ready = stats.ready,
            failed = stats.failed,
            peak_in_flight = stats.peak_in_flight,
            "document rendered"
        );
        Ok(output)
    }

    async fn annotate(
        &self,
        normalized: &NormalizedTranscript,
        media: &MediaSource,
    ) -> Result<PipelineOutput> {
        let dispatcher = Dispatcher::from_config(
            &self.config.dispatch,
            self.config.dispatch.entity_concurrency,
        )?;
        let language = self.config.entities.language.clone();
        let client = self.client.clone();

        let dispatched = dispatcher
            .dispatch(normalized.chunks.clone(), |_, text| {
                let client = client.clone();
                let language = language.clone();
                async move { client.extract_entities(&text, &language).await }
            })
            .await?;

        let entities = EntityTable::from_chunks(
            dispatched.payloads().map(Vec::as_slice),
            &self.config.entities,
        );

        let captions = &self.config.captions;
        let mut track_languages = vec![captions.source_language.clone()];
        track_languages.extend(captions.target_languages.iter().cloned());

        let html = render_annotated(
            &normalized.fragments,
            &entities,
            &normalized.metrics,
            media,
            &track_languages,
        );

        Ok(PipelineOutput {
            document: Document::Annotated(html),
            summary: self.summary(normalized, dispatched.stats),
        })
    }

    async fn captions(
        &self,
        normalized: &NormalizedTranscript,
        target_languages: &[String],
    ) -> Result<PipelineOutput> {
        let captions = &self.config.captions;
        let layout = CueLayout::new(captions.line_terms, captions.cue_duration_secs);

        // One job per (language, sentence); all languages share the in-flight cap.
        let translatable: Vec<usize> = normalized
            .sentences
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.chunks.is_empty())
            .map(|(i, _)| i)
            .collect();
        let jobs: Vec<(usize, usize)> = (0..target_languages.len())
            .flat_map(|lang| translatable.iter().map(move |&sentence| (lang, sentence)))
            .collect();
        let texts: Vec<String> = jobs
            .iter()
            .map(|&(_, sentence)| normalized.sentences[sentence].text.clone())
            .collect();

        let dispatcher = Dispatcher::from_config(
            &self.config.dispatch,
            self.config.dispatch.translation_concurrency,
        )?;
        let source = captions.source_language.clone();
        let client = self.client.clone();

        let dispatched = dispatcher
            .dispatch(texts, |id, text| {
                let client = client.clone();
                let source = source.clone();
                let target = jobs
                    .get(id)
                    .and_then(|&(lang, _)| target_languages.get(lang))
                    .cloned()
                    .unwrap_or_default();
                async move { client.translate(&text, &source, &target).await }
            })
            .await?;

        let mut translations = vec![vec![None; normalized.sentences.len()]; target_languages.len()];
        for chunk in &dispatched.chunks {
            if let (Some(&(lang, sentence)), Some(text)) = (jobs.get(chunk.id), chunk.payload()) {
                translations[lang][sentence] = Some(text.clone());
            }
        }

        let mut tracks = vec![CaptionTrack {
            language: captions.source_language.clone(),
            vtt: render_primary(&normalized.fragments, layout),
        }];
        for (language, translated) in target_languages.iter().zip(&translations) {
            tracks.push(CaptionTrack {
                language: language.clone(),
                vtt: render_translation(&normalized.sentences, translated, layout),
            });
        }

        Ok(PipelineOutput {
            document: Document::Captions(tracks),
            summary: self.summary(normalized, dispatched.stats),
        })
    }

    fn summary(&self, normalized: &NormalizedTranscript, dispatch: DispatchStats) -> RunSummary {
        RunSummary {
            fragments: normalized.fragments.len(),
            chunks: normalized.chunks.len(),
            sentences: normalized.sentences.len(),
            dispatch,
        }
    }
}
