//! Token stream normalization.
//!
//! A single left-to-right pass over the recognized tokens that applies
//! dictionary corrections, classifies confidence, segments the stream into
//! fragments on speaker changes and pauses, and collects the size-bounded
//! chunks and sentences that are later sent for enrichment.

pub mod chunker;
pub mod fragment;
pub mod metrics;
pub mod normalizer;
pub mod sentence;

pub use chunker::ChunkBuilder;
pub use fragment::{BoundaryMarker, BoundaryReason, Fragment, Term};
pub use metrics::{MetricsBucket, MetricsSummary, MetricsTable};
pub use normalizer::{NormalizedTranscript, Normalizer};
pub use sentence::{Sentence, SentenceChunk, SentenceCollector};
