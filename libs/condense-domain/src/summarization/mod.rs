//! Summarization domain module
//!
//! This module contains the map/reduce summarization pipeline: the chunker
//! that cuts a document into segments, the retrying summarizer that turns one
//! segment into one summary, the sequential orchestrator that drives every
//! segment in order, the reducer that merges the summaries, and the services
//! that compose them.

mod chunker;
mod config;
mod entity;
mod error;
mod ids;
mod orchestrator;
mod pipeline;
mod prompt;
mod reducer;
mod retry;
mod service;

pub use chunker::Chunker;
pub use config::{ArtifactLayout, ChunkerConfig, InferenceParameters, PipelineConfig, RetryPolicy};
pub use entity::{Document, DocumentSummaries, Segment, SegmentSummary};
pub use error::{
    FailureKind, InferenceError, PipelineStage, Result, StorageError, SummarizationError,
};
pub use ids::{DocumentKey, RunId};
pub use orchestrator::SequentialOrchestrator;
pub use pipeline::{SummarizationPipeline, DETAILED_SECTION_DELIMITER};
pub use prompt::{PromptTemplate, REDUCE_SECTION_DELIMITER};
pub use reducer::Reducer;
pub use retry::{CallFailure, RetryState, RetryingSummarizer};
pub use service::{StoredSummaries, SummarizationService, SummaryOutcome};
