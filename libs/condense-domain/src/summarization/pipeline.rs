//! Pipeline driver - map then reduce
//!
//! Composes the chunker, the sequential orchestrator and the reducer into
//! one run over a document and formats the two output texts. The driver
//! never retries or swallows a stage failure; the first error ends the run.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use super::chunker::Chunker;
use super::config::PipelineConfig;
use super::entity::{Document, DocumentSummaries, SegmentSummary};
use super::error::SummarizationError;
use super::orchestrator::SequentialOrchestrator;
use super::reducer::Reducer;
use super::retry::RetryingSummarizer;
use crate::ports::InferenceClient;

/// Delimiter line between two segment summaries in the detailed summary
pub const DETAILED_SECTION_DELIMITER: &str = "\n\n=== NEW SECTION ===\n\n";

/// Hierarchical summarization of one document at a time
///
/// ## Static Dispatch
///
/// The pipeline is generic over any `InferenceClient` implementation, so a
/// test double and the production adapter share the same code path.
pub struct SummarizationPipeline<C> {
    chunker: Chunker,
    summarizer: RetryingSummarizer<C>,
    pacing_delay: Duration,
}

impl<C> SummarizationPipeline<C>
where
    C: InferenceClient,
{
    /// Create a pipeline with the given client and configuration
    pub fn new(client: C, config: PipelineConfig) -> Self {
        let PipelineConfig {
            chunker,
            retry,
            pacing_delay,
            inference,
            prompts,
        } = config;

        Self {
            chunker: Chunker::new(chunker),
            summarizer: RetryingSummarizer::new(client, retry, inference, prompts),
            pacing_delay,
        }
    }

    /// Create a pipeline with default configuration
    pub fn with_client(client: C) -> Self {
        Self::new(client, PipelineConfig::default())
    }

    /// Get the chunker
    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Summarize a document
    ///
    /// 1. Split the text into segments
    /// 2. Summarize every segment in order, pacing between them
    /// 3. Pace once more, then reduce the summaries into the final summary
    /// 4. Join the segment summaries into the detailed summary
    ///
    /// # Errors
    ///
    /// - `SummarizationError::EmptyDocument` if the text is blank
    /// - `SummarizationError::SegmentFailed` for the first segment that failed
    /// - `SummarizationError::ReduceFailed` if the final call failed
    #[instrument(skip_all, fields(key = %document.key(), chars = document.char_len()))]
    pub async fn run(&self, document: &Document) -> Result<DocumentSummaries, SummarizationError> {
        if document.is_empty() {
            return Err(SummarizationError::EmptyDocument {
                key: document.key().to_string(),
            });
        }

        let segments = self.chunker.split(document.text());
        let segment_count = segments.len();
        info!(segments = segment_count, "Document split");

        let summaries = SequentialOrchestrator::new(&self.summarizer, self.pacing_delay)
            .process_all(segments)
            .await?;

        debug!(delay_ms = self.pacing_delay.as_millis() as u64, "Pacing before reduce");
        sleep(self.pacing_delay).await;

        let final_summary = Reducer::new(&self.summarizer).reduce(&summaries).await?;

        Ok(DocumentSummaries {
            final_summary,
            detailed_summary: join_detailed(&summaries),
            segment_count,
        })
    }
}

fn join_detailed(summaries: &[SegmentSummary]) -> String {
    summaries
        .iter()
        .map(|summary| summary.text.as_str())
        .collect::<Vec<_>>()
        .join(DETAILED_SECTION_DELIMITER)
}
