//! Reduce stage: one inference call over every segment summary

use tracing::{info, instrument};

use super::entity::SegmentSummary;
use super::error::{PipelineStage, SummarizationError};
use super::retry::RetryingSummarizer;
use crate::ports::InferenceClient;

/// Combines ordered segment summaries into the final summary
pub struct Reducer<'a, C> {
    summarizer: &'a RetryingSummarizer<C>,
}

impl<'a, C> Reducer<'a, C>
where
    C: InferenceClient,
{
    /// Create a reducer sharing the summarizer's client and retry policy
    pub fn new(summarizer: &'a RetryingSummarizer<C>) -> Self {
        Self { summarizer }
    }

    /// Produce the final summary
    ///
    /// # Errors
    ///
    /// - `SummarizationError::ReduceFailed` if the call fails fatally or stays throttled
    /// - `SummarizationError::Internal` if `summaries` is empty or not in index order
    #[instrument(skip_all, fields(summaries = summaries.len()))]
    pub async fn reduce(&self, summaries: &[SegmentSummary]) -> Result<String, SummarizationError> {
        if summaries.is_empty() {
            return Err(SummarizationError::internal(
                PipelineStage::Reduce,
                "nothing to reduce",
            ));
        }
        if let Some((position, summary)) = summaries
            .iter()
            .enumerate()
            .find(|(position, summary)| summary.index != *position)
        {
            return Err(SummarizationError::internal(
                PipelineStage::Reduce,
                format!("summary {} found at position {}", summary.index, position),
            ));
        }

        let prompt = self.summarizer.prompts().render_reduce(summaries);
        let final_summary = self
            .summarizer
            .invoke_with_retry(&prompt)
            .await
            .map_err(|failure| SummarizationError::ReduceFailed {
                attempts: failure.attempts,
                source: failure.error,
            })?;

        info!(chars = final_summary.chars().count(), "Final summary ready");
        Ok(final_summary)
    }
}
