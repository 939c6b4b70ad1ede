//! Sequential orchestrator
//!
//! Drives segments through the retrying summarizer one at a time. Segments
//! wait in an ordered queue; the head is only taken once the previous
//! segment has a result, so summaries come out in index order and the first
//! unrecoverable failure stops the queue.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

use super::entity::{Segment, SegmentSummary};
use super::error::{PipelineStage, SummarizationError};
use super::retry::RetryingSummarizer;
use crate::ports::InferenceClient;

/// Runs the map stage of the pipeline
pub struct SequentialOrchestrator<'a, C> {
    summarizer: &'a RetryingSummarizer<C>,
    pacing_delay: Duration,
}

impl<'a, C> SequentialOrchestrator<'a, C>
where
    C: InferenceClient,
{
    /// Create an orchestrator that waits `pacing_delay` between two segments
    pub fn new(summarizer: &'a RetryingSummarizer<C>, pacing_delay: Duration) -> Self {
        Self {
            summarizer,
            pacing_delay,
        }
    }

    /// Summarize every segment, in order
    ///
    /// `segments` must be the output of the chunker: indices `0..n` in order.
    /// The pacing delay separates two segment completions and is not applied
    /// after the last one.
    ///
    /// # Errors
    ///
    /// - The first `SummarizationError::SegmentFailed`; later segments are never attempted
    /// - `SummarizationError::Internal` if a segment is out of order
    #[instrument(skip_all, fields(segments = segments.len()))]
    pub async fn process_all(
        &self,
        segments: Vec<Segment>,
    ) -> Result<Vec<SegmentSummary>, SummarizationError> {
        let mut pending: VecDeque<Segment> = segments.into();
        let mut completed: Vec<SegmentSummary> = Vec::with_capacity(pending.len());

        while let Some(segment) = pending.pop_front() {
            if segment.index() != completed.len() {
                return Err(SummarizationError::internal(
                    PipelineStage::Segment,
                    format!(
                        "segment {} reached the queue head where {} was expected",
                        segment.index(),
                        completed.len()
                    ),
                ));
            }

            let summary = match self.summarizer.summarize(&segment).await {
                Ok(summary) => summary,
                Err(err) => {
                    error!(
                        index = segment.index(),
                        skipped = pending.len(),
                        error = %err,
                        "Aborting run, segment could not be summarized"
                    );
                    return Err(err);
                }
            };

            info!(
                index = summary.index,
                remaining = pending.len(),
                "Segment summary ready"
            );
            completed.push(summary);

            if !pending.is_empty() {
                debug!(delay_ms = self.pacing_delay.as_millis() as u64, "Pacing before next segment");
                sleep(self.pacing_delay).await;
            }
        }

        Ok(completed)
    }
}
