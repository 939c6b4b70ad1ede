//! Retrying summarizer
//!
//! Wraps single inference calls with the throttling backoff schedule. This is
//! the only place in the pipeline that waits because of a failure: a
//! throttled call is retried after `base_delay * n` for retry `n`, every other
//! failure is returned as is.

use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::config::{InferenceParameters, RetryPolicy};
use super::entity::{Segment, SegmentSummary};
use super::error::{InferenceError, SummarizationError};
use super::prompt::PromptTemplate;
use crate::ports::InferenceClient;

/// Progress of one retried call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Attempts made so far
    pub attempt_count: u32,
    /// Error of the latest failed attempt
    pub last_error: Option<InferenceError>,
}

/// A call that did not produce text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    /// Attempts made, the first one included
    pub attempts: u32,
    /// Error of the last attempt, unchanged
    pub error: InferenceError,
}

/// Summarizes segments through an inference client, retrying throttled calls
pub struct RetryingSummarizer<C> {
    client: C,
    policy: RetryPolicy,
    parameters: InferenceParameters,
    prompts: PromptTemplate,
}

impl<C> RetryingSummarizer<C>
where
    C: InferenceClient,
{
    /// Create a summarizer
    pub fn new(
        client: C,
        policy: RetryPolicy,
        parameters: InferenceParameters,
        prompts: PromptTemplate,
    ) -> Self {
        Self {
            client,
            policy,
            parameters,
            prompts,
        }
    }

    /// Get the inference client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the prompt templates
    pub fn prompts(&self) -> &PromptTemplate {
        &self.prompts
    }

    /// Summarize one segment
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::SegmentFailed` carrying the segment index,
    /// the number of attempts and the unmodified inference error.
    #[instrument(
        skip(self, segment),
        fields(index = segment.index(), total = segment.total_segments(), chars = segment.char_len())
    )]
    pub async fn summarize(&self, segment: &Segment) -> Result<SegmentSummary, SummarizationError> {
        let prompt = self.prompts.render_segment(segment);

        match self.invoke_with_retry(&prompt).await {
            Ok(text) => {
                debug!(summary_chars = text.chars().count(), "Segment summarized");
                Ok(SegmentSummary {
                    index: segment.index(),
                    text,
                })
            }
            Err(failure) => Err(SummarizationError::SegmentFailed {
                index: segment.index(),
                total: segment.total_segments(),
                attempts: failure.attempts,
                source: failure.error,
            }),
        }
    }

    /// Invoke the client until it succeeds, fails fatally or runs out of retries
    ///
    /// A bounded loop: at most `policy.max_attempts()` calls are made and the
    /// wait before retry `n` is `policy.delay_for(n)`.
    pub async fn invoke_with_retry(&self, prompt: &str) -> Result<String, CallFailure> {
        let mut state = RetryState::default();

        loop {
            state.attempt_count += 1;

            match self.client.invoke(prompt, &self.parameters).await {
                Ok(text) => {
                    if let Some(previous) = &state.last_error {
                        info!(
                            attempts = state.attempt_count,
                            recovered_from = %previous,
                            "Inference succeeded after retry"
                        );
                    }
                    return Ok(text);
                }
                Err(error) => {
                    if !error.is_throttled() {
                        warn!(attempt = state.attempt_count, error = %error, "Inference failed, not retrying");
                        return Err(CallFailure {
                            attempts: state.attempt_count,
                            error,
                        });
                    }

                    if state.attempt_count >= self.policy.max_attempts() {
                        warn!(
                            attempts = state.attempt_count,
                            error = %error,
                            "Inference still throttled, retries exhausted"
                        );
                        return Err(CallFailure {
                            attempts: state.attempt_count,
                            error,
                        });
                    }

                    let delay = self.policy.delay_for(state.attempt_count);
                    warn!(
                        attempt = state.attempt_count,
                        delay_ms = delay.as_millis() as u64,
                        "Inference throttled, backing off"
                    );
                    state.last_error = Some(error);
                    sleep(delay).await;
                }
            }
        }
    }
}
