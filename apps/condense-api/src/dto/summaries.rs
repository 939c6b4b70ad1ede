//! DTOs for summarization endpoints

use condense_domain::summarization::SummaryOutcome;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the summarization endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    /// Key of the source document in the configured bucket
    #[schema(example = "documents/annual-report.pdf")]
    pub key: String,
}

/// Response body for a successful run
#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeResponse {
    /// Identifier of the run, as found in the logs
    #[schema(example = "01927b3e-8f6a-7c4d-9a51-3f2b8d0e6c11")]
    pub run_id: String,
    /// Location of the final summary artifact
    #[schema(example = "s3://condense/summaries/annual-report.txt")]
    pub final_summary_location: String,
    /// Location of the segment-by-segment summary artifact
    #[schema(example = "s3://condense/summaries-detailed/annual-report.txt")]
    pub detailed_summary_location: String,
    /// Number of segments the document was cut into
    #[schema(example = 3)]
    pub segment_count: usize,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Identifier of the failed run
    pub run_id: String,
    /// Stage the run failed at
    #[schema(example = "segment")]
    pub stage: String,
    /// Index of the failing segment, for segment failures
    pub segment_index: Option<usize>,
    /// Error description
    #[schema(example = "Summarizing segment 2/3 failed after 4 attempt(s): Inference throttled")]
    pub error: String,
}

/// Either body, depending on how the run ended
pub enum SummarizeReply {
    Succeeded(SummarizeResponse),
    Failed(ErrorResponse),
}

impl From<SummaryOutcome> for SummarizeReply {
    fn from(outcome: SummaryOutcome) -> Self {
        match outcome {
            SummaryOutcome::Succeeded {
                run_id,
                final_summary_location,
                detailed_summary_location,
                segment_count,
                ..
            } => Self::Succeeded(SummarizeResponse {
                run_id: run_id.to_string(),
                final_summary_location,
                detailed_summary_location,
                segment_count,
            }),
            SummaryOutcome::Failed {
                run_id,
                stage,
                segment_index,
                error,
                ..
            } => Self::Failed(ErrorResponse {
                run_id: run_id.to_string(),
                stage: stage.as_str().to_string(),
                segment_index,
                error,
            }),
        }
    }
}
