//! Summarization handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use condense_domain::summarization::{FailureKind, SummaryOutcome};
use tracing::{info, warn};

use crate::{
    dto::summaries::{ErrorResponse, SummarizeReply, SummarizeRequest, SummarizeResponse},
    AppState,
};

/// Handle summarization requests
///
/// The request stays open for the whole run: segments are summarized one
/// after the other with pacing delays, so large documents take minutes.
#[utoipa::path(
    post,
    path = "/summaries",
    request_body = SummarizeRequest,
    responses(
        (status = 201, description = "Both summaries written", body = SummarizeResponse),
        (status = 400, description = "Bad request - unusable document key", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 422, description = "Document has no extractable text", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 502, description = "Storage or inference backend failed", body = ErrorResponse),
        (status = 503, description = "Inference service kept throttling", body = ErrorResponse)
    ),
    tag = "summaries"
)]
pub async fn summarize_handler(
    State(state): State<AppState>,
    Json(payload): Json<SummarizeRequest>,
) -> impl IntoResponse {
    info!(key = %payload.key, "Received summarize request");

    let outcome = state.summarization_service.process(&payload.key).await;
    let status = status_for(&outcome);

    match SummarizeReply::from(outcome) {
        SummarizeReply::Succeeded(body) => {
            info!(run_id = %body.run_id, segments = body.segment_count, "Summaries written");
            (status, Json(body)).into_response()
        }
        SummarizeReply::Failed(body) => {
            warn!(run_id = %body.run_id, status = status.as_u16(), "Summarization failed");
            (status, Json(body)).into_response()
        }
    }
}

/// HTTP status reported for an outcome
pub(crate) fn status_for(outcome: &SummaryOutcome) -> StatusCode {
    match outcome {
        SummaryOutcome::Succeeded { .. } => StatusCode::CREATED,
        SummaryOutcome::Failed { kind, .. } => match kind {
            FailureKind::InvalidRequest => StatusCode::BAD_REQUEST,
            FailureKind::DocumentNotFound => StatusCode::NOT_FOUND,
            FailureKind::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::Throttled => StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::SourceUnavailable
            | FailureKind::InferenceFailed
            | FailureKind::StorageFailed => StatusCode::BAD_GATEWAY,
            FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use condense_domain::summarization::{PipelineStage, RunId};

    fn failed(kind: FailureKind) -> SummaryOutcome {
        SummaryOutcome::Failed {
            run_id: RunId::new(),
            document_key: "documents/a.pdf".to_string(),
            stage: PipelineStage::Segment,
            kind,
            segment_index: Some(0),
            error: "boom".to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_success_is_created() {
        let outcome = SummaryOutcome::Succeeded {
            run_id: RunId::new(),
            document_key: "documents/a.pdf".to_string(),
            final_summary_location: "s3://b/summaries/a.txt".to_string(),
            detailed_summary_location: "s3://b/summaries-detailed/a.txt".to_string(),
            segment_count: 1,
            completed_at: Utc::now(),
        };

        assert_eq!(status_for(&outcome), StatusCode::CREATED);
    }

    #[test]
    fn test_failure_statuses() {
        assert_eq!(status_for(&failed(FailureKind::InvalidRequest)), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&failed(FailureKind::DocumentNotFound)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&failed(FailureKind::EmptyDocument)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&failed(FailureKind::Throttled)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_for(&failed(FailureKind::InferenceFailed)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&failed(FailureKind::Internal)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_failed_reply_carries_stage_and_index() {
        match SummarizeReply::from(failed(FailureKind::Throttled)) {
            SummarizeReply::Failed(body) => {
                assert_eq!(body.stage, "segment");
                assert_eq!(body.segment_index, Some(0));
                assert_eq!(body.error, "boom");
            }
            SummarizeReply::Succeeded(_) => panic!("expected a failure body"),
        }
    }
}
