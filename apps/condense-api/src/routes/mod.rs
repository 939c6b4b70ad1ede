//! API routes

pub mod summaries;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::summaries::{ErrorResponse, SummarizeRequest, SummarizeResponse},
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::summaries::summarize_handler,
        health_handler
    ),
    components(
        schemas(SummarizeRequest, SummarizeResponse, ErrorResponse)
    ),
    tags(
        (name = "summaries", description = "Document summarization endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Condense API",
        version = "0.1.0",
        description = "Hierarchical summarization of long documents stored in S3",
        contact(
            name = "Condense Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(summaries::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use condense_bedrock::infrastructure::BedrockInferenceClient;
    use condense_domain::summarization::{ArtifactLayout, PipelineConfig, SummarizationService};
    use condense_s3::infrastructure::S3DocumentStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    // Clients are built offline; none of these requests reach AWS.
    fn test_state() -> AppState {
        let s3 = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
                .region(aws_sdk_s3::config::Region::new("us-east-1"))
                .build(),
        );
        let bedrock = aws_sdk_bedrockruntime::Client::from_conf(
            aws_sdk_bedrockruntime::Config::builder()
                .behavior_version(aws_sdk_bedrockruntime::config::BehaviorVersion::latest())
                .region(aws_sdk_bedrockruntime::config::Region::new("us-east-1"))
                .build(),
        );
        let store = S3DocumentStore::new(s3, "condense".to_string());
        let client = BedrockInferenceClient::new(bedrock, "test-model".to_string());

        AppState {
            summarization_service: Arc::new(SummarizationService::new(
                store.clone(),
                store,
                client,
                PipelineConfig::default(),
                ArtifactLayout::default(),
            )),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_blank_key_is_bad_request() {
        let request = Request::post("/summaries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"key":"   "}"#))
            .unwrap();

        let response = create_router(test_state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["stage"], "fetch");
        assert!(json["error"].as_str().unwrap().contains("Invalid document key"));
    }

    #[tokio::test]
    async fn test_openapi_lists_summaries_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/summaries"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
