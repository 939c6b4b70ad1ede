//! Bedrock Inference Client Implementation
//!
//! This module implements the `InferenceClient` trait with Bedrock's
//! `InvokeModel` operation. It encodes prompts as Anthropic messages bodies
//! and classifies AWS errors into the domain's throttled/fatal taxonomy.

use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use condense_domain::{
    ports::InferenceClient,
    summarization::{InferenceError, InferenceParameters},
};
use tracing::{debug, error, info, instrument, warn};

use super::messages_body::{MessagesRequest, MessagesResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Bedrock-based implementation of the InferenceClient port
///
/// ## Error Handling
///
/// `ThrottlingException`, `ServiceUnavailableException` and raw HTTP 429/503
/// responses become `InferenceError::Throttled`. Every other failure,
/// including an undecodable or empty response body, becomes
/// `InferenceError::Fatal`.
#[derive(Clone)]
pub struct BedrockInferenceClient {
    client: Client,
    model_id: String,
}

impl BedrockInferenceClient {
    /// Create a new Bedrock inference client
    ///
    /// # Arguments
    ///
    /// * `client` - Configured Bedrock runtime client
    /// * `model_id` - Model or inference profile identifier
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aws_sdk_bedrockruntime::Client;
    /// use condense_bedrock::infrastructure::BedrockInferenceClient;
    ///
    /// # async fn example() {
    /// let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    /// let client = BedrockInferenceClient::new(
    ///     Client::new(&config),
    ///     "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
    /// );
    /// # }
    /// ```
    pub fn new(client: Client, model_id: String) -> Self {
        info!(model_id = %model_id, "Initializing BedrockInferenceClient");
        Self { client, model_id }
    }

    /// Get the model identifier
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Classify a failed call
///
/// `service_overloaded` is true when the service error is a throttling or
/// service-unavailable exception; `status` is the raw HTTP status, if any.
fn classify(service_overloaded: bool, status: Option<u16>, message: String) -> InferenceError {
    if service_overloaded || matches!(status, Some(429) | Some(503)) {
        InferenceError::Throttled(message)
    } else {
        InferenceError::Fatal(message)
    }
}

impl InferenceClient for BedrockInferenceClient {
    #[instrument(skip(self, prompt, parameters), fields(model_id = %self.model_id, prompt_chars = prompt.len()))]
    fn invoke(
        &self,
        prompt: &str,
        parameters: &InferenceParameters,
    ) -> impl std::future::Future<Output = Result<String, InferenceError>> + Send {
        let client = self.client.clone();
        let model_id = self.model_id.clone();
        let body = MessagesRequest::new(prompt, parameters).to_bytes();

        async move {
            let body = body?;
            debug!(model_id = %model_id, body_size = body.len(), "Invoking Bedrock model");

            match client
                .invoke_model()
                .model_id(&model_id)
                .content_type(JSON_CONTENT_TYPE)
                .accept(JSON_CONTENT_TYPE)
                .body(Blob::new(body))
                .send()
                .await
            {
                Ok(output) => {
                    let response = MessagesResponse::from_bytes(output.body().as_ref())?;
                    if response.stop_reason() == Some("max_tokens") {
                        warn!(model_id = %model_id, "Completion truncated at max_tokens");
                    }
                    let text = response.into_text()?;
                    info!(model_id = %model_id, chars = text.len(), "Bedrock model responded");
                    Ok(text)
                }
                Err(err) => {
                    let service_overloaded = err
                        .as_service_error()
                        .map(|service_err| {
                            service_err.is_throttling_exception()
                                || service_err.is_service_unavailable_exception()
                        })
                        .unwrap_or(false);
                    let status = err.raw_response().map(|response| response.status().as_u16());
                    let classified = classify(
                        service_overloaded,
                        status,
                        format!("Bedrock invoke_model failed for model '{}': {}", model_id, err),
                    );

                    if classified.is_throttled() {
                        warn!(model_id = %model_id, status = ?status, "Bedrock throttled the request");
                    } else {
                        error!(model_id = %model_id, error = ?err, "Bedrock invoke_model failed");
                    }
                    Err(classified)
                }
            }
        }
    }
}
