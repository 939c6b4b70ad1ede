//! Anthropic messages request and response bodies, as accepted by Bedrock

use condense_domain::summarization::{InferenceError, InferenceParameters};
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Request body of a single-turn messages call
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// Build a request with one user message
    pub fn new(prompt: &'a str, parameters: &InferenceParameters) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: parameters.max_tokens,
            temperature: parameters.temperature,
            top_p: parameters.top_p,
            top_k: parameters.top_k,
            messages: vec![Message {
                role: "user",
                content: vec![RequestContent {
                    kind: "text",
                    text: prompt,
                }],
            }],
        }
    }

    /// Serialize to the JSON bytes sent as the model body
    pub fn to_bytes(&self) -> Result<Vec<u8>, InferenceError> {
        serde_json::to_vec(self)
            .map_err(|err| InferenceError::fatal(format!("could not encode request body: {}", err)))
    }
}

/// Response body of a messages call
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    content: Vec<ResponseContent>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl MessagesResponse {
    /// Parse the model body
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Fatal` if the body is not a messages response
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        serde_json::from_slice(bytes)
            .map_err(|err| InferenceError::fatal(format!("malformed model response: {}", err)))
    }

    /// Why generation stopped, as reported by the model
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    /// Concatenated text blocks of the response
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Fatal` if the response carries no text
    pub fn into_text(self) -> Result<String, InferenceError> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InferenceError::fatal("model returned an empty completion"));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_carries_parameters() {
        let parameters = InferenceParameters::default();
        let body = MessagesRequest::new("Summarize this.", &parameters)
            .to_bytes()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["top_k"], 250);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][0]["text"], "Summarize this.");
    }

    #[test]
    fn test_response_text_blocks_are_joined() {
        let body = br#"{
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "  First part"},
                {"type": "text", "text": " and second.  "}
            ],
            "stop_reason": "end_turn"
        }"#;

        let response = MessagesResponse::from_bytes(body).unwrap();
        assert_eq!(response.stop_reason(), Some("end_turn"));
        assert_eq!(response.into_text().unwrap(), "First part and second.");
    }

    #[test]
    fn test_empty_completion_is_fatal() {
        let response = MessagesResponse::from_bytes(br#"{"content": []}"#).unwrap();

        let err = response.into_text().unwrap_err();
        assert!(!err.is_throttled());
    }

    #[test]
    fn test_malformed_response_is_fatal() {
        let err = MessagesResponse::from_bytes(b"<html>").unwrap_err();
        assert!(matches!(err, InferenceError::Fatal(_)));
    }
}
