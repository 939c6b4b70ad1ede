//! Infrastructure adapters backed by Amazon Bedrock

mod bedrock_inference_client;
mod messages_body;

pub use bedrock_inference_client::BedrockInferenceClient;
pub use messages_body::{MessagesRequest, MessagesResponse};
