//! # Condense Bedrock Adapter
//!
//! Implements the domain's `InferenceClient` port with Amazon Bedrock's
//! `InvokeModel` API and Anthropic messages bodies.

pub mod infrastructure;
