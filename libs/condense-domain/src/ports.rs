//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that external adapters must implement.
//! Following hexagonal architecture, the domain defines what it needs, and the
//! infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to ensure zero-cost abstractions and static dispatch.

use std::future::Future;

use crate::summarization::{DocumentKey, InferenceError, InferenceParameters, StorageError};

/// Port for retrieving the text of a source document
///
/// Implementations fetch the document identified by `key` and return its
/// extracted plain text. Binary formats are expected to be converted before
/// the text reaches the domain.
///
/// # Errors
///
/// Any failure is fatal for the run: the pipeline never retries a fetch.
pub trait DocumentSource: Send + Sync {
    /// Fetch the plain text of a document
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` if no object exists for the key
    /// - `StorageError::Extraction` if the object is not readable as text
    /// - `StorageError::Backend` for any other backend failure
    fn fetch_text(
        &self,
        key: &DocumentKey,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Port for the external text-generation service
///
/// Implementations must classify every failure: overload and rate-limit
/// signals become `InferenceError::Throttled`, everything else (including a
/// response that cannot be decoded) becomes `InferenceError::Fatal`.
///
/// Implementations must be stateless across calls; the same handle is reused
/// sequentially for every segment of a document.
pub trait InferenceClient: Send + Sync {
    /// Generate text for a prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - The fully rendered prompt
    /// * `parameters` - Output bound and sampling parameters
    ///
    /// # Returns
    ///
    /// The generated text
    fn invoke(
        &self,
        prompt: &str,
        parameters: &InferenceParameters,
    ) -> impl Future<Output = Result<String, InferenceError>> + Send;
}

/// Port for persisting output artifacts
///
/// The domain derives artifact keys from the document key and hands the
/// finished text to the sink. The sink must not be called for a run that
/// failed.
pub trait ArtifactSink: Send + Sync {
    /// Store a plain-text artifact
    ///
    /// # Arguments
    ///
    /// * `key` - Destination key derived from the document key
    /// * `contents` - UTF-8 text to store
    ///
    /// # Returns
    ///
    /// The location the artifact was written to (e.g., "s3://bucket/summaries/a.txt")
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the write fails
    fn store(
        &self,
        key: &str,
        contents: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Remove an artifact written earlier in the same run
    ///
    /// Used to withdraw the first artifact when the second one cannot be
    /// written. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if deletion fails
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
