//! Domain errors for summarization runs
//!
//! This module defines all possible errors that can occur while summarizing a
//! document. These are domain-level errors that abstract away infrastructure
//! details (no AWS SDK error types here).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified failure of a single inference call
///
/// Adapters decide the class; the retrying summarizer only reads it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// The service signaled overload or rate limiting; retryable
    #[error("Inference throttled: {0}")]
    Throttled(String),

    /// Any other failure, including malformed responses; not retried
    #[error("Inference failed: {0}")]
    Fatal(String),
}

impl InferenceError {
    /// Create a throttled error with a message
    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    /// Create a fatal error with a message
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    /// Whether the failure may be retried
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled(_))
    }
}

/// Failure of the document source or artifact sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The object exists but no text could be extracted from it
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Any other backend failure
    #[error("Storage operation failed: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create a backend failure error with a message
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Stage of a run at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Configuration,
    Fetch,
    Segment,
    Reduce,
    Store,
}

impl PipelineStage {
    /// Stable lowercase name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Fetch => "fetch",
            Self::Segment => "segment",
            Self::Reduce => "reduce",
            Self::Store => "store",
        }
    }
}

/// Coarse failure class reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidRequest,
    EmptyDocument,
    DocumentNotFound,
    SourceUnavailable,
    Throttled,
    InferenceFailed,
    StorageFailed,
    Internal,
}

/// Errors that can abort a summarization run
///
/// Every variant aborts the whole run; there is no partial-success mode.
#[derive(Error, Debug)]
pub enum SummarizationError {
    /// The caller supplied an unusable document key
    #[error("Invalid document key: {0}")]
    InvalidDocumentKey(String),

    /// The document has no extractable text
    #[error("Document '{key}' contains no extractable text")]
    EmptyDocument { key: String },

    /// The document could not be fetched or extracted
    #[error("Failed to retrieve document: {0}")]
    DocumentSource(#[source] StorageError),

    /// A segment could not be summarized
    #[error(
        "Summarizing segment {position}/{total} failed after {attempts} attempt(s): {source}",
        position = .index + 1
    )]
    SegmentFailed {
        index: usize,
        total: usize,
        attempts: u32,
        #[source]
        source: InferenceError,
    },

    /// The reduce call failed
    #[error("Final summary failed after {attempts} attempt(s): {source}")]
    ReduceFailed {
        attempts: u32,
        #[source]
        source: InferenceError,
    },

    /// An output artifact could not be written
    #[error("Failed to store artifact: {0}")]
    ArtifactSink(#[source] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// An internal invariant was violated
    #[error("Internal error during {}: {message}", .stage.as_str())]
    Internal {
        stage: PipelineStage,
        message: String,
    },
}

impl SummarizationError {
    /// Create a config error with a message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an internal error raised at `stage`
    pub fn internal(stage: PipelineStage, msg: impl Into<String>) -> Self {
        Self::Internal {
            stage,
            message: msg.into(),
        }
    }

    /// Stage of the run the error belongs to
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::InvalidConfig(_) => PipelineStage::Configuration,
            Self::InvalidDocumentKey(_) | Self::EmptyDocument { .. } | Self::DocumentSource(_) => {
                PipelineStage::Fetch
            }
            Self::SegmentFailed { .. } => PipelineStage::Segment,
            Self::Internal { stage, .. } => *stage,
            Self::ReduceFailed { .. } => PipelineStage::Reduce,
            Self::ArtifactSink(_) => PipelineStage::Store,
        }
    }

    /// Index of the failing segment, if the failure belongs to one
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::SegmentFailed { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Failure class reported to callers
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidDocumentKey(_) => FailureKind::InvalidRequest,
            Self::EmptyDocument { .. } => FailureKind::EmptyDocument,
            Self::DocumentSource(StorageError::NotFound(_)) => FailureKind::DocumentNotFound,
            Self::DocumentSource(StorageError::Extraction(_)) => FailureKind::EmptyDocument,
            Self::DocumentSource(StorageError::Backend(_)) => FailureKind::SourceUnavailable,
            Self::SegmentFailed { source, .. } | Self::ReduceFailed { source, .. } => {
                if source.is_throttled() {
                    FailureKind::Throttled
                } else {
                    FailureKind::InferenceFailed
                }
            }
            Self::ArtifactSink(_) => FailureKind::StorageFailed,
            Self::InvalidConfig(_) | Self::Internal { .. } => FailureKind::Internal,
        }
    }
}

/// Result type alias for summarization operations
pub type Result<T> = std::result::Result<T, SummarizationError>;
