//! # Condense Domain Layer
//!
//! This crate contains the pure business logic for Condense, a hierarchical
//! document summarizer. It follows hexagonal architecture principles:
//!
//! - **Entities**: Documents, segments and their summaries
//! - **Ports**: Trait definitions for external dependencies (document source,
//!   inference client, artifact sink)
//! - **Services**: The map/reduce summarization pipeline and the per-document
//!   service that wires it to storage
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (AWS, S3, HTTP, etc.).
//! All external dependencies are expressed as traits (ports) that are implemented
//! by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use condense_domain::ports::InferenceClient;
//! use condense_domain::summarization::{Document, DocumentKey, PipelineConfig, SummarizationPipeline};
//!
//! // The pipeline is generic over any InferenceClient implementation
//! async fn example<C: InferenceClient>(client: C) {
//!     let pipeline = SummarizationPipeline::new(client, PipelineConfig::default());
//!     let document = Document::new(DocumentKey::new("documents/report.txt"), "Some text.".to_string());
//!     let summaries = pipeline.run(&document).await.unwrap();
//!     println!("{}", summaries.final_summary);
//! }
//! ```

pub mod ports;
pub mod summarization;

// Re-export commonly used types
pub use ports::{ArtifactSink, DocumentSource, InferenceClient};
pub use summarization::{
    Document, DocumentKey, DocumentSummaries, PipelineConfig, Segment, SegmentSummary,
    SummarizationError, SummarizationPipeline, SummarizationService, SummaryOutcome,
};
