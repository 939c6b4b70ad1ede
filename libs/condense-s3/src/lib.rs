//! # Condense S3 Adapter
//!
//! Implements the domain's `DocumentSource` and `ArtifactSink` ports on top of
//! the AWS SDK for S3 (or any S3-compatible store such as MinIO).

pub mod infrastructure;
