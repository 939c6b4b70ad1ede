//! Infrastructure adapters backed by S3

mod s3_document_store;

pub use s3_document_store::S3DocumentStore;
