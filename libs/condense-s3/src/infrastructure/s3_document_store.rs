//! S3 Document Store Implementation
//!
//! This module implements the `DocumentSource` and `ArtifactSink` traits using
//! AWS S3 as the backend. It handles all S3 operations and converts AWS errors
//! to domain errors.

use aws_sdk_s3::{primitives::ByteStream, Client};
use bytes::Bytes;
use condense_domain::{
    ports::{ArtifactSink, DocumentSource},
    summarization::{DocumentKey, StorageError},
};
use tracing::{debug, error, info, instrument, warn};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// S3-based implementation of the document source and artifact sink ports
///
/// Source documents and output artifacts live in the same bucket, in
/// different key namespaces (e.g. `documents/` and `summaries/`).
///
/// ## Configuration
///
/// The store requires:
/// - An S3 bucket name
/// - An AWS SDK S3 Client (configured with region, credentials, endpoint)
///
/// ## Error Handling
///
/// A missing object becomes `StorageError::NotFound`, a body that is not UTF-8
/// text becomes `StorageError::Extraction`, every other AWS SDK error becomes
/// `StorageError::Backend` with a descriptive message.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
}

impl S3DocumentStore {
    /// Create a new S3 document store
    ///
    /// # Arguments
    ///
    /// * `client` - Configured AWS S3 client
    /// * `bucket` - Name of the S3 bucket to use
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aws_sdk_s3::Client;
    /// use condense_s3::infrastructure::S3DocumentStore;
    ///
    /// # async fn example() {
    /// let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    /// let s3_client = Client::new(&config);
    /// let store = S3DocumentStore::new(s3_client, "my-bucket".to_string());
    /// # }
    /// ```
    pub fn new(client: Client, bucket: String) -> Self {
        info!(bucket = %bucket, "Initializing S3DocumentStore");
        Self { client, bucket }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public location of an object in this bucket
    fn location(bucket: &str, key: &str) -> String {
        format!("s3://{}/{}", bucket, key)
    }
}

/// Decode an object body as UTF-8 text, dropping a leading byte order mark
fn decode_text(key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
    let text = String::from_utf8(bytes).map_err(|err| {
        StorageError::Extraction(format!(
            "object '{}' is not UTF-8 text (invalid byte at {})",
            key,
            err.utf8_error().valid_up_to()
        ))
    })?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

impl DocumentSource for S3DocumentStore {
    #[instrument(skip(self), fields(key = %key))]
    fn fetch_text(
        &self,
        key: &DocumentKey,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = key.as_str().to_string();

        async move {
            debug!(key = %key, bucket = %bucket, "Retrieving document from S3");

            match client.get_object().bucket(&bucket).key(&key).send().await {
                Ok(output) => match output.body.collect().await {
                    Ok(data) => {
                        let bytes = data.into_bytes().to_vec();
                        info!(key = %key, size = bytes.len(), "Successfully retrieved document from S3");
                        decode_text(&key, bytes)
                    }
                    Err(err) => {
                        error!(key = %key, error = ?err, "Failed to read S3 object body");
                        Err(StorageError::Backend(format!(
                            "Failed to read S3 object body for key '{}': {}",
                            key, err
                        )))
                    }
                },
                Err(err) => {
                    let missing = err
                        .as_service_error()
                        .map(|service_err| service_err.is_no_such_key())
                        .unwrap_or(false);

                    if missing {
                        warn!(key = %key, "Document does not exist in S3");
                        Err(StorageError::NotFound(Self::location(&bucket, &key)))
                    } else {
                        error!(key = %key, error = ?err, "Failed to retrieve document from S3");
                        Err(StorageError::Backend(format!(
                            "S3 get_object failed for key '{}': {}",
                            key, err
                        )))
                    }
                }
            }
        }
    }
}

impl ArtifactSink for S3DocumentStore {
    #[instrument(skip(self, contents), fields(key = %key, size = contents.len()))]
    fn store(
        &self,
        key: &str,
        contents: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = key.to_string();
        let data = Bytes::copy_from_slice(contents.as_bytes());

        async move {
            debug!(key = %key, bucket = %bucket, "Saving artifact to S3");

            let body = ByteStream::from(data);

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .content_type(TEXT_CONTENT_TYPE)
                .body(body)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Successfully saved artifact to S3");
                    Ok(Self::location(&bucket, &key))
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to save artifact to S3");
                    Err(StorageError::Backend(format!(
                        "S3 put_object failed for key '{}': {}",
                        key, err
                    )))
                }
            }
        }
    }

    #[instrument(skip(self), fields(key = %key))]
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = key.to_string();

        async move {
            debug!(key = %key, bucket = %bucket, "Deleting artifact from S3");

            match client
                .delete_object()
                .bucket(&bucket)
                .key(&key)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Successfully deleted artifact from S3");
                    Ok(())
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to delete artifact from S3");
                    Err(StorageError::Backend(format!(
                        "S3 delete_object failed for key '{}': {}",
                        key, err
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_format() {
        assert_eq!(
            S3DocumentStore::location("condense", "summaries/a.txt"),
            "s3://condense/summaries/a.txt"
        );
    }

    #[test]
    fn test_decode_text_strips_bom() {
        let mut bytes = "\u{feff}Hello.".as_bytes().to_vec();
        assert_eq!(decode_text("a", bytes.clone()).unwrap(), "Hello.");

        bytes.drain(..3);
        assert_eq!(decode_text("a", bytes).unwrap(), "Hello.");
    }

    #[test]
    fn test_decode_text_rejects_binary() {
        let err = decode_text("documents/a.pdf", vec![b'%', b'P', 0xff, 0xfe]).unwrap_err();

        assert!(matches!(err, StorageError::Extraction(_)));
        assert!(err.to_string().contains("invalid byte at 2"));
    }
}
