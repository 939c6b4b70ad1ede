//! Summarization service - per-document orchestration
//!
//! This module is the single entry point of the domain. The service
//! coordinates the document source, the pipeline and the artifact sink for
//! one document key and reports a structured outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::config::{ArtifactLayout, PipelineConfig};
use super::entity::Document;
use super::error::{FailureKind, PipelineStage, SummarizationError};
use super::ids::{DocumentKey, RunId};
use super::pipeline::SummarizationPipeline;
use crate::ports::{ArtifactSink, DocumentSource, InferenceClient};

/// Result of one invocation of the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// Both artifacts were written
    Succeeded {
        run_id: RunId,
        document_key: String,
        final_summary_location: String,
        detailed_summary_location: String,
        segment_count: usize,
        completed_at: DateTime<Utc>,
    },
    /// The run aborted; nothing was left in the artifact store
    Failed {
        run_id: RunId,
        document_key: String,
        stage: PipelineStage,
        kind: FailureKind,
        segment_index: Option<usize>,
        error: String,
        completed_at: DateTime<Utc>,
    },
}

impl SummaryOutcome {
    /// Whether the run succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Get the run identifier
    pub fn run_id(&self) -> RunId {
        match self {
            Self::Succeeded { run_id, .. } | Self::Failed { run_id, .. } => *run_id,
        }
    }

    fn failed(run_id: RunId, document_key: &str, err: &SummarizationError) -> Self {
        Self::Failed {
            run_id,
            document_key: document_key.to_string(),
            stage: err.stage(),
            kind: err.kind(),
            segment_index: err.segment_index(),
            error: err.to_string(),
            completed_at: Utc::now(),
        }
    }
}

/// Locations of the artifacts of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSummaries {
    pub final_summary_location: String,
    pub detailed_summary_location: String,
    pub segment_count: usize,
}

/// Service summarizing stored documents
///
/// This service encapsulates the rules around a pipeline run:
/// - Rejects unusable keys and documents without text
/// - Runs the pipeline through the injected inference client
/// - Writes both artifacts only once both summaries exist
/// - Withdraws the first artifact if the second cannot be written
///
/// ## Static Dispatch
///
/// The service is generic over its three ports. The compiler generates a
/// specialized version per adapter combination.
pub struct SummarizationService<S, K, C> {
    source: S,
    sink: K,
    pipeline: SummarizationPipeline<C>,
    layout: ArtifactLayout,
}

impl<S, K, C> SummarizationService<S, K, C>
where
    S: DocumentSource,
    K: ArtifactSink,
    C: InferenceClient,
{
    /// Create a new SummarizationService
    pub fn new(
        source: S,
        sink: K,
        client: C,
        config: PipelineConfig,
        layout: ArtifactLayout,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline: SummarizationPipeline::new(client, config),
            layout,
        }
    }

    /// Get the artifact layout
    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Summarize the document stored under `raw_key` and report the outcome
    ///
    /// This is the invocation surface of the domain: it never returns an
    /// error, every failure is folded into `SummaryOutcome::Failed`.
    pub async fn process(&self, raw_key: &str) -> SummaryOutcome {
        let run_id = RunId::new();

        let result = match DocumentKey::parse(raw_key) {
            Ok(key) => self.summarize_document(run_id, &key).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(stored) => SummaryOutcome::Succeeded {
                run_id,
                document_key: raw_key.trim().to_string(),
                final_summary_location: stored.final_summary_location,
                detailed_summary_location: stored.detailed_summary_location,
                segment_count: stored.segment_count,
                completed_at: Utc::now(),
            },
            Err(err) => {
                error!(
                    run_id = %run_id,
                    key = raw_key,
                    stage = ?err.stage(),
                    segment_index = ?err.segment_index(),
                    error = %err,
                    "Summarization run failed"
                );
                SummaryOutcome::failed(run_id, raw_key.trim(), &err)
            }
        }
    }

    /// Fetch, summarize and store one document
    ///
    /// # Errors
    ///
    /// - `SummarizationError::InvalidDocumentKey` if the key is inside an artifact namespace
    /// - `SummarizationError::DocumentSource` if the document cannot be fetched
    /// - `SummarizationError::EmptyDocument` if it has no text
    /// - Any pipeline error, unchanged
    /// - `SummarizationError::ArtifactSink` if an artifact cannot be written
    #[instrument(skip_all, fields(run_id = %run_id, key = %key))]
    pub async fn summarize_document(
        &self,
        run_id: RunId,
        key: &DocumentKey,
    ) -> Result<StoredSummaries, SummarizationError> {
        self.layout.ensure_source_key(key)?;

        let text = self
            .source
            .fetch_text(key)
            .await
            .map_err(SummarizationError::DocumentSource)?;
        let document = Document::new(key.clone(), text);

        let summaries = self.pipeline.run(&document).await?;

        let detailed_key = key.artifact_key(&self.layout.detailed_prefix);
        let final_key = key.artifact_key(&self.layout.final_prefix);

        let detailed_summary_location = self
            .sink
            .store(&detailed_key, &summaries.detailed_summary)
            .await
            .map_err(SummarizationError::ArtifactSink)?;

        let final_summary_location = match self.sink.store(&final_key, &summaries.final_summary).await {
            Ok(location) => location,
            Err(err) => {
                if let Err(cleanup) = self.sink.remove(&detailed_key).await {
                    warn!(key = %detailed_key, error = %cleanup, "Could not withdraw detailed summary");
                }
                return Err(SummarizationError::ArtifactSink(err));
            }
        };

        info!(
            segments = summaries.segment_count,
            final_location = %final_summary_location,
            detailed_location = %detailed_summary_location,
            "Document summarized"
        );

        Ok(StoredSummaries {
            final_summary_location,
            detailed_summary_location,
            segment_count: summaries.segment_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::{InferenceError, InferenceParameters, StorageError};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // In-memory document and artifact storage for testing
    #[derive(Clone, Default)]
    struct InMemoryStore {
        documents: Arc<Mutex<HashMap<String, String>>>,
        artifacts: Arc<Mutex<HashMap<String, String>>>,
        failing_key: Option<String>,
    }

    impl InMemoryStore {
        fn with_document(key: &str, text: &str) -> Self {
            let store = Self::default();
            store
                .documents
                .lock()
                .unwrap()
                .insert(key.to_string(), text.to_string());
            store
        }

        fn artifact_keys(&self) -> Vec<String> {
            let mut keys: Vec<String> = self.artifacts.lock().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        }
    }

    impl DocumentSource for InMemoryStore {
        fn fetch_text(
            &self,
            key: &DocumentKey,
        ) -> impl Future<Output = Result<String, StorageError>> + Send {
            let found = self.documents.lock().unwrap().get(key.as_str()).cloned();
            let key = key.to_string();

            async move { found.ok_or(StorageError::NotFound(key)) }
        }
    }

    impl ArtifactSink for InMemoryStore {
        fn store(
            &self,
            key: &str,
            contents: &str,
        ) -> impl Future<Output = Result<String, StorageError>> + Send {
            let result = if self.failing_key.as_deref() == Some(key) {
                Err(StorageError::backend("disk full"))
            } else {
                self.artifacts
                    .lock()
                    .unwrap()
                    .insert(key.to_string(), contents.to_string());
                Ok(format!("mem://{key}"))
            };

            async move { result }
        }

        fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
            self.artifacts.lock().unwrap().remove(key);
            async move { Ok(()) }
        }
    }

    #[derive(Clone)]
    struct FixedClient(Result<String, InferenceError>);

    impl InferenceClient for FixedClient {
        fn invoke(
            &self,
            _prompt: &str,
            _parameters: &InferenceParameters,
        ) -> impl Future<Output = Result<String, InferenceError>> + Send {
            let reply = self.0.clone();
            async move { reply }
        }
    }

    fn service(
        store: InMemoryStore,
        client: FixedClient,
    ) -> SummarizationService<InMemoryStore, InMemoryStore, FixedClient> {
        let config = PipelineConfig {
            pacing_delay: Duration::ZERO,
            ..PipelineConfig::default()
        };
        SummarizationService::new(store.clone(), store, client, config, ArtifactLayout::default())
    }

    #[tokio::test]
    async fn test_process_writes_both_artifacts() {
        let store = InMemoryStore::with_document("documents/a.pdf", "Some text.");
        let service = service(store.clone(), FixedClient(Ok("summary".to_string())));

        let outcome = service.process("documents/a.pdf").await;

        assert!(outcome.is_success());
        assert_eq!(
            store.artifact_keys(),
            vec!["summaries-detailed/a.txt", "summaries/a.txt"]
        );
        match outcome {
            SummaryOutcome::Succeeded {
                final_summary_location,
                segment_count,
                ..
            } => {
                assert_eq!(final_summary_location, "mem://summaries/a.txt");
                assert_eq!(segment_count, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_reported() {
        let service = service(InMemoryStore::default(), FixedClient(Ok("s".to_string())));

        let outcome = service.process("documents/missing.pdf").await;

        match outcome {
            SummaryOutcome::Failed { stage, kind, .. } => {
                assert_eq!(stage, PipelineStage::Fetch);
                assert_eq!(kind, FailureKind::DocumentNotFound);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_document_is_reported_as_empty() {
        let store = InMemoryStore::with_document("documents/blank.pdf", "   \n");
        let service = service(store.clone(), FixedClient(Ok("s".to_string())));

        let outcome = service.process("documents/blank.pdf").await;

        assert!(matches!(
            outcome,
            SummaryOutcome::Failed {
                kind: FailureKind::EmptyDocument,
                ..
            }
        ));
        assert!(store.artifact_keys().is_empty());
    }

    #[tokio::test]
    async fn test_inference_failure_writes_nothing() {
        let store = InMemoryStore::with_document("documents/a.pdf", "Some text.");
        let service = service(
            store.clone(),
            FixedClient(Err(InferenceError::fatal("access denied"))),
        );

        let outcome = service.process("documents/a.pdf").await;

        match outcome {
            SummaryOutcome::Failed {
                stage,
                segment_index,
                ..
            } => {
                assert_eq!(stage, PipelineStage::Segment);
                assert_eq!(segment_index, Some(0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(store.artifact_keys().is_empty());
    }

    #[tokio::test]
    async fn test_failed_final_write_withdraws_detailed_artifact() {
        let mut store = InMemoryStore::with_document("documents/a.pdf", "Some text.");
        store.failing_key = Some("summaries/a.txt".to_string());
        let service = service(store.clone(), FixedClient(Ok("s".to_string())));

        let outcome = service.process("documents/a.pdf").await;

        assert!(matches!(
            outcome,
            SummaryOutcome::Failed {
                stage: PipelineStage::Store,
                ..
            }
        ));
        assert!(store.artifact_keys().is_empty());
    }

    #[tokio::test]
    async fn test_blank_key_is_rejected() {
        let service = service(InMemoryStore::default(), FixedClient(Ok("s".to_string())));

        let outcome = service.process("  ").await;

        assert!(matches!(
            outcome,
            SummaryOutcome::Failed {
                kind: FailureKind::InvalidRequest,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_key_in_artifact_namespace_leaves_source_untouched() {
        let store = InMemoryStore::with_document("summaries/a.txt", "Original text.");
        let service = service(store.clone(), FixedClient(Ok("summary".to_string())));

        let outcome = service.process("summaries/a.txt").await;

        match outcome {
            SummaryOutcome::Failed { stage, kind, .. } => {
                assert_eq!(stage, PipelineStage::Fetch);
                assert_eq!(kind, FailureKind::InvalidRequest);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(store.artifact_keys().is_empty());
        assert_eq!(
            store.documents.lock().unwrap().get("summaries/a.txt").cloned(),
            Some("Original text.".to_string())
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = SummaryOutcome::Failed {
            run_id: RunId::new(),
            document_key: "documents/a.pdf".to_string(),
            stage: PipelineStage::Reduce,
            kind: FailureKind::Throttled,
            segment_index: None,
            error: "Final summary failed".to_string(),
            completed_at: Utc::now(),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["stage"], "reduce");
        assert_eq!(json["kind"], "throttled");
    }
}
