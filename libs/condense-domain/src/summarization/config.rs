//! Pipeline configuration
//!
//! Every tunable of the pipeline lives here with its default. Adapters and
//! binaries build a `PipelineConfig`; the domain never reads the environment.

use std::time::Duration;

use super::error::SummarizationError;
use super::ids::DocumentKey;
use super::prompt::PromptTemplate;

/// Configuration of the chunker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Maximum segment length in characters (default: 80,000)
    pub max_chunk_size: usize,
    /// How far back from a naive boundary to look for a terminator (default: 100)
    pub lookback: usize,
    /// Sentence terminator that a segment may end on (default: '.')
    pub terminator: char,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 80_000,
            lookback: 100,
            terminator: '.',
        }
    }
}

/// Backoff schedule for throttled inference calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3)
    pub max_retries: u32,
    /// Wait before the first retry; retry `n` waits `n` times this (default: 5s)
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(5_000),
        }
    }
}

impl RetryPolicy {
    /// Total attempts allowed, the first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before retry number `retry` (1-based)
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use condense_domain::summarization::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(1), Duration::from_secs(5));
    /// assert_eq!(policy.delay_for(3), Duration::from_secs(15));
    /// ```
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }
}

/// Parameters sent with every inference call of a run
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceParameters {
    /// Maximum number of generated tokens (default: 2000)
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.5)
    pub temperature: f32,
    /// Nucleus sampling mass (default: 0.9)
    pub top_p: f32,
    /// Top-k sampling cutoff (default: 250)
    pub top_k: u32,
}

impl Default for InferenceParameters {
    fn default() -> Self {
        Self {
            max_tokens: 2_000,
            temperature: 0.5,
            top_p: 0.9,
            top_k: 250,
        }
    }
}

/// Configuration of a whole pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunker: ChunkerConfig,
    pub retry: RetryPolicy,
    /// Wait between two segment completions and before the reduce call (default: 3s)
    pub pacing_delay: Duration,
    pub inference: InferenceParameters,
    pub prompts: PromptTemplate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            retry: RetryPolicy::default(),
            pacing_delay: Duration::from_millis(3_000),
            inference: InferenceParameters::default(),
            prompts: PromptTemplate::default(),
        }
    }
}

impl PipelineConfig {
    /// Check the configuration for values the pipeline cannot run with
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::InvalidConfig` describing the first bad value
    pub fn validate(&self) -> Result<(), SummarizationError> {
        if self.chunker.max_chunk_size == 0 {
            return Err(SummarizationError::invalid_config(
                "max_chunk_size must be greater than zero",
            ));
        }
        if self.inference.max_tokens == 0 {
            return Err(SummarizationError::invalid_config(
                "max_tokens must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.inference.temperature) {
            return Err(SummarizationError::invalid_config(format!(
                "temperature must be within [0, 1], got {}",
                self.inference.temperature
            )));
        }
        if !(self.inference.top_p > 0.0 && self.inference.top_p <= 1.0) {
            return Err(SummarizationError::invalid_config(format!(
                "top_p must be within (0, 1], got {}",
                self.inference.top_p
            )));
        }
        Ok(())
    }
}

/// Where the two output artifacts of a run are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Namespace of the final summary (default: "summaries")
    pub final_prefix: String,
    /// Namespace of the segment-by-segment summary (default: "summaries-detailed")
    pub detailed_prefix: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            final_prefix: "summaries".to_string(),
            detailed_prefix: "summaries-detailed".to_string(),
        }
    }
}

impl ArtifactLayout {
    /// Namespace of the final summary, without trailing slashes
    pub fn final_namespace(&self) -> &str {
        self.final_prefix.trim_end_matches('/')
    }

    /// Namespace of the detailed summary, without trailing slashes
    pub fn detailed_namespace(&self) -> &str {
        self.detailed_prefix.trim_end_matches('/')
    }

    /// Check that both artifacts get a distinct, non-empty namespace
    ///
    /// Prefixes are compared the way artifact keys are built, so `out` and
    /// `out/` are the same namespace.
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::InvalidConfig` for an empty prefix or two
    /// prefixes naming the same namespace
    pub fn validate(&self) -> Result<(), SummarizationError> {
        if self.final_namespace().is_empty() || self.detailed_namespace().is_empty() {
            return Err(SummarizationError::invalid_config(
                "artifact prefixes cannot be empty",
            ));
        }
        if self.final_namespace() == self.detailed_namespace() {
            return Err(SummarizationError::invalid_config(format!(
                "final and detailed summaries would share the namespace '{}'",
                self.final_namespace()
            )));
        }
        Ok(())
    }

    /// Reject a source key that lives in one of the artifact namespaces
    ///
    /// Such a key would have its own artifact derived onto itself, so writing
    /// a summary would overwrite the document.
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::InvalidDocumentKey` if the key's namespace
    /// is an artifact namespace
    pub fn ensure_source_key(&self, key: &DocumentKey) -> Result<(), SummarizationError> {
        match key.namespace() {
            Some(namespace)
                if namespace == self.final_namespace() || namespace == self.detailed_namespace() =>
            {
                Err(SummarizationError::InvalidDocumentKey(format!(
                    "'{}' is inside the artifact namespace '{}'",
                    key, namespace
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_schedule() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts(), 4);
        let waits: Vec<u64> = (1..=policy.max_retries)
            .map(|retry| policy.delay_for(retry).as_millis() as u64)
            .collect();
        assert_eq!(waits, vec![5_000, 10_000, 15_000]);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.chunker.max_chunk_size, 80_000);
        assert_eq!(config.pacing_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_layout_prefixes_compared_as_namespaces() {
        let layout = ArtifactLayout {
            final_prefix: "out".to_string(),
            detailed_prefix: "out/".to_string(),
        };

        let err = layout.validate().unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidConfig(_)));
        assert!(ArtifactLayout::default().validate().is_ok());
    }

    #[test]
    fn test_layout_rejects_empty_prefix() {
        let layout = ArtifactLayout {
            final_prefix: "/".to_string(),
            ..ArtifactLayout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_source_key_inside_artifact_namespace_is_rejected() {
        let layout = ArtifactLayout::default();

        for key in ["summaries/a.txt", "summaries-detailed/reports/q3.txt"] {
            let err = layout.ensure_source_key(&DocumentKey::new(key)).unwrap_err();
            assert!(matches!(err, SummarizationError::InvalidDocumentKey(_)));
        }
        assert!(layout
            .ensure_source_key(&DocumentKey::new("documents/summaries/a.pdf"))
            .is_ok());
        assert!(layout.ensure_source_key(&DocumentKey::new("summaries")).is_ok());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let mut config = PipelineConfig::default();
        config.chunker.max_chunk_size = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidConfig(_)));
    }

    #[test]
    fn test_out_of_range_sampling_is_rejected() {
        let mut config = PipelineConfig::default();
        config.inference.temperature = 1.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.inference.top_p = 0.0;
        assert!(config.validate().is_err());
    }
}
