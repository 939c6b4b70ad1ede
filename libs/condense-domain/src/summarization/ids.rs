use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::SummarizationError;

/// Identifier of a source document in the document store
///
/// DocumentKey wraps the caller-supplied object key. It carries no identity
/// beyond that key; artifact keys are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Wrap a key without validation
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Validate and wrap a caller-supplied key
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::InvalidDocumentKey` if the key is blank
    /// or ends with a `/` (a prefix, not an object)
    pub fn parse(key: &str) -> Result<Self, SummarizationError> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(SummarizationError::InvalidDocumentKey(
                "key cannot be empty".to_string(),
            ));
        }
        if trimmed.ends_with('/') {
            return Err(SummarizationError::InvalidDocumentKey(format!(
                "'{}' names a prefix, not a document",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the raw key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First path component of the key, if the key has one
    ///
    /// `documents/reports/q3.pdf` is in namespace `documents`; `q3.pdf` is in none.
    pub fn namespace(&self) -> Option<&str> {
        match self.0.split_once('/') {
            Some((namespace, rest)) if !rest.is_empty() => Some(namespace),
            _ => None,
        }
    }

    /// Derive the key of an output artifact
    ///
    /// The first path component is the input namespace and is replaced by
    /// `prefix`; the extension of the file name becomes `.txt`.
    /// `documents/reports/q3.pdf` with prefix `summaries` gives
    /// `summaries/reports/q3.txt`. A key without a `/` keeps its whole name.
    pub fn artifact_key(&self, prefix: &str) -> String {
        let relative = match self.namespace() {
            Some(namespace) => &self.0[namespace.len() + 1..],
            None => self.0.as_str(),
        };

        let name_start = relative.rfind('/').map_or(0, |slash| slash + 1);
        let stem = match relative.rfind('.') {
            Some(dot) if dot > name_start => &relative[..dot],
            _ => relative,
        };

        format!("{}/{}.txt", prefix.trim_end_matches('/'), stem)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for one summarization run
///
/// RunId is a wrapper around UUID v7 so runs sort by start time in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Generate a new RunId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the inner UUID value
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
