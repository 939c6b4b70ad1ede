//! Domain entities for document summarization
//!
//! A Document is the immutable input of a run. The chunker cuts it into
//! Segments, each Segment yields one SegmentSummary, and the run ends with
//! the pair of summaries in DocumentSummaries.

use serde::{Deserialize, Serialize};

use super::ids::DocumentKey;

/// The source text of one run
///
/// # Example
///
/// ```rust
/// use condense_domain::summarization::{Document, DocumentKey};
///
/// let document = Document::new(DocumentKey::new("documents/a.txt"), "Héllo.".to_string());
/// assert_eq!(document.char_len(), 6);
/// assert!(!document.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    key: DocumentKey,
    text: String,
}

impl Document {
    /// Create a document from its key and extracted text
    pub fn new(key: DocumentKey, text: String) -> Self {
        Self { key, text }
    }

    /// Get the document key
    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Get the document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the document has no text beyond whitespace
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A bounded contiguous slice of a document
///
/// Segments are the unit of independent summarization. Concatenating the
/// `text` of every segment of a document in index order reproduces the
/// document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    text: String,
    index: usize,
    total_segments: usize,
}

impl Segment {
    /// Create a segment
    ///
    /// # Arguments
    ///
    /// * `text` - The slice of the document
    /// * `index` - Zero-based position within the document
    /// * `total_segments` - Number of segments the document was cut into
    pub fn new(text: impl Into<String>, index: usize, total_segments: usize) -> Self {
        Self {
            text: text.into(),
            index,
            total_segments,
        }
    }

    /// Get the segment text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the zero-based index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the one-based position, as shown to the model
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// Get the number of segments in the document
    pub fn total_segments(&self) -> usize {
        self.total_segments
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Generated summary of one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub index: usize,
    pub text: String,
}

/// Output of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummaries {
    /// Result of the reduce call
    pub final_summary: String,
    /// Every segment summary in order, joined with the section delimiter
    pub detailed_summary: String,
    /// Number of segments the document was cut into
    pub segment_count: usize,
}
