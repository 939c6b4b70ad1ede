//! Sentence-aware chunking
//!
//! Cuts a document into segments of at most `max_chunk_size` characters.
//! When a cut would fall inside the text, the chunker looks back a short
//! window for a sentence terminator and cuts just after it so the sentence
//! stays whole in the earlier segment. Segments are cut points, never copies:
//! their concatenation is the input.

use tracing::debug;

use super::config::ChunkerConfig;
use super::entity::Segment;

/// Splits text into ordered, contiguous segments
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a chunker with the given configuration
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Create a chunker with the default lookback and terminator
    pub fn with_max_chunk_size(max_chunk_size: usize) -> Self {
        Self::new(ChunkerConfig {
            max_chunk_size,
            ..ChunkerConfig::default()
        })
    }

    /// Get the chunker configuration
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` into segments
    ///
    /// Lengths are counted in characters. Empty text yields no segments; the
    /// caller decides how to report it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use condense_domain::summarization::Chunker;
    ///
    /// let segments = Chunker::with_max_chunk_size(12).split("One. Two. Three.");
    /// let texts: Vec<&str> = segments.iter().map(|s| s.text()).collect();
    /// assert_eq!(texts, vec!["One.", " Two. Three."]);
    /// ```
    pub fn split(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let (piece, tail) = rest.split_at(self.cut_point(rest));
            pieces.push(piece);
            rest = tail;
        }

        let total = pieces.len();
        debug!(
            bytes = text.len(),
            segments = total,
            max_chunk_size = self.config.max_chunk_size,
            "Split document into segments"
        );

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| Segment::new(piece, index, total))
            .collect()
    }

    /// Byte offset at which the segment starting at the head of `rest` ends
    ///
    /// If more than `max_chunk_size` characters remain, the naive end is the
    /// character at `max_chunk_size`. The lookback window is the `lookback`
    /// characters before it, clamped to the segment start so a segment is
    /// never empty. The window is scanned forward and the cut lands just
    /// after the first terminator found; without one the cut is the naive
    /// end. Otherwise the whole of `rest` is the last segment.
    fn cut_point(&self, rest: &str) -> usize {
        let max_chunk_size = self.config.max_chunk_size.max(1);
        let window_start = max_chunk_size.saturating_sub(self.config.lookback);
        let mut after_terminator = None;

        for (position, (offset, c)) in rest.char_indices().enumerate() {
            if position == max_chunk_size {
                return after_terminator.unwrap_or(offset);
            }
            if after_terminator.is_none()
                && position >= window_start
                && c == self.config.terminator
            {
                after_terminator = Some(offset + c.len_utf8());
            }
        }

        rest.len()
    }
}
