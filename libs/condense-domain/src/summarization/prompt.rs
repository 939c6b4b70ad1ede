//! Prompt templates
//!
//! The wording of the prompts is opaque to the pipeline. A template is plain
//! text with placeholders that are substituted before every call:
//!
//! - segment template: `{position}`, `{total}`, `{text}`
//! - reduce template: `{count}`, `{summaries}`

use super::entity::{Segment, SegmentSummary};

/// Marker placed between segment summaries inside the reduce prompt
pub const REDUCE_SECTION_DELIMITER: &str = "\n\n--- SEGMENT SUMMARY ---\n\n";

const DEFAULT_SEGMENT_TEMPLATE: &str = "\
You are summarizing part {position} of {total} of a longer document.
Summarize only the text of this part. Do not assume anything about the parts \
before or after it and do not try to connect it to them.

Text of part {position}/{total}:
{text}

Summary of part {position}:";

const DEFAULT_REDUCE_TEMPLATE: &str = "\
Below are {count} summaries of consecutive parts of one document, in order, \
separated by markers.

{summaries}

Using only these summaries, write:
1. An overall summary of the document.
2. The principal themes.
3. The key arguments or messages.
4. The conclusions or positions of the source, if it states any.";

/// Templates for the map and reduce prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segment: String,
    reduce: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            segment: DEFAULT_SEGMENT_TEMPLATE.to_string(),
            reduce: DEFAULT_REDUCE_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Create templates from custom text
    pub fn new(segment: impl Into<String>, reduce: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            reduce: reduce.into(),
        }
    }

    /// Render the prompt for one segment
    pub fn render_segment(&self, segment: &Segment) -> String {
        self.segment
            .replace("{position}", &segment.position().to_string())
            .replace("{total}", &segment.total_segments().to_string())
            .replace("{text}", segment.text())
    }

    /// Render the reduce prompt over every summary, in the order given
    pub fn render_reduce(&self, summaries: &[SegmentSummary]) -> String {
        let joined = summaries
            .iter()
            .map(|summary| summary.text.as_str())
            .collect::<Vec<_>>()
            .join(REDUCE_SECTION_DELIMITER);

        self.reduce
            .replace("{count}", &summaries.len().to_string())
            .replace("{summaries}", &joined)
    }
}
