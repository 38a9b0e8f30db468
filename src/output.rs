//! Result types produced by a session.
//!
//! Everything here is plain data and serialisable, so `--json` output is just
//! `serde_json::to_string_pretty` over these structs.

use serde::{Deserialize, Serialize};

/// What kind of artifact the text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pdf,
    Image,
    Text,
    Article,
}

/// Text extracted from a document or web article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// File name or URL the text came from.
    pub source: String,
    pub kind: SourceKind,
    /// Document or article title, when the source carries one.
    pub title: Option<String>,
    /// Number of pages, for PDFs.
    pub page_count: Option<usize>,
    /// The full extracted text.
    pub text: String,
}

impl ExtractedText {
    /// Number of Unicode scalar values in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether there is anything worth analysing.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The first `max_chars` characters of the text.
    pub fn preview(&self, max_chars: usize) -> &str {
        preview(&self.text, max_chars)
    }
}

/// Return the first `max_chars` characters of `text` without splitting a
/// multi-byte character.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// The model response, split on the first `Bias:` marker when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum AnalysisReport {
    /// The response contained the marker.
    Split {
        /// Trimmed text before the marker (the bullet summary).
        summary: String,
        /// Trimmed text after the marker (the bias verdict).
        bias: String,
    },
    /// No marker; the response is shown as-is.
    Unsplit { result: String },
}

impl AnalysisReport {
    pub fn is_split(&self) -> bool {
        matches!(self, AnalysisReport::Split { .. })
    }

    /// Render the report as Markdown sections.
    ///
    /// The bias section re-attaches the `Bias:` label the split removed.
    pub fn to_markdown(&self) -> String {
        match self {
            AnalysisReport::Split { summary, bias } => {
                format!("## Summary\n\n{summary}\n\n## Bias Detection\n\nBias: {bias}\n")
            }
            AnalysisReport::Unsplit { result } => format!("## Result\n\n{result}\n"),
        }
    }
}

/// Output of the analysis step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub report: AnalysisReport,
    /// The unmodified model response.
    pub raw_response: String,
    /// Model that was requested.
    pub model: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}
