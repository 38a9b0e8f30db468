//! # summaize
//!
//! Summarise a document or web article in five bullet points and get a bias
//! verdict from a hosted chat model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / image / .txt / URL
//!  │
//!  ├─ 1. Input    file path or http(s) URL; files dispatched on extension
//!  ├─ 2. Extract  pdfium text layer │ Tesseract / vision OCR │ UTF-8 │ article
//!  ├─ 3. Clean    line endings, invisible chars, blank-line runs
//!  ├─ 4. Preview  first 2000 characters; optional save to extracted_text.txt
//!  └─ 5. Analyse  one chat call, response split on "Bias:"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use summaize::{extract, summarize_and_analyze, SummaizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = SummaizeConfig::default();
//!     let extracted = extract("https://example.com/news/story", &config).await?;
//!     println!("{}", extracted.preview(config.preview_chars));
//!
//!     let analysis = summarize_and_analyze(&extracted.text, &config).await?;
//!     println!("{}", analysis.report.to_markdown());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `cli`     | on      | Enables the `summaize` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! 
// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{split_response, summarize_and_analyze, BIAS_MARKER};
pub use config::{OcrEngine, SummaizeConfig, SummaizeConfigBuilder, DEFAULT_TEXT_FILE_NAME};
pub use error::{Stage, SummaizeError};
pub use extract::{extract, extract_document, extract_source, extract_sync, extract_url, save_text};
pub use output::{preview, AnalysisOutput, AnalysisReport, ExtractedText, SourceKind};
pub use pipeline::input::{detect_kind, DocumentKind, InputSource};
pub use progress::{NoopProgressCallback, ProgressCallback, SessionProgressCallback};
