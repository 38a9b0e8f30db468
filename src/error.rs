//! Error types for the summaize library.
//!
//! Every failure in a session is fatal for that session only: nothing is
//! retried and nothing is persisted, so a single enum covers the whole flow.
//! [`SummaizeError::stage`] tells the caller which step failed, which is how
//! the CLI picks the prefix it shows the user ("Error processing file",
//! "Failed to fetch article", "LLM error").

use crate::pipeline::input::SUPPORTED_EXTENSIONS;
use std::path::PathBuf;
use thiserror::Error;

/// The step of a session that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading or decoding an uploaded document.
    Document,
    /// Fetching or parsing a web article.
    Article,
    /// Calling the chat model.
    Analysis,
    /// Writing the extracted text to disk.
    Output,
    /// Configuration or internal failure.
    Setup,
}

/// All errors returned by the summaize library.
#[derive(Debug, Error)]
pub enum SummaizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension does not map to a supported extractor.
    #[error(
        "Unsupported file type '{extension}'. Supported: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )]
    UnsupportedFileType { extension: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// pdfium could not open the document or read its text layer.
    #[error("Could not extract text from PDF: {detail}")]
    PdfExtractionFailed { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    /// The image bytes could not be decoded.
    #[error("Could not decode image: {detail}")]
    ImageDecodeFailed { detail: String },

    /// The OCR binary could not be started.
    #[error("OCR engine '{command}' is not available: {detail}\nInstall tesseract-ocr or set TESSERACT_CMD.")]
    OcrUnavailable { command: String, detail: String },

    /// The OCR engine ran but reported a failure.
    #[error("OCR failed: {detail}")]
    OcrFailed { detail: String },

    /// A text upload was not valid UTF-8.
    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // ── Article errors ────────────────────────────────────────────────────
    /// The input string is not an HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': expected an http:// or https:// address")]
    InvalidUrl { input: String },

    /// The article download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    FetchFailed { url: String, reason: String },

    /// The article download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    FetchTimeout { url: String, secs: u64 },

    /// There was no text to analyse. `stage` is the step that noticed: the
    /// document or article extractor, or the analysis guard.
    #[error("No text could be extracted from {source_label}")]
    EmptyText { source_label: String, stage: Stage },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the extracted-text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummaizeError {
    /// Which step of the session failed.
    pub fn stage(&self) -> Stage {
        use SummaizeError::*;
        match self {
            FileNotFound { .. }
            | PermissionDenied { .. }
            | UnsupportedFileType { .. }
            | PdfExtractionFailed { .. }
            | PdfiumBindingFailed(_)
            | ImageDecodeFailed { .. }
            | OcrUnavailable { .. }
            | OcrFailed { .. }
            | InvalidUtf8(_) => Stage::Document,
            InvalidUrl { .. } | FetchFailed { .. } | FetchTimeout { .. } => Stage::Article,
            EmptyText { stage, .. } => *stage,
            ProviderNotConfigured { .. } | LlmApiError { .. } => Stage::Analysis,
            OutputWriteFailed { .. } => Stage::Output,
            InvalidConfig(_) | Internal(_) => Stage::Setup,
        }
    }

    /// The user-facing prefix for this error.
    pub fn headline(&self) -> &'static str {
        match self {
            SummaizeError::UnsupportedFileType { .. } => "Unsupported file type",
            _ => match self.stage() {
                Stage::Document => "Error processing file",
                Stage::Article => "Failed to fetch article",
                Stage::Analysis => "LLM error",
                Stage::Output => "Failed to save extracted text",
                Stage::Setup => "Setup error",
            },
        }
    }
}
