//! PDF text extraction via pdfium's text layer.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto the blocking thread pool.
//!
//! Only the embedded text layer is read. A scanned PDF without one yields
//! empty text, which the session reports as [`SummaizeError::EmptyText`].

use crate::error::SummaizeError;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Text and metadata read from a PDF.
#[derive(Debug, Clone)]
pub struct PdfText {
    pub text: String,
    pub title: Option<String>,
    pub page_count: usize,
}

/// Extract the text of every page, joined with `"\n"` in page order.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<PdfText, SummaizeError> {
    tokio::task::spawn_blocking(move || extract_pdf_text_blocking(&bytes))
        .await
        .map_err(|e| SummaizeError::Internal(format!("PDF task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_pdf_text_blocking(bytes: &[u8]) -> Result<PdfText, SummaizeError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
        return Err(SummaizeError::PdfExtractionFailed {
            detail: format!("not a PDF (first bytes: {magic:?})"),
        });
    }

    let pdfium = pdfium_auto::bind_pdfium_silent()
        .map_err(|e| SummaizeError::PdfiumBindingFailed(e.to_string()))?;

    let document = pdfium.load_pdf_from_byte_slice(bytes, None).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            SummaizeError::PdfExtractionFailed {
                detail: "document is encrypted and requires a password".into(),
            }
        } else {
            SummaizeError::PdfExtractionFailed { detail: err_str }
        }
    })?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    let mut page_texts = Vec::with_capacity(page_count);
    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| SummaizeError::PdfExtractionFailed {
                detail: format!("page {}: {:?}", idx + 1, e),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, text.len());
        page_texts.push(text);
    }

    let title = document
        .metadata()
        .get(PdfDocumentMetadataTagType::Title)
        .map(|t| t.value().trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(PdfText {
        text: page_texts.join("\n"),
        title,
        page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_pdf_bytes_rejected_before_binding() {
        let err = extract_pdf_text(b"PK\x03\x04zipdata".to_vec())
            .await
            .unwrap_err();
        match err {
            SummaizeError::PdfExtractionFailed { detail } => {
                assert!(detail.contains("not a PDF"), "got: {detail}")
            }
            other => panic!("expected PdfExtractionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_bytes_rejected() {
        assert!(matches!(
            extract_pdf_text(Vec::new()).await,
            Err(SummaizeError::PdfExtractionFailed { .. })
        ));
    }
}
