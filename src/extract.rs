//! Text-extraction entry points.
//!
//! [`extract`] is the one-call API: give it a file path or URL and it returns
//! the cleaned text. [`extract_document`] and [`extract_url`] are the two
//! halves for callers that already hold the bytes or know they have a URL.

use crate::config::SummaizeConfig;
use crate::error::{Stage, SummaizeError};
use crate::output::{ExtractedText, SourceKind};
use crate::pipeline::input::{self, DocumentKind, InputSource};
use crate::pipeline::{article, normalize, ocr, pdf};
use std::path::Path;
use tracing::info;

/// Extract text from a local file path or an HTTP/HTTPS URL.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    let input_str = input_str.as_ref();
    let source = match input::resolve_input(input_str).await {
        Ok(source) => source,
        Err(e) => {
            report_error(config, &e);
            return Err(e);
        }
    };
    extract_source(source, config).await
}

/// Extract text from an already-resolved [`InputSource`].
pub async fn extract_source(
    source: InputSource,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    match source {
        InputSource::File { name, bytes } => extract_document(&name, bytes, config).await,
        InputSource::Url(url) => extract_url(&url, config).await,
    }
}

/// Extract text from uploaded file bytes, dispatching on the extension of `name`.
pub async fn extract_document(
    name: &str,
    bytes: Vec<u8>,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(name);
    }
    info!("Processing {}...", name);

    let result = extract_document_inner(name, bytes, config).await;
    finish(name, Stage::Document, result, config)
}

async fn extract_document_inner(
    name: &str,
    bytes: Vec<u8>,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    let kind = input::detect_kind(name)?;

    let (raw, source_kind, title, page_count) = match kind {
        DocumentKind::Pdf => {
            let pdf = pdf::extract_pdf_text(bytes).await?;
            (pdf.text, SourceKind::Pdf, pdf.title, Some(pdf.page_count))
        }
        DocumentKind::Image => {
            let text = ocr::extract_image_text(bytes, config).await?;
            (text, SourceKind::Image, None, None)
        }
        DocumentKind::Text => (String::from_utf8(bytes)?, SourceKind::Text, None, None),
    };

    Ok(ExtractedText {
        source: name.to_string(),
        kind: source_kind,
        title,
        page_count,
        text: normalize::clean_text(&raw),
    })
}

/// Fetch a web article and extract its readable text.
pub async fn extract_url(url: &str, config: &SummaizeConfig) -> Result<ExtractedText, SummaizeError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(url);
    }

    let result = async {
        let html = article::fetch_html(url, config.download_timeout_secs).await?;
        let parsed = article::extract_article(&html)?;
        Ok::<_, SummaizeError>(ExtractedText {
            source: url.to_string(),
            kind: SourceKind::Article,
            title: parsed.title,
            page_count: None,
            text: normalize::clean_text(&parsed.text),
        })
    }
    .await;

    finish(url, Stage::Article, result, config)
}

/// Reject empty extractions and notify the progress callback.
///
/// An empty result is reported against `stage`, the extractor that produced it.
fn finish(
    label: &str,
    stage: Stage,
    result: Result<ExtractedText, SummaizeError>,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    let result = result.and_then(|extracted| {
        if extracted.is_empty() {
            Err(SummaizeError::EmptyText {
                source_label: label.to_string(),
                stage,
            })
        } else {
            Ok(extracted)
        }
    });

    match &result {
        Ok(extracted) => {
            info!("Extracted {} chars from {}", extracted.char_count(), label);
            if let Some(ref cb) = config.progress_callback {
                cb.on_extraction_complete(label, extracted.char_count());
            }
        }
        Err(e) => report_error(config, e),
    }
    result
}

fn report_error(config: &SummaizeConfig, e: &SummaizeError) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_error(&e.to_string());
    }
}

/// Write extracted text to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn save_text(text: &str, output_path: impl AsRef<Path>) -> Result<(), SummaizeError> {
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SummaizeError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, text)
        .await
        .map_err(|e| SummaizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| SummaizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &SummaizeConfig,
) -> Result<ExtractedText, SummaizeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SummaizeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}
