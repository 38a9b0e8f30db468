//! Input resolution: classify what the user handed us and load file bytes.
//!
//! Uploads are dispatched on the file extension alone, the same way a file
//! picker filters them; content sniffing happens later in the format-specific
//! stage (an image that fails to decode is an extraction error, not a type
//! error).

use crate::error::SummaizeError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The artifact a session starts from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Uploaded file bytes together with the name the extension comes from.
    File { name: String, bytes: Vec<u8> },
    /// A web-article address.
    Url(String),
}

impl InputSource {
    /// Human-readable label: the file name or the URL.
    pub fn label(&self) -> &str {
        match self {
            InputSource::File { name, .. } => name,
            InputSource::Url(url) => url,
        }
    }
}

/// Document formats the tool can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Text,
}

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "txt"];

/// Map a file name to the extractor that handles it.
///
/// The extension is the lower-cased text after the last `.`. A name with no
/// `.` has no extension and is unsupported.
pub fn detect_kind(file_name: &str) -> Result<DocumentKind, SummaizeError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "png" | "jpg" | "jpeg" => Ok(DocumentKind::Image),
        "txt" => Ok(DocumentKind::Text),
        _ => Err(SummaizeError::UnsupportedFileType { extension }),
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Check if the input starts with a URL scheme (`ftp://`, `file://`, ...).
fn has_url_scheme(input: &str) -> bool {
    match input.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Turn a CLI argument into an [`InputSource`], reading the file if it is a path.
///
/// Only `http://` and `https://` addresses are fetched; any other scheme is
/// an [`SummaizeError::InvalidUrl`] rather than a path lookup.
pub async fn resolve_input(input: &str) -> Result<InputSource, SummaizeError> {
    if is_url(input) {
        Ok(InputSource::Url(input.to_string()))
    } else if has_url_scheme(input) {
        Err(SummaizeError::InvalidUrl {
            input: input.to_string(),
        })
    } else {
        read_local(Path::new(input)).await
    }
}

/// Read a local file into memory.
async fn read_local(path: &Path) -> Result<InputSource, SummaizeError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => SummaizeError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SummaizeError::FileNotFound {
            path: PathBuf::from(path),
        },
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(InputSource::File { name, bytes })
}
