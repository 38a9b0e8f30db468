//! Image-to-text: decode the upload, then hand it to an OCR engine.
//!
//! Uploads are decoded with `image` first whatever the engine, so a corrupt
//! or mislabelled file fails with a decode error instead of an opaque OCR
//! failure. The decoded image is re-encoded as lossless PNG: Tesseract gets a
//! format it always reads, and the vision engine gets crisp text pixels.

use crate::config::{OcrEngine, SummaizeConfig};
use crate::error::SummaizeError;
use crate::pipeline::llm;
use crate::prompts::OCR_SYSTEM_PROMPT;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::{ChatMessage, ImageData};
use image::DynamicImage;
use std::io::{Cursor, Write};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Extract text from image bytes with the configured OCR engine.
pub async fn extract_image_text(
    bytes: Vec<u8>,
    config: &SummaizeConfig,
) -> Result<String, SummaizeError> {
    let png = tokio::task::spawn_blocking(move || decode_to_png(&bytes))
        .await
        .map_err(|e| SummaizeError::Internal(format!("Image task panicked: {}", e)))??;

    match config.ocr_engine {
        OcrEngine::Tesseract => run_tesseract(&png, &config.tesseract_cmd, &config.ocr_language).await,
        OcrEngine::Vision => run_vision(&png, config).await,
    }
}

/// Decode arbitrary image bytes and re-encode them as PNG.
pub fn decode_to_png(bytes: &[u8]) -> Result<Vec<u8>, SummaizeError> {
    let img = image::load_from_memory(bytes).map_err(|e| SummaizeError::ImageDecodeFailed {
        detail: e.to_string(),
    })?;
    debug!("Decoded image {}x{} px", img.width(), img.height());
    encode_png(&img)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, SummaizeError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| SummaizeError::ImageDecodeFailed {
            detail: format!("PNG re-encode failed: {e}"),
        })?;
    Ok(buf)
}

/// Run `tesseract <png> stdout -l <lang>` and return its stdout.
async fn run_tesseract(png: &[u8], command: &str, lang: &str) -> Result<String, SummaizeError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("summaize-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| SummaizeError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(png)
        .and_then(|_| tmp.flush())
        .map_err(|e| SummaizeError::Internal(format!("tempfile write: {e}")))?;

    info!("Running {} on {} byte image (lang={})", command, png.len(), lang);

    let output = Command::new(command)
        .arg(tmp.path())
        .arg("stdout")
        .arg("-l")
        .arg(lang)
        .output()
        .await
        .map_err(|e| SummaizeError::OcrUnavailable {
            command: command.to_string(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SummaizeError::OcrFailed {
            detail: format!("{} exited with {}: {}", command, output.status, stderr),
        });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        debug!("tesseract stderr: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Transcribe the image with the configured vision-capable chat model.
async fn run_vision(png: &[u8], config: &SummaizeConfig) -> Result<String, SummaizeError> {
    let provider = llm::resolve_provider(config)?;

    let image = ImageData::new(STANDARD.encode(png), "image/png").with_detail("high");
    let messages = vec![
        ChatMessage::system(OCR_SYSTEM_PROMPT),
        ChatMessage::user_with_images("", vec![image]),
    ];

    // Transcription wants determinism, not the analysis temperature.
    let reply = llm::chat(&provider, &messages, 0.0, config.max_tokens.max(4096)).await?;
    if reply.content.trim().is_empty() {
        warn!("Vision OCR returned no text");
    }
    Ok(reply.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_fixture() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])));
        encode_png(&img).expect("encode should succeed")
    }

    #[test]
    fn decode_to_png_round_trips_png() {
        let png = decode_to_png(&png_fixture()).expect("decode should succeed");
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_to_png(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SummaizeError::ImageDecodeFailed { .. }));
    }

    #[tokio::test]
    async fn missing_tesseract_is_reported() {
        let config = SummaizeConfig::builder()
            .tesseract_cmd("summaize-no-such-ocr-binary")
            .build()
            .unwrap();
        let err = extract_image_text(png_fixture(), &config).await.unwrap_err();
        match err {
            SummaizeError::OcrUnavailable { command, .. } => {
                assert_eq!(command, "summaize-no-such-ocr-binary")
            }
            other => panic!("expected OcrUnavailable, got {other:?}"),
        }
    }
}
