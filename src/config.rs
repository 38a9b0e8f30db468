//! Configuration types for a summaize session.
//!
//! All session behaviour is controlled through [`SummaizeConfig`], built via
//! its [`SummaizeConfigBuilder`]. The builder lets callers set only what they
//! care about and rely on the documented defaults for the rest.

use crate::error::SummaizeError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default chat model used for analysis.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default number of characters shown in the extracted-text preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// Default file name for the saved extracted text.
pub const DEFAULT_TEXT_FILE_NAME: &str = "extracted_text.txt";

/// Configuration for a summaize session.
///
/// Built via [`SummaizeConfig::builder()`] or using
/// [`SummaizeConfig::default()`].
///
/// # Example
/// ```rust
/// use summaize::{OcrEngine, SummaizeConfig};
///
/// let config = SummaizeConfig::builder()
///     .model("gpt-4o-mini")
///     .temperature(0.2)
///     .ocr_engine(OcrEngine::Vision)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaizeConfig {
    /// LLM model identifier, e.g. "gpt-4o". If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the analysis call. Default: 0.5.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1000.
    ///
    /// Five bullets plus a bias paragraph fit comfortably; the cap keeps a
    /// rambling model from running up cost.
    pub max_tokens: usize,

    /// Custom analysis prompt template. Must contain `{text}`.
    /// If None, uses [`crate::prompts::ANALYSIS_PROMPT`].
    pub prompt_template: Option<String>,

    /// Engine used to read text out of images. Default: [`OcrEngine::Tesseract`].
    pub ocr_engine: OcrEngine,

    /// Tesseract executable. Default: "tesseract" (resolved via `PATH`).
    pub tesseract_cmd: String,

    /// Tesseract language code. Default: "eng".
    pub ocr_language: String,

    /// Number of characters in the extracted-text preview. Default: 2000.
    pub preview_chars: usize,

    /// Download timeout for URL inputs in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaizeConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.5,
            max_tokens: 1000,
            prompt_template: None,
            ocr_engine: OcrEngine::default(),
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            download_timeout_secs: 30,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaizeConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_template", &self.prompt_template.as_ref().map(|t| t.len()))
            .field("ocr_engine", &self.ocr_engine)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .field("preview_chars", &self.preview_chars)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SessionProgressCallback>"),
            )
            .finish()
    }
}

impl SummaizeConfig {
    /// Create a new builder for `SummaizeConfig`.
    pub fn builder() -> SummaizeConfigBuilder {
        SummaizeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model that will be requested, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`SummaizeConfig`].
#[derive(Debug)]
pub struct SummaizeConfigBuilder {
    config: SummaizeConfig,
}

impl SummaizeConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn ocr_engine(mut self, engine: OcrEngine) -> Self {
        self.config.ocr_engine = engine;
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn preview_chars(mut self, n: usize) -> Self {
        self.config.preview_chars = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaizeConfig, SummaizeError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(SummaizeError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if let Some(ref t) = c.prompt_template {
            if !t.contains("{text}") {
                return Err(SummaizeError::InvalidConfig(
                    "prompt template must contain the {text} placeholder".into(),
                ));
            }
        }
        if c.tesseract_cmd.trim().is_empty() {
            return Err(SummaizeError::InvalidConfig(
                "tesseract command must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How text is read out of uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    /// Local Tesseract binary. (default)
    #[default]
    Tesseract,
    /// The configured chat model, sent the image as a vision attachment.
    Vision,
}

impl FromStr for OcrEngine {
    type Err = SummaizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tesseract" => Ok(OcrEngine::Tesseract),
            "vision" | "vlm" => Ok(OcrEngine::Vision),
            other => Err(SummaizeError::InvalidConfig(format!(
                "unknown OCR engine '{other}' (expected tesseract or vision)"
            ))),
        }
    }
}
