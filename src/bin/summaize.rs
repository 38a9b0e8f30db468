//! CLI binary for summaize.
//!
//! A thin shim over the library crate: one invocation is one session.
//! It extracts the text, prints a preview, optionally saves the text, then
//! runs the analysis unless `--extract-only` is given.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use summaize::pipeline::input::resolve_input;
use summaize::{
    detect_kind, extract_source, save_text, summarize_and_analyze, AnalysisOutput, DocumentKind,
    ExtractedText, InputSource, OcrEngine, ProgressCallback, SessionProgressCallback,
    SummaizeConfig, SummaizeError, DEFAULT_TEXT_FILE_NAME,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner for whichever step is running,
/// plus a status line when each step finishes.
struct CliProgressCallback {
    /// The spinner of the step in flight; a finished bar cannot be restarted.
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn start(&self, prefix: &'static str, msg: String) {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_TICKS);
        bar.set_style(style);
        bar.set_prefix(prefix);
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Some(old) = self.bar.lock().unwrap().replace(bar) {
            old.finish_and_clear();
        }
    }

    fn clear(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl SessionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, source: &str) {
        let msg = if summaize::pipeline::input::is_url(source) {
            "Fetching article from URL…".to_string()
        } else {
            format!("Processing {source}…")
        };
        self.start("Extracting", msg);
    }

    fn on_extraction_complete(&self, source: &str, chars: usize) {
        self.clear();
        eprintln!(
            "{} Extracted {} from {}",
            green("✓"),
            bold(&format!("{chars} chars")),
            dim(source)
        );
    }

    fn on_analysis_start(&self, model: &str, _text_chars: usize) {
        self.start("Analyzing", format!("Summarizing and detecting bias with {model}…"));
    }

    fn on_analysis_complete(&self, split: bool) {
        self.clear();
        if split {
            eprintln!("{} Analysis complete", green("✔"));
        } else {
            eprintln!(
                "{} Analysis complete {}",
                cyan("⚠"),
                dim("(no \"Bias:\" section found, showing full result)")
            );
        }
    }

    fn on_error(&self, _error: &str) {
        self.clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a PDF and detect bias
  summaize report.pdf

  # Summarise a news article
  summaize https://example.com/news/story

  # OCR a scanned page with a local Tesseract install
  summaize scan.png --tesseract-cmd /usr/local/bin/tesseract

  # OCR with the chat model instead of Tesseract
  summaize scan.jpg --ocr-engine vision

  # Extract only, and save the text to extracted_text.txt
  summaize notes.txt --extract-only --save-text

  # Machine-readable output
  summaize report.pdf --json > result.json

SUPPORTED INPUTS:
  .pdf                 text layer via pdfium
  .png .jpg .jpeg      OCR (tesseract or vision model)
  .txt                 UTF-8 text
  http(s)://…          web article (main content only)

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (also read from ./.env)
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  TESSERACT_CMD           Path to the tesseract binary
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download
"#;

/// Summarise documents and web articles and flag bias using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "summaize",
    version,
    about = "Summarise documents and web articles and flag bias using LLMs",
    long_about = "Extract text from a PDF, image, text file or web article, then ask a chat \
model for a 5-bullet summary and a bias assessment. Supports OpenAI, Anthropic, Google Gemini, \
Azure OpenAI, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// File path (PDF, PNG, JPG, JPEG, TXT) or HTTP/HTTPS URL.
    input: String,

    /// Save the extracted text (default file name: extracted_text.txt).
    #[arg(long, env = "SUMMAIZE_SAVE_TEXT", num_args = 0..=1,
          default_missing_value = DEFAULT_TEXT_FILE_NAME)]
    save_text: Option<PathBuf>,

    /// Only extract and preview the text; skip the analysis.
    #[arg(long, env = "SUMMAIZE_EXTRACT_ONLY")]
    extract_only: bool,

    /// Number of characters shown in the preview.
    #[arg(long, env = "SUMMAIZE_PREVIEW_CHARS", default_value_t = 2000)]
    preview_chars: usize,

    /// LLM model ID (e.g. gpt-4o, gpt-4o-mini, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SUMMAIZE_TEMPERATURE", default_value_t = 0.5)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "SUMMAIZE_MAX_TOKENS", default_value_t = 1000)]
    max_tokens: usize,

    /// Path to a text file with a custom analysis prompt (must contain {text}).
    #[arg(long, env = "SUMMAIZE_PROMPT")]
    prompt: Option<PathBuf>,

    /// OCR engine for images: tesseract or vision.
    #[arg(long, env = "SUMMAIZE_OCR_ENGINE", value_enum, default_value = "tesseract")]
    ocr_engine: OcrEngineArg,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract_cmd: String,

    /// Tesseract language code.
    #[arg(long, env = "SUMMAIZE_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "SUMMAIZE_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Output structured JSON instead of text.
    #[arg(long, env = "SUMMAIZE_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "SUMMAIZE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUMMAIZE_VERBOSE")]
    verbose: bool,

    /// Suppress all status output except errors.
    #[arg(short, long, env = "SUMMAIZE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OcrEngineArg {
    Tesseract,
    Vision,
}

impl From<OcrEngineArg> for OcrEngine {
    fn from(v: OcrEngineArg) -> Self {
        match v {
            OcrEngineArg::Tesseract => OcrEngine::Tesseract,
            OcrEngineArg::Vision => OcrEngine::Vision,
        }
    }
}

/// JSON document printed with `--json`.
#[derive(Serialize)]
struct SessionReport<'a> {
    extracted: &'a ExtractedText,
    saved_to: Option<&'a PathBuf>,
    analysis: Option<&'a AnalysisOutput>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; the environment may already carry the keys.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback a user needs, so library INFO logs
    // are hidden while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve input ────────────────────────────────────────────────────
    // A missing or unreadable file fails here, before any pdfium download.
    let source = resolve_input(&cli.input).await.map_err(fail)?;

    // ── Ensure PDFium engine is available (PDF inputs only) ──────────────
    if needs_pdf_engine(&source) {
        ensure_pdf_engine(cli.quiet)?;
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Extract ──────────────────────────────────────────────────────────
    let extracted = extract_source(source, &config).await.map_err(fail)?;

    if let Some(ref path) = cli.save_text {
        save_text(&extracted.text, path).await.map_err(fail)?;
        if !cli.quiet && !cli.json {
            eprintln!("{} Saved extracted text to {}", green("✓"), bold(&path.display().to_string()));
        }
    }

    if !cli.json {
        print_preview(&extracted, config.preview_chars)?;
    }

    // ── Analyse ──────────────────────────────────────────────────────────
    let analysis = if cli.extract_only {
        None
    } else {
        Some(
            summarize_and_analyze(&extracted.text, &config)
                .await
                .map_err(fail)?,
        )
    };

    if cli.json {
        let report = SessionReport {
            extracted: &extracted,
            saved_to: cli.save_text.as_ref(),
            analysis: analysis.as_ref(),
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(ref analysis) = analysis {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle).context("Failed to write to stdout")?;
        handle
            .write_all(analysis.report.to_markdown().as_bytes())
            .context("Failed to write to stdout")?;

        if !cli.quiet {
            eprintln!(
                "   {} tokens in  /  {} tokens out  —  {}ms",
                dim(&analysis.input_tokens.to_string()),
                dim(&analysis.output_tokens.to_string()),
                analysis.duration_ms,
            );
        }
    }

    Ok(())
}

/// Attach the user-facing headline to a library error.
fn fail(e: SummaizeError) -> anyhow::Error {
    let headline = e.headline();
    anyhow::Error::new(e).context(red(&format!("✘ {headline}")))
}

/// Only local PDF files need the pdfium engine.
fn needs_pdf_engine(source: &InputSource) -> bool {
    match source {
        InputSource::File { name, .. } => matches!(detect_kind(name), Ok(DocumentKind::Pdf)),
        InputSource::Url(_) => false,
    }
}

fn render_preview(extracted: &ExtractedText, max_chars: usize) -> String {
    let mut out = String::from("## Extracted Text Preview\n");
    if let Some(ref title) = extracted.title {
        out.push_str(&format!("\n**{title}**\n"));
    }
    out.push_str(&format!("\n{}\n", extracted.preview(max_chars)));
    if extracted.char_count() > max_chars {
        out.push_str(&format!(
            "\n[… {} more characters; use --save-text for the full text]\n",
            extracted.char_count() - max_chars
        ));
    }
    out
}

fn print_preview(extracted: &ExtractedText, max_chars: usize) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(render_preview(extracted, max_chars).as_bytes())
        .context("Failed to write to stdout")
}

/// Make sure a pdfium library is present, downloading it on first use.
fn ensure_pdf_engine(quiet: bool) -> Result<()> {
    if !pdfium_auto::is_pdfium_cached() {
        if quiet {
            tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
                .context("Failed to download PDFium engine")?;
        } else {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(SPINNER_TICKS),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            let bar = dl_bar.clone();
            tokio::task::block_in_place(|| {
                pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
                    if let Some(t) = total {
                        if bar.length().unwrap_or(0) != t {
                            bar.set_length(t);
                        }
                    }
                    bar.set_position(downloaded);
                }))
            })
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        }
    }

    Ok(())
}

/// Map CLI args to `SummaizeConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaizeConfig> {
    let mut builder = SummaizeConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .ocr_engine(cli.ocr_engine.clone().into())
        .tesseract_cmd(cli.tesseract_cmd.clone())
        .ocr_language(cli.ocr_lang.clone())
        .preview_chars(cli.preview_chars)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref path) = cli.prompt {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt template from {:?}", path))?;
        builder = builder.prompt_template(template);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
