//! Summarise-and-analyse: one prompt, one model call, one split.
//!
//! The model is asked for five summary bullets and a bias verdict introduced
//! by the literal label `Bias:`. The response is split at the first
//! occurrence of that label. This depends on the model following the
//! instruction; when it doesn't, the whole response is shown unsplit.

use crate::config::SummaizeConfig;
use crate::error::{Stage, SummaizeError};
use crate::output::{AnalysisOutput, AnalysisReport};
use crate::pipeline::llm;
use crate::prompts::build_analysis_prompt;
use edgequake_llm::ChatMessage;
use tracing::{info, warn};

/// Label separating the summary from the bias verdict.
pub const BIAS_MARKER: &str = "Bias:";

/// Split a model response at the first [`BIAS_MARKER`].
///
/// Both halves are trimmed. A response without the marker is returned
/// unsplit, unchanged.
pub fn split_response(raw: &str) -> AnalysisReport {
    match raw.split_once(BIAS_MARKER) {
        Some((summary, bias)) => AnalysisReport::Split {
            summary: summary.trim().to_string(),
            bias: bias.trim().to_string(),
        },
        None => AnalysisReport::Unsplit {
            result: raw.to_string(),
        },
    }
}

/// Ask the configured model to summarise `text` and judge its bias.
///
/// Refuses empty text before any network call. The call is awaited to
/// completion and is not retried.
pub async fn summarize_and_analyze(
    text: &str,
    config: &SummaizeConfig,
) -> Result<AnalysisOutput, SummaizeError> {
    let result = run_analysis(text, config).await;
    if let (Err(e), Some(cb)) = (&result, &config.progress_callback) {
        cb.on_error(&e.to_string());
    }
    result
}

async fn run_analysis(text: &str, config: &SummaizeConfig) -> Result<AnalysisOutput, SummaizeError> {
    if text.trim().is_empty() {
        return Err(SummaizeError::EmptyText {
            source_label: "the input".into(),
            stage: Stage::Analysis,
        });
    }

    let provider = llm::resolve_provider(config)?;
    let model = config.model_or_default().to_string();
    let prompt = build_analysis_prompt(text, config.prompt_template.as_deref());

    if let Some(ref cb) = config.progress_callback {
        cb.on_analysis_start(&model, text.chars().count());
    }
    info!("Analyzing {} chars with {}", text.len(), model);

    let messages = vec![ChatMessage::user(prompt)];
    let reply = llm::chat(&provider, &messages, config.temperature, config.max_tokens).await?;

    let report = split_response(&reply.content);
    if !report.is_split() {
        warn!("Model response has no '{}' marker; showing it unsplit", BIAS_MARKER);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_analysis_complete(report.is_split());
    }

    Ok(AnalysisOutput {
        report,
        raw_response: reply.content,
        model,
        input_tokens: reply.input_tokens,
        output_tokens: reply.output_tokens,
        duration_ms: reply.duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SessionProgressCallback;
    use async_trait::async_trait;
    use edgequake_llm::{CompletionOptions, LLMProvider, LLMResponse};
    use std::sync::{Arc, Mutex};

    /// Replies with a fixed text and records every message it is sent.
    struct ScriptedProvider {
        reply: String,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedProvider {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        fn max_context_length(&self) -> usize {
            8192
        }

        async fn complete(&self, _prompt: &str) -> edgequake_llm::Result<LLMResponse> {
            Ok(LLMResponse::new(self.reply.clone(), "scripted-model").with_usage(42, 17))
        }

        async fn complete_with_options(
            &self,
            prompt: &str,
            _options: &CompletionOptions,
        ) -> edgequake_llm::Result<LLMResponse> {
            self.complete(prompt).await
        }

        async fn chat(
            &self,
            messages: &[ChatMessage],
            _options: Option<&CompletionOptions>,
        ) -> edgequake_llm::Result<LLMResponse> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            self.complete("").await
        }
    }

    #[derive(Default)]
    struct AnalysisEvents {
        started: Mutex<Option<(String, usize)>>,
        completed: Mutex<Option<bool>>,
    }

    impl SessionProgressCallback for AnalysisEvents {
        fn on_analysis_start(&self, model: &str, text_chars: usize) {
            *self.started.lock().unwrap() = Some((model.to_string(), text_chars));
        }

        fn on_analysis_complete(&self, split: bool) {
            *self.completed.lock().unwrap() = Some(split);
        }
    }

    #[tokio::test]
    async fn analysis_sends_prompt_and_splits_reply() {
        let provider = ScriptedProvider::new(
            "- The park was approved.\n- Funding is secured.\n\nBias: Neutral, factual reporting.",
        );
        let events = Arc::new(AnalysisEvents::default());
        let config = SummaizeConfig::builder()
            .provider(provider.clone())
            .model("gpt-4o-mini")
            .progress_callback(events.clone())
            .build()
            .unwrap();

        let text = "The council approved the new park.";
        let out = summarize_and_analyze(text, &config).await.unwrap();

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "exactly one message per analysis");
        assert!(seen[0].content.contains(text));
        assert!(seen[0].content.contains(BIAS_MARKER));

        assert_eq!(
            out.report,
            AnalysisReport::Split {
                summary: "- The park was approved.\n- Funding is secured.".into(),
                bias: "Neutral, factual reporting.".into(),
            }
        );
        assert_eq!(out.model, "gpt-4o-mini");
        assert_eq!(out.input_tokens, 42);
        assert_eq!(out.output_tokens, 17);
        assert!(out.raw_response.starts_with("- The park"));

        assert_eq!(
            *events.started.lock().unwrap(),
            Some(("gpt-4o-mini".to_string(), text.chars().count()))
        );
        assert_eq!(*events.completed.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn reply_without_marker_is_reported_unsplit() {
        let reply = "1. Point one\n2. Point two\nThe tone is neutral.";
        let events = Arc::new(AnalysisEvents::default());
        let config = SummaizeConfig::builder()
            .provider(ScriptedProvider::new(reply))
            .progress_callback(events.clone())
            .build()
            .unwrap();

        let out = summarize_and_analyze("Some article text.", &config).await.unwrap();

        assert_eq!(
            out.report,
            AnalysisReport::Unsplit {
                result: reply.to_string()
            }
        );
        assert_eq!(out.model, crate::config::DEFAULT_MODEL);
        assert_eq!(*events.completed.lock().unwrap(), Some(false));
    }

    #[test]
    fn splits_at_marker_into_two_non_empty_parts() {
        let raw = "- Point one\n- Point two\n\nBias: Slightly positive toward the council.";
        match split_response(raw) {
            AnalysisReport::Split { summary, bias } => {
                assert_eq!(summary, "- Point one\n- Point two");
                assert_eq!(bias, "Slightly positive toward the council.");
            }
            other => panic!("expected Split, got {other:?}"),
        }
    }

    #[test]
    fn splits_only_at_first_marker() {
        let raw = "Summary here.\nBias: Neutral. Note: the quote \"Bias: none\" is the mayor's.";
        match split_response(raw) {
            AnalysisReport::Split { summary, bias } => {
                assert_eq!(summary, "Summary here.");
                assert_eq!(bias, "Neutral. Note: the quote \"Bias: none\" is the mayor's.");
            }
            other => panic!("expected Split, got {other:?}"),
        }
    }

    #[test]
    fn marker_is_case_sensitive() {
        let raw = "1. Summary\n2. bias: neutral";
        assert_eq!(
            split_response(raw),
            AnalysisReport::Unsplit {
                result: raw.to_string()
            }
        );
    }

    #[test]
    fn response_without_marker_is_unsplit_and_unchanged() {
        let raw = "  1. The article covers X.\n2. Overall tone is neutral.  ";
        assert_eq!(
            split_response(raw),
            AnalysisReport::Unsplit {
                result: raw.to_string()
            }
        );
    }

    #[derive(Default)]
    struct ErrorRecorder(Mutex<Vec<String>>);

    impl SessionProgressCallback for ErrorRecorder {
        fn on_error(&self, error: &str) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    #[tokio::test]
    async fn empty_text_refused_before_any_call() {
        let recorder = Arc::new(ErrorRecorder::default());
        let config = SummaizeConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();

        let err = summarize_and_analyze("  \n\t", &config).await.unwrap_err();
        assert!(matches!(err, SummaizeError::EmptyText { .. }));
        assert_eq!(err.stage(), Stage::Analysis);
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }
}
