//! Chat-model access: provider resolution and a single non-retrying call.
//!
//! Every prompt the tool sends lives in [`crate::prompts`]; this module only
//! knows how to find a provider and turn its errors into [`SummaizeError`].

use crate::config::SummaizeConfig;
use crate::error::SummaizeError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A model reply with its token usage.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Send `messages` once and wait for the reply.
///
/// No retry: a failed call is reported to the user as-is.
pub async fn chat(
    provider: &Arc<dyn LLMProvider>,
    messages: &[ChatMessage],
    temperature: f32,
    max_tokens: usize,
) -> Result<ChatReply, SummaizeError> {
    let start = Instant::now();
    let options = build_options(temperature, max_tokens);

    let response = provider
        .chat(messages, Some(&options))
        .await
        .map_err(|e| SummaizeError::LlmApiError {
            message: e.to_string(),
        })?;

    let duration = start.elapsed();
    debug!(
        "{} input tokens, {} output tokens, {:?}",
        response.prompt_tokens, response.completion_tokens, duration
    );

    Ok(ChatReply {
        content: response.content,
        input_tokens: response.prompt_tokens,
        output_tokens: response.completion_tokens,
        duration_ms: duration.as_millis() as u64,
    })
}

fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, SummaizeError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SummaizeError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Named provider** (`config.provider_name`) — built by
///    [`ProviderFactory::create_llm_provider`], which reads the matching
///    API key (`OPENAI_API_KEY`, etc.) from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 4. **OpenAI** whenever `OPENAI_API_KEY` is set.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &SummaizeConfig) -> Result<Arc<dyn LLMProvider>, SummaizeError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.model_or_default());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", config.model_or_default());
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| SummaizeError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY (a .env file works too) or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
