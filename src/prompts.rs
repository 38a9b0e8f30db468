//! Prompts sent to the chat model.
//!
//! Callers can override the analysis prompt via
//! [`crate::config::SummaizeConfig::prompt_template`]; the constants here are
//! used only when no override is provided.

use crate::analyze::BIAS_MARKER;

/// Default analysis prompt. `{text}` is replaced with the extracted text.
///
/// The second task asks for a `Bias:` label so the response can be split
/// into its summary and bias parts.
pub const ANALYSIS_PROMPT: &str = r#"Given the following text, perform two tasks:
1. Summarize the content in 5 bullet points.
2. Analyze if the article shows any noticeable bias (positive, negative, or neutral).
   Start this part on a new line with the label "Bias:".

Text:
{text}"#;

/// System prompt used by the `vision` OCR engine.
pub const OCR_SYSTEM_PROMPT: &str = r#"You are an OCR engine. Transcribe ALL text visible in the image exactly as written.

- Preserve reading order and line breaks
- Do not summarise, translate or correct the text
- Do not add commentary, headings or Markdown formatting
- If the image contains no text, answer with nothing"#;

/// Fill the analysis template with the extracted text.
///
/// `template` defaults to [`ANALYSIS_PROMPT`].
pub fn build_analysis_prompt(text: &str, template: Option<&str>) -> String {
    template.unwrap_or(ANALYSIS_PROMPT).replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_embeds_text_verbatim() {
        let text = "The council voted 7-2 to approve the {budget}.";
        let prompt = build_analysis_prompt(text, None);
        assert!(prompt.ends_with(text));
        assert!(prompt.contains("5 bullet points"));
        assert!(prompt.contains("positive, negative, or neutral"));
    }

    #[test]
    fn default_prompt_requests_bias_label() {
        assert!(ANALYSIS_PROMPT.contains(BIAS_MARKER));
    }

    #[test]
    fn custom_template_is_used() {
        let prompt = build_analysis_prompt("abc", Some("TL;DR please:\n{text}\nBias:"));
        assert_eq!(prompt, "TL;DR please:\nabc\nBias:");
    }
}
