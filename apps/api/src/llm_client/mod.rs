//! Generator client: the single boundary between the audit engine and any text
//! completion backend.
//!
//! ARCHITECTURAL RULE: No other module may talk to a model server directly.
//! History parsing and the regeneration loop only ever see `dyn Generator`.
//!
//! Two backends ship: `AnthropicGenerator` (cloud) and `OllamaGenerator` (local inference).
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod anthropic;
pub mod ollama;
pub mod prompts;

pub use anthropic::AnthropicGenerator;
pub use ollama::OllamaGenerator;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Generator unavailable: {0}")]
    Unavailable(String),
}

/// Sampling options forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 4000,
        }
    }
}

/// One completion request. `model` is chosen per call so a single backend can serve
/// several models (e.g. a small one for history parsing, a larger one for drafting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorRequest {
    pub model: String,
    pub prompt: String,
    pub options: GeneratorOptions,
}

/// The completion contract. `Ok(text)` is a successful completion; any `Err` is a failed
/// call, whether transport, API status, or an empty body.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, request: &GeneratorRequest) -> Result<String, LlmError>;

    /// Short backend label for logs ("anthropic", "ollama", ...).
    fn backend(&self) -> &'static str;
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json)?\s*").unwrap());

/// Removes every ```` ```json ```` / ```` ``` ```` marker, wherever it appears.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text.trim(), "").into_owned()
}

/// Returns the outermost `{ ... }` span, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    outermost_span(text, '{', '}')
}

/// Returns the outermost `[ ... ]` span, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    outermost_span(text, '[', ']')
}

fn outermost_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}\n");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(input).trim(), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_object_ignores_surrounding_prose() {
        let input = "Here you go:\n{\"a\": {\"b\": 1}}\nHope that helps!";
        assert_eq!(extract_json_object(input), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_json_object_missing() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_extract_json_array() {
        let input = "positions: [{\"position\": \"Engineer\"}] done";
        assert_eq!(extract_json_array(input), Some("[{\"position\": \"Engineer\"}]"));
    }

    #[test]
    fn test_default_options() {
        let options = GeneratorOptions::default();
        assert_eq!(options.max_output_tokens, 4000);
        assert!((options.temperature - 0.3).abs() < f32::EPSILON);
    }
}
