//! Local inference backend for an Ollama server (`/api/generate`, non-streaming).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Generator, GeneratorRequest, LlmError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
/// Local inference is slow on consumer hardware.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

#[derive(Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn complete(&self, request: &GeneratorRequest) -> Result<String, LlmError> {
        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.options.temperature,
                num_predict: request.options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Unavailable(format!(
                        "Failed to connect to Ollama at {}. Is it running?",
                        self.base_url
                    ))
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaGenerateResponse = response.json().await?;
        debug!(
            model = %request.model,
            eval_count = ?parsed.eval_count,
            "Ollama generate succeeded"
        );

        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(parsed.response)
    }

    fn backend(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        let generator = OllamaGenerator::new("http://localhost:11434/").unwrap();
        assert_eq!(generator.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_request_body_is_non_streaming() {
        let body = OllamaGenerateRequest {
            model: DEFAULT_MODEL,
            prompt: "hello",
            stream: false,
            options: OllamaOptions {
                temperature: 0.0,
                num_predict: 4000,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 4000);
    }

    #[test]
    fn test_response_defaults_missing_fields() {
        let parsed: OllamaGenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_empty());
        assert!(parsed.eval_count.is_none());
    }
}
