use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::generation::generator::DEFAULT_MAX_ATTEMPTS;
use crate::llm_client::{anthropic, ollama};
use crate::validation::config::ValidationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    Anthropic,
    Ollama,
}

impl FromStr for GeneratorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(GeneratorBackend::Anthropic),
            "ollama" => Ok(GeneratorBackend::Ollama),
            other => bail!("Unknown generator backend '{other}' (expected anthropic or ollama)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub backend: GeneratorBackend,
    /// Only required for the anthropic backend.
    pub anthropic_api_key: Option<String>,
    pub ollama_base_url: String,
    pub default_model: String,
    pub max_generation_attempts: u32,
    /// Thresholds for every pipeline run, with env overrides applied.
    pub validation: ValidationConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = optional_env::<GeneratorBackend>("GENERATOR_BACKEND")?
            .unwrap_or(GeneratorBackend::Ollama);
        let anthropic_api_key = match backend {
            GeneratorBackend::Anthropic => Some(require_env("ANTHROPIC_API_KEY")?),
            GeneratorBackend::Ollama => std::env::var("ANTHROPIC_API_KEY").ok(),
        };
        let default_model = std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| {
            match backend {
                GeneratorBackend::Anthropic => anthropic::DEFAULT_MODEL,
                GeneratorBackend::Ollama => ollama::DEFAULT_MODEL,
            }
            .to_string()
        });

        let mut validation = match optional_env::<i32>("REFERENCE_YEAR")? {
            Some(year) => ValidationConfig::for_year(year),
            None => ValidationConfig::default(),
        };
        if let Some(v) = optional_env("MATCH_WORD_OVERLAP")? {
            validation.matcher.word_overlap_ratio = v;
        }
        if let Some(v) = optional_env("MATCH_MAX_EDIT_DISTANCE")? {
            validation.matcher.max_edit_distance = v;
        }
        if let Some(v) = optional_env("BULLET_CHAR_LIMIT")? {
            validation.bullet_char_limit = v;
        }
        if let Some(v) = optional_env("BULLET_CHAR_MIN")? {
            validation.bullet_char_min = v;
        }
        if let Some(v) = optional_env("SUMMARY_ECHO_RATIO")? {
            validation.summary_echo_ratio = v;
        }
        if let Some(v) = optional_env("PHRASE_REPEAT_MIN")? {
            validation.phrase_repeat_min = v;
        }

        Ok(Config {
            port: optional_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            backend,
            anthropic_api_key,
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| ollama::DEFAULT_BASE_URL.to_string()),
            default_model,
            max_generation_attempts: optional_env("MAX_GENERATION_ATTEMPTS")?
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            validation,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses `key` when set. Unset is `None`; set but unparseable is an error.
fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(None),
    }
}
