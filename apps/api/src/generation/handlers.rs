//! Axum route handler for the generation loop.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::generator::{generate, GenerationJob, GenerationOutcome};
use crate::generation::prompts::build_generation_prompt;
use crate::llm_client::GeneratorOptions;
use crate::state::AppState;
use crate::validation::models::{KeywordIntents, TargetDescription};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub model: Option<String>,
    /// Built from the history and job description when absent.
    pub base_prompt: Option<String>,
    pub history_text: String,
    pub target_description: TargetDescription,
    #[serde(default)]
    pub keywords: KeywordIntents,
    #[serde(default)]
    pub limitations: Vec<String>,
    pub options: Option<GeneratorOptions>,
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerationOutcome>, AppError> {
    if req.history_text.trim().is_empty() {
        return Err(AppError::Validation("historyText must not be empty".to_string()));
    }
    if req.target_description.text.trim().is_empty() {
        return Err(AppError::Validation(
            "targetDescription.text must not be empty".to_string(),
        ));
    }

    let config = &state.config;
    let base_prompt = req
        .base_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| {
            build_generation_prompt(
                &req.history_text,
                &req.target_description.text,
                &req.keywords,
                &config.validation,
            )
        });

    let job = GenerationJob {
        model: req.model.unwrap_or_else(|| config.default_model.clone()),
        base_prompt,
        history_text: req.history_text,
        target: req.target_description,
        keywords: req.keywords,
        limitations: req.limitations,
        options: req.options.unwrap_or_default(),
    };

    let outcome = generate(
        state.generator.as_ref(),
        &job,
        &config.validation,
        config.max_generation_attempts,
    )
    .await?;
    Ok(Json(outcome))
}
