//! Axum route handler for one-shot validation of already generated content.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::profile::derive_profile;
use crate::history::models::PositionRecord;
use crate::state::AppState;
use crate::validation::issues::ValidationResult;
use crate::validation::models::{
    CandidateProfile, GeneratedContent, KeywordIntents, TargetDescription,
};
use crate::validation::pipeline::validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub content: GeneratedContent,
    #[serde(default)]
    pub history: Vec<PositionRecord>,
    #[serde(default)]
    pub target_description: TargetDescription,
    #[serde(default)]
    pub keywords: KeywordIntents,
    #[serde(default)]
    pub limitations: Vec<String>,
    /// Derived from `history` when absent.
    pub candidate_profile: Option<CandidateProfile>,
}

/// POST /api/v1/validate
///
/// An empty history is not a request error: the pipeline answers with its bypass result.
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>, AppError> {
    let config = &state.config.validation;
    let profile = req
        .candidate_profile
        .unwrap_or_else(|| derive_profile(&req.history, config.reference_year));

    let result = validate(
        &req.content,
        &req.history,
        &req.target_description,
        &req.keywords,
        &req.limitations,
        &profile,
        config,
    );
    Ok(Json(result))
}
