//! Axum route handlers for history parsing and title matching.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::history::matcher::{match_position, MatchTier};
use crate::history::models::{HistoryParseResult, PositionRecord};
use crate::history::parser::parse_history;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseHistoryRequest {
    pub text: String,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchPositionRequest {
    pub title: String,
    pub history: Vec<PositionRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPositionResponse {
    #[serde(rename = "match")]
    pub record: Option<PositionRecord>,
    pub index: Option<usize>,
    pub tier: Option<MatchTier>,
}

/// POST /api/v1/history/parse
pub async fn handle_parse_history(
    State(state): State<AppState>,
    Json(req): Json<ParseHistoryRequest>,
) -> Result<Json<HistoryParseResult>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let model = req.model.unwrap_or_else(|| state.config.default_model.clone());
    let result = parse_history(Some(state.generator.as_ref()), &model, &req.text).await;
    Ok(Json(result))
}

/// POST /api/v1/positions/match
pub async fn handle_match_position(
    State(state): State<AppState>,
    Json(req): Json<MatchPositionRequest>,
) -> Result<Json<MatchPositionResponse>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    let found = match_position(&req.title, &req.history, &state.config.validation.matcher);
    Ok(Json(MatchPositionResponse {
        record: found.map(|m| m.record.clone()),
        index: found.map(|m| m.index),
        tier: found.map(|m| m.tier),
    }))
}
