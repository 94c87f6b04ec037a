pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::history::handlers as history;
use crate::state::AppState;
use crate::validation::handlers as validation;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/history/parse", post(history::handle_parse_history))
        .route("/api/v1/positions/match", post(history::handle_match_position))
        .route("/api/v1/validate", post(validation::handle_validate))
        .route("/api/v1/generate", post(generation::handle_generate))
        .with_state(state)
}
