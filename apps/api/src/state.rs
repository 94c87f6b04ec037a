use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Generator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The configured completion backend. History parsing and generation both go through it.
    pub generator: Arc<dyn Generator>,
    pub config: Config,
}
