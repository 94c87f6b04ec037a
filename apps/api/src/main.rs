mod config;
mod errors;
mod generation;
mod history;
mod llm_client;
mod routes;
mod state;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, GeneratorBackend};
use crate::llm_client::{AnthropicGenerator, Generator, OllamaGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume audit API v{}", env!("CARGO_PKG_VERSION"));

    let generator = build_generator(&config)?;
    info!(
        backend = generator.backend(),
        model = %config.default_model,
        "Generator initialized"
    );
    info!(
        reference_year = config.validation.reference_year,
        max_attempts = config.max_generation_attempts,
        "Validation configured"
    );

    let state = AppState {
        generator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_generator(config: &Config) -> Result<Arc<dyn Generator>> {
    let generator: Arc<dyn Generator> = match config.backend {
        GeneratorBackend::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the anthropic backend")?;
            Arc::new(AnthropicGenerator::new(api_key)?)
        }
        GeneratorBackend::Ollama => Arc::new(OllamaGenerator::new(&config.ollama_base_url)?),
    };
    Ok(generator)
}
