mod analysis;
mod batch;
mod benefits;
mod chat;
mod config;
mod dispatch;
mod errors;
mod llm_client;
mod pool;
mod providers;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::llm_client::LlmClient;
use crate::providers::ProviderRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (also loads .env)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Load and validate AI provider declarations. An empty registry still starts;
    // task endpoints answer NO_MODEL_CONFIGURED until the environment is fixed.
    let registry = ProviderRegistry::from_env();
    registry.log_summary();

    // Initialize LLM client
    let llm = LlmClient::new(Duration::from_secs(config.request_timeout_secs))?;
    info!(
        "LLM client initialized (timeout: {}s)",
        config.request_timeout_secs
    );

    let state = AppState::new(Dispatcher::new(Arc::new(registry), Arc::new(llm)));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
