mod agent;
mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod tickets;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::LlmAgent;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Helpdesk AI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and bootstrap the schema
    let db = create_pool(&config.database_url).await?;
    db::init_schema(&db).await?;

    // Initialize the completion client and the agent behind it
    let llm = LlmClient::new(config.openai_api_key.clone(), config.llm_timeout_secs);
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::DEFAULT_MODEL,
        config.llm_timeout_secs
    );
    let llm_agent = Arc::new(LlmAgent::new(llm));

    if config.internal_api_token.is_none() {
        info!("INTERNAL_API_TOKEN not set; bearer auth is disabled");
    }

    // Build app state
    let state = AppState {
        db,
        agent: llm_agent,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer from the comma-separated origin list.
/// "*" keeps the permissive default used in development.
fn build_cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
