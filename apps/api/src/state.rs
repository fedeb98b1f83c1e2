use std::sync::Arc;

use sqlx::PgPool;

use crate::agent::ComplaintAgent;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable complaint analyzer. Default: the OpenAI-backed `LlmAgent`.
    pub agent: Arc<dyn ComplaintAgent>,
    pub config: Config,
}
