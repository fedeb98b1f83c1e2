use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Missing required variables (notably the OpenAI key) fail at startup,
/// never at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    /// Bearer token required on API routes. Auth is disabled when unset.
    pub internal_api_token: Option<String>,
    /// Comma-separated allowed origins; "*" means permissive.
    pub cors_origins: String,
    /// Wall-clock limit on a single completion call, in seconds.
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            internal_api_token: std::env::var("INTERNAL_API_TOKEN").ok(),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT")
                .unwrap_or_else(|_| "25".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
