//! Complaint agent — the framework-agnostic core of the helpdesk.
//!
//! `run_completion` calls the model and returns its structured JSON (or a
//! failure value); `shape_for_ui` flattens that into the display shape. The
//! HTTP layer depends only on the `ComplaintAgent` capability, so tests and
//! alternative hosts can swap the LLM out.

pub mod commands;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod shaper;
pub mod types;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::agent::prompts::{build_user_message, COMPLAINT_SYSTEM_PROMPT};
use crate::llm_client::{LlmClient, DEFAULT_MODEL};

/// Per-call knobs for the completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
        }
    }
}

/// Outcome of one completion call. `Failed` is a value, not a panic or an
/// `Err`: the HTTP layer decides whether it becomes a 502.
#[derive(Debug, Clone)]
pub enum AgentResult {
    Structured(Value),
    Failed { message: String },
}

impl AgentResult {
    /// The raw JSON persisted alongside the UI view. Failures keep the
    /// `{error, raw: ""}` shape the frontend already understands.
    pub fn raw_json(&self) -> Value {
        match self {
            AgentResult::Structured(value) => value.clone(),
            AgentResult::Failed { message } => json!({"error": message, "raw": ""}),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AgentResult::Structured(_) => None,
            AgentResult::Failed { message } => Some(message),
        }
    }
}

/// Runs one completion call for a student complaint and returns the model's
/// structured JSON. Provider failures of any kind (connectivity, timeout,
/// rate limit, non-2xx, non-JSON output) come back as `AgentResult::Failed`.
pub async fn run_completion(
    llm: &LlmClient,
    complaint: &str,
    options: &CompletionOptions,
) -> AgentResult {
    let user_message = build_user_message(complaint);
    match llm
        .complete_json(
            &options.model,
            COMPLAINT_SYSTEM_PROMPT,
            &user_message,
            options.max_tokens,
        )
        .await
    {
        Ok(value) => AgentResult::Structured(value),
        Err(e) => {
            warn!("Completion call failed: {e}");
            AgentResult::Failed {
                message: format!("OpenAI API error: {e}"),
            }
        }
    }
}

/// The single "handle complaint" capability the HTTP layer is polymorphic
/// over. Mirrors the hosting-framework split: any adapter (axum today) only
/// needs something that can analyze a complaint.
#[async_trait]
pub trait ComplaintAgent: Send + Sync {
    async fn analyze(&self, complaint: &str, options: &CompletionOptions) -> AgentResult;
}

/// Production agent backed by the OpenAI completion client.
pub struct LlmAgent {
    llm: LlmClient,
}

impl LlmAgent {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ComplaintAgent for LlmAgent {
    async fn analyze(&self, complaint: &str, options: &CompletionOptions) -> AgentResult {
        run_completion(&self.llm, complaint, options).await
    }
}
