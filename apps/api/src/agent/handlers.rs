//! Axum route handler for the complaint analysis endpoint.

use std::time::Instant;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::agent::shaper::shape_for_ui;
use crate::agent::types::UiView;
use crate::agent::CompletionOptions;
use crate::auth::require_bearer;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tickets::store::{get_or_create_student, insert_ai_record};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub student_id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Full raw model JSON, for auditing and the expandable debug view.
    pub raw: Value,
    pub ui: UiView,
    pub latency_ms: u64,
}

/// POST /api/ai/analyze
///
/// Pipeline: completion call → UI shaping → persist student + AI record →
/// return `{raw, ui, latency_ms}` with `ui.ai_record_id` stamped so the
/// frontend can link a ticket back to this analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_bearer(&headers, state.config.internal_api_token.as_deref())?;
    validate_analyze_request(&request)?;

    let started = Instant::now();

    let options = CompletionOptions {
        max_tokens: 1400,
        ..Default::default()
    };
    let result = state.agent.analyze(&request.text, &options).await;

    // Provider failure: surface as a gateway error, nothing is persisted.
    if let Some(message) = result.error_message() {
        return Err(AppError::Llm(message.to_string()));
    }

    let mut ui = shape_for_ui(&result);

    let student = get_or_create_student(&state.db, &request.student_id).await?;
    let record_id =
        insert_ai_record(&state.db, student.id, &request.text, &ui, &result.raw_json()).await?;
    ui.ai_record_id = Some(record_id);

    let latency_ms = started.elapsed().as_millis() as u64;
    info!(
        "Analyzed complaint for student {} (record {record_id}, technical={}, {latency_ms}ms)",
        request.student_id, ui.is_technical
    );

    Ok(Json(AnalyzeResponse {
        raw: result.raw_json(),
        ui,
        latency_ms,
    }))
}

/// Length limits count characters, not bytes: complaints arrive in scripts
/// where a character is several UTF-8 bytes (Arabic in particular).
fn validate_analyze_request(request: &AnalyzeRequest) -> Result<(), AppError> {
    let id_chars = request.student_id.chars().count();
    if !(2..=64).contains(&id_chars) {
        return Err(AppError::Validation(
            "student_id must be 2..=64 characters".to_string(),
        ));
    }
    let text_chars = request.text.chars().count();
    if !(5..=8000).contains(&text_chars) {
        return Err(AppError::Validation(
            "text must be 5..=8000 characters".to_string(),
        ));
    }
    Ok(())
}
