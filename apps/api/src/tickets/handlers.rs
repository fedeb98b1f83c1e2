//! Axum route handlers for the Tickets API.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::auth::require_bearer;
use crate::errors::AppError;
use crate::models::ticket::TicketRow;
use crate::state::AppState;
use crate::tickets::store;

#[derive(Debug, Deserialize)]
pub struct TicketCreateRequest {
    /// External id, e.g. "u123".
    pub student_id: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub text: String,
    /// Optional link back to the analysis, e.g. `{ "ai_record_id": 42 }`.
    #[serde(default)]
    pub ai_context: Option<AiContext>,
}

#[derive(Debug, Deserialize)]
pub struct AiContext {
    #[serde(default)]
    pub ai_record_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TicketListQuery {
    pub student_id: Option<String>,
    pub status: Option<String>,
}

/// POST /api/tickets
///
/// Creates and persists a ticket. Subject is derived from the first line of
/// the text; the AI recommendation link is kept only when the referenced row
/// actually exists.
pub async fn handle_create_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TicketCreateRequest>,
) -> Result<Json<TicketRow>, AppError> {
    require_bearer(&headers, state.config.internal_api_token.as_deref())?;

    if request.ticket_type != "technical" && request.ticket_type != "non-technical" {
        return Err(AppError::Validation(
            "type must be 'technical' or 'non-technical'".to_string(),
        ));
    }

    let student = store::get_or_create_student(&state.db, &request.student_id).await?;

    let mut source_ai_id = request.ai_context.as_ref().and_then(|c| c.ai_record_id);
    if let Some(id) = source_ai_id {
        if !store::ai_record_exists(&state.db, id).await? {
            source_ai_id = None; // ignore invalid references
        }
    }

    let description = request.text.trim();
    let subject = derive_subject(description);

    let ticket = store::create_ticket(
        &state.db,
        store::NewTicket {
            student_id: student.id,
            ticket_type: &request.ticket_type,
            subject: &subject,
            description,
            source_ai_id,
        },
    )
    .await?;

    Ok(Json(ticket))
}

/// GET /api/tickets/:id
pub async fn handle_get_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticket_id): Path<i64>,
) -> Result<Json<TicketRow>, AppError> {
    require_bearer(&headers, state.config.internal_api_token.as_deref())?;

    let ticket = store::get_ticket(&state.db, ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id} not found")))?;
    Ok(Json(ticket))
}

/// GET /api/tickets?student_id=&status=
pub async fn handle_list_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TicketListQuery>,
) -> Result<Json<Vec<TicketRow>>, AppError> {
    require_bearer(&headers, state.config.internal_api_token.as_deref())?;

    let student_id = match params.student_id.as_deref() {
        Some(external_id) => match store::find_student(&state.db, external_id).await? {
            Some(student) => Some(student.id),
            // Unknown student: nothing to list
            None => return Ok(Json(Vec::new())),
        },
        None => None,
    };

    let tickets = store::list_tickets(&state.db, student_id, params.status.as_deref()).await?;
    Ok(Json(tickets))
}

/// First line of the complaint, capped at 100 chars, as the ticket subject.
fn derive_subject(text: &str) -> String {
    let first_line = text.trim().lines().next().unwrap_or("").trim();
    let subject: String = first_line.chars().take(100).collect();
    if subject.is_empty() {
        "Student complaint".to_string()
    } else {
        subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_is_first_line() {
        let subject = derive_subject("My laptop cannot run the lab VM\nIt crashes on boot.");
        assert_eq!(subject, "My laptop cannot run the lab VM");
    }

    #[test]
    fn test_subject_truncated_to_100_chars() {
        let long = "x".repeat(250);
        assert_eq!(derive_subject(&long).chars().count(), 100);
    }

    #[test]
    fn test_empty_text_gets_default_subject() {
        assert_eq!(derive_subject("   \n  "), "Student complaint");
    }

    #[test]
    fn test_ai_context_is_optional_in_request() {
        let request: TicketCreateRequest = serde_json::from_str(
            r#"{"student_id": "u123", "type": "technical", "text": "broken build"}"#,
        )
        .unwrap();
        assert!(request.ai_context.is_none());

        let request: TicketCreateRequest = serde_json::from_str(
            r#"{"student_id": "u123", "type": "technical", "text": "broken build",
                "ai_context": {"ai_record_id": 42, "prefill": "ignored"}}"#,
        )
        .unwrap();
        assert_eq!(request.ai_context.unwrap().ai_record_id, Some(42));
    }
}
