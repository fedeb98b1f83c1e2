//! sqlx persistence for students, AI recommendations, and tickets.
//! One statement per operation; commit semantics are per-request.

use sqlx::PgPool;

use crate::agent::types::UiView;
use crate::errors::AppError;
use crate::models::ai_record::AiRecommendationRow;
use crate::models::student::StudentRow;
use crate::models::ticket::TicketRow;

/// Looks a student up by external id, inserting a bare row when unknown.
pub async fn get_or_create_student(
    pool: &PgPool,
    external_id: &str,
) -> Result<StudentRow, AppError> {
    let existing = sqlx::query_as::<_, StudentRow>(
        "SELECT * FROM students WHERE external_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    if let Some(student) = existing {
        return Ok(student);
    }

    let created = sqlx::query_as::<_, StudentRow>(
        "INSERT INTO students (external_id) VALUES ($1) RETURNING *",
    )
    .bind(external_id)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Persists one analyzed complaint and returns its row id, which the
/// frontend attaches when opening a ticket from the analysis.
pub async fn insert_ai_record(
    pool: &PgPool,
    student_id: i64,
    input_text: &str,
    ui: &UiView,
    raw: &serde_json::Value,
) -> Result<i64, AppError> {
    let ui_json =
        serde_json::to_string(ui).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    let raw_json =
        serde_json::to_string(raw).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO ai_recommendations
            (student_id, input_text, category, is_technical, ui_json, raw_json)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(student_id)
    .bind(input_text)
    .bind(ui.category.as_deref())
    .bind(ui.is_technical)
    .bind(ui_json)
    .bind(raw_json)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// True when the given AI recommendation row exists. Used to silently drop
/// dangling `ai_record_id` references on ticket creation.
pub async fn ai_record_exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    Ok(get_ai_record(pool, id).await?.is_some())
}

pub async fn get_ai_record(
    pool: &PgPool,
    id: i64,
) -> Result<Option<AiRecommendationRow>, AppError> {
    let row =
        sqlx::query_as::<_, AiRecommendationRow>("SELECT * FROM ai_recommendations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub struct NewTicket<'a> {
    pub student_id: i64,
    pub ticket_type: &'a str,
    pub subject: &'a str,
    pub description: &'a str,
    pub source_ai_id: Option<i64>,
}

pub async fn create_ticket(pool: &PgPool, ticket: NewTicket<'_>) -> Result<TicketRow, AppError> {
    let row = sqlx::query_as::<_, TicketRow>(
        r#"
        INSERT INTO tickets (student_id, type, status, priority, subject, description, source_ai_id)
        VALUES ($1, $2, 'open', 'normal', $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(ticket.student_id)
    .bind(ticket.ticket_type)
    .bind(ticket.subject)
    .bind(ticket.description)
    .bind(ticket.source_ai_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_ticket(pool: &PgPool, id: i64) -> Result<Option<TicketRow>, AppError> {
    let row = sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lists tickets, optionally filtered by status and/or the student's
/// internal id. Callers resolve external student ids first.
pub async fn list_tickets(
    pool: &PgPool,
    student_id: Option<i64>,
    status: Option<&str>,
) -> Result<Vec<TicketRow>, AppError> {
    let rows = match (student_id, status) {
        (Some(sid), Some(st)) => {
            sqlx::query_as::<_, TicketRow>(
                "SELECT * FROM tickets WHERE student_id = $1 AND status = $2 ORDER BY id",
            )
            .bind(sid)
            .bind(st)
            .fetch_all(pool)
            .await?
        }
        (Some(sid), None) => {
            sqlx::query_as::<_, TicketRow>(
                "SELECT * FROM tickets WHERE student_id = $1 ORDER BY id",
            )
            .bind(sid)
            .fetch_all(pool)
            .await?
        }
        (None, Some(st)) => {
            sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE status = $1 ORDER BY id")
                .bind(st)
                .fetch_all(pool)
                .await?
        }
        (None, None) => {
            sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets ORDER BY id")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

/// Finds a student by external id without creating one.
pub async fn find_student(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<StudentRow>, AppError> {
    let row = sqlx::query_as::<_, StudentRow>(
        "SELECT * FROM students WHERE external_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
