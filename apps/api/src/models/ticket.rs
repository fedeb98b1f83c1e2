use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketRow {
    pub id: i64,
    pub student_id: i64,
    /// "technical" | "non-technical"
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub ticket_type: String,
    /// open | assigned | resolved | closed
    pub status: String,
    /// low | normal | high | urgent
    pub priority: String,
    pub subject: String,
    pub description: String,
    /// Originating AI recommendation, when the ticket came out of an analysis.
    pub source_ai_id: Option<i64>,
    /// Staff username/email.
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
