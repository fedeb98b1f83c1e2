use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One analyzed complaint: the input, the routing verdict, and both the
/// compact UI projection and the full raw model JSON as opaque blobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiRecommendationRow {
    pub id: i64,
    pub student_id: i64,
    pub input_text: String,
    pub category: Option<String>,
    pub is_technical: bool,
    pub ui_json: String,
    pub raw_json: String,
    pub created_at: DateTime<Utc>,
}
