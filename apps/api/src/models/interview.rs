use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A generated question set. `taken` flips once feedback has been saved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: String,
    pub company: String,
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub questions: Vec<String>,
    pub finalized: bool,
    pub taken: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
