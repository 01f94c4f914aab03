use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored assessment, one per interview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub user_id: String,
    pub total_score: f64,
    /// `[{name, score, comment}]`, kept as jsonb.
    pub category_scores: Value,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: DateTime<Utc>,
}
