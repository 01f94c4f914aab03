use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generator::{create_feedback, find_feedback};
use crate::models::feedback::FeedbackRow;
use crate::session::collaborators::{CreateFeedbackRequest, FeedbackResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback: FeedbackRow,
}

/// POST /api/v1/feedback
///
/// Malformed bodies get the same 400 as semantically invalid ones.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResult>, AppError> {
    let Json(req) = body.map_err(|rejection| {
        warn!("Rejected feedback body: {rejection}");
        AppError::Validation("Missing or invalid parameters".to_string())
    })?;

    let row = create_feedback(&state.db, &state.llm, &req).await?;
    let feedback = serde_json::to_value(&row).map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(FeedbackResult::saved(row.id.to_string(), feedback)))
}

/// GET /api/v1/feedback/:interview_id
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let feedback = find_feedback(&state.db, interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;
    Ok(Json(FeedbackResponse {
        success: true,
        feedback,
    }))
}
