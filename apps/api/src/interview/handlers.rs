use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::generator::{generate_interview, GenerateInterviewRequest};
use crate::interview::store::{find_interview, list_interviews};
use crate::models::interview::InterviewRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInterviewResponse {
    pub success: bool,
    pub interview_id: Uuid,
}

#[derive(Serialize)]
pub struct InterviewResponse {
    pub success: bool,
    pub interview: InterviewRow,
}

#[derive(Serialize)]
pub struct InterviewListResponse {
    pub success: bool,
    pub interviews: Vec<InterviewRow>,
}

#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
}

/// POST /api/v1/interviews/generate
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    Json(req): Json<GenerateInterviewRequest>,
) -> Result<Json<GenerateInterviewResponse>, AppError> {
    let interview_id = generate_interview(&state.db, &state.llm, &req).await?;
    Ok(Json(GenerateInterviewResponse {
        success: true,
        interview_id,
    }))
}

/// GET /api/v1/interviews?user_id=
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<InterviewListResponse>, AppError> {
    if params.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    let interviews = list_interviews(&state.db, params.user_id.trim()).await?;
    Ok(Json(InterviewListResponse {
        success: true,
        interviews,
    }))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewResponse>, AppError> {
    let interview = find_interview(&state.db, interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    Ok(Json(InterviewResponse {
        success: true,
        interview,
    }))
}

/// PATCH /api/v1/interviews/:id/taken
pub async fn handle_mark_taken(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    state.interviews.mark_taken(interview_id).await?;
    Ok(Json(Ack { success: true }))
}
