use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::resume::analyzer::{analyze_resume, extract_pdf_text, ResumeFeedback};
use crate::state::AppState;

const MISSING_INPUT: &str = "Missing resume or job description.";

/// Request body cap for the resume upload, applied on the route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Serialize)]
pub struct ResumeReviewResponse {
    pub feedback: ResumeFeedback,
}

/// POST /api/v1/resume/analyze
///
/// Multipart fields: `resume` (PDF file) and `jobDescription` (text).
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeReviewResponse>, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("resume") => {
                resume = Some(field.bytes().await.map_err(multipart_error)?);
            }
            Some("jobDescription") => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    let resume = resume
        .filter(|pdf| !pdf.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_INPUT.to_string()))?;
    let job_description = job_description
        .map(|jd| jd.trim().to_string())
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_INPUT.to_string()))?;

    let resume_text = extract_pdf_text(resume).await?;
    let feedback = analyze_resume(&state.llm, &resume_text, &job_description).await?;

    Ok(Json(ResumeReviewResponse { feedback }))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "Resume upload is too large (limit {} MB).",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ));
    }
    AppError::Validation(err.body_text())
}
