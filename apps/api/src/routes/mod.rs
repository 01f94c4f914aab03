pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview Store + question generation
        .route(
            "/api/v1/interviews",
            get(interview::handle_list_interviews),
        )
        .route(
            "/api/v1/interviews/generate",
            post(interview::handle_generate_interview),
        )
        .route("/api/v1/interviews/:id", get(interview::handle_get_interview))
        .route(
            "/api/v1/interviews/:id/taken",
            patch(interview::handle_mark_taken),
        )
        // Feedback Store/Generator
        .route("/api/v1/feedback", post(feedback::handle_create_feedback))
        .route(
            "/api/v1/feedback/:interview_id",
            get(feedback::handle_get_feedback),
        )
        // Resume review
        .route(
            "/api/v1/resume/analyze",
            post(resume::handle_analyze_resume)
                .layer(DefaultBodyLimit::max(resume::MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
