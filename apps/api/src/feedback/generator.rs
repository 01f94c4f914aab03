//! Transcript assessment.
//!
//! Flow: validate request → check interview exists → LLM assessment →
//!       normalise scores → upsert keyed by interview.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};
use crate::interview::store::find_interview;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::models::feedback::FeedbackRow;
use crate::session::collaborators::CreateFeedbackRequest;
use crate::session::transcript::TranscriptEntry;

/// Fixed scoring rubric. Names must match exactly.
pub const CATEGORIES: [&str; 5] = [
    "Communication Skills",
    "Technical Knowledge",
    "Problem Solving",
    "Cultural Fit",
    "Confidence and Clarity",
];

const INVALID_PARAMETERS: &str = "Missing or invalid parameters";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub comment: String,
}

/// The model's assessment, in the wire shape the prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    pub total_score: f64,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

pub fn validate_request(request: &CreateFeedbackRequest) -> Result<(), AppError> {
    if request.interview_id.is_nil()
        || request.user_id.trim().is_empty()
        || request.transcript.is_empty()
    {
        return Err(AppError::Validation(INVALID_PARAMETERS.to_string()));
    }
    Ok(())
}

/// One `role: content` line per utterance.
pub fn format_transcript(transcript: &[TranscriptEntry]) -> String {
    transcript
        .iter()
        .map(|entry| format!("{}: {}", entry.role.as_str(), entry.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(transcript: &[TranscriptEntry]) -> String {
    let categories = CATEGORIES
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{transcript}", &format_transcript(transcript))
        .replace("{categories}", &categories)
}

/// Clamps every score to 0–100 and, when categories are present, replaces
/// `total_score` with their average.
pub fn normalize(mut assessment: Assessment) -> Assessment {
    for category in &mut assessment.category_scores {
        category.score = clamp_score(category.score);
    }

    let missing: Vec<&str> = CATEGORIES
        .iter()
        .copied()
        .filter(|name| !assessment.category_scores.iter().any(|c| c.name == *name))
        .collect();
    if !missing.is_empty() {
        warn!("Assessment is missing categories: {}", missing.join(", "));
    }

    if assessment.category_scores.is_empty() {
        assessment.total_score = clamp_score(assessment.total_score);
    } else {
        let sum: f64 = assessment.category_scores.iter().map(|c| c.score).sum();
        assessment.total_score = (sum / assessment.category_scores.len() as f64).round();
    }
    assessment
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Scores the transcript and stores the result, replacing any earlier
/// assessment of the same interview.
pub async fn create_feedback(
    db: &PgPool,
    llm: &LlmClient,
    request: &CreateFeedbackRequest,
) -> Result<FeedbackRow, AppError> {
    validate_request(request)?;

    if find_interview(db, request.interview_id).await?.is_none() {
        return Err(AppError::NotFound("Interview not found".to_string()));
    }

    info!(
        "Scoring {} transcript entries for interview {}",
        request.transcript.len(),
        request.interview_id
    );
    let prompt = build_prompt(&request.transcript);
    let assessment: Assessment = llm
        .call_json(&prompt, &json_system(FEEDBACK_SYSTEM))
        .await?;
    let assessment = normalize(assessment);

    let feedback_id = request.feedback_id.unwrap_or_else(Uuid::new_v4);
    let row = upsert_feedback(db, feedback_id, request, &assessment).await?;

    info!(
        "Feedback {} saved for interview {} (total {})",
        row.id, row.interview_id, row.total_score
    );
    Ok(row)
}

async fn upsert_feedback(
    db: &PgPool,
    feedback_id: Uuid,
    request: &CreateFeedbackRequest,
    assessment: &Assessment,
) -> Result<FeedbackRow, sqlx::Error> {
    sqlx::query_as::<_, FeedbackRow>(
        r#"
        INSERT INTO feedback
            (id, interview_id, user_id, total_score, category_scores,
             strengths, areas_for_improvement, final_assessment)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (interview_id) DO UPDATE SET
            user_id = EXCLUDED.user_id,
            total_score = EXCLUDED.total_score,
            category_scores = EXCLUDED.category_scores,
            strengths = EXCLUDED.strengths,
            areas_for_improvement = EXCLUDED.areas_for_improvement,
            final_assessment = EXCLUDED.final_assessment,
            created_at = now()
        RETURNING *
        "#,
    )
    .bind(feedback_id)
    .bind(request.interview_id)
    .bind(request.user_id.trim())
    .bind(assessment.total_score)
    .bind(Json(&assessment.category_scores))
    .bind(&assessment.strengths)
    .bind(&assessment.areas_for_improvement)
    .bind(&assessment.final_assessment)
    .fetch_one(db)
    .await
}

pub async fn find_feedback(db: &PgPool, interview_id: Uuid) -> Result<Option<FeedbackRow>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackRow>("SELECT * FROM feedback WHERE interview_id = $1")
        .bind(interview_id)
        .fetch_optional(db)
        .await
}
