//! Question-set generation.
//!
//! Flow: validate → build prompt → LLM → parse JSON array → insert row.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::interview::store::{insert_interview, NewInterview};
use crate::llm_client::prompts::{json_system, VOICE_SAFE_INSTRUCTION};
use crate::llm_client::{parse_json_reply, LlmClient};

pub const MAX_QUESTIONS: u32 = 20;

/// Body of `POST /api/v1/interviews/generate`, as the onboarding workflow sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateInterviewRequest {
    pub company: String,
    pub role: String,
    pub level: String,
    /// Comma-separated, e.g. `"rust, postgres"`.
    pub techstack: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub amount: u32,
    pub userid: String,
}

pub fn validate(request: &GenerateInterviewRequest) -> Result<(), AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    if request.userid.trim().is_empty() {
        return Err(AppError::Validation("userid cannot be empty".to_string()));
    }
    if !(1..=MAX_QUESTIONS).contains(&request.amount) {
        return Err(AppError::Validation(format!(
            "amount must be between 1 and {MAX_QUESTIONS}"
        )));
    }
    Ok(())
}

pub fn split_techstack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_prompt(request: &GenerateInterviewRequest, techstack: &[String]) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{company}", request.company.trim())
        .replace("{role}", request.role.trim())
        .replace("{level}", request.level.trim())
        .replace("{techstack}", &techstack.join(", "))
        .replace("{focus}", request.interview_type.trim())
        .replace("{amount}", &request.amount.to_string())
        .replace("{voice_rules}", VOICE_SAFE_INSTRUCTION)
}

/// Parses the model's JSON array, dropping blank entries and anything past `limit`.
pub fn parse_questions(reply: &str, limit: usize) -> Result<Vec<String>, AppError> {
    let raw: Vec<String> = parse_json_reply(reply)?;
    let questions: Vec<String> = raw
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(limit)
        .collect();

    if questions.is_empty() {
        return Err(AppError::Llm("model returned no questions".to_string()));
    }
    Ok(questions)
}

/// Generates and stores a question set. Returns the new interview id.
pub async fn generate_interview(
    db: &PgPool,
    llm: &LlmClient,
    request: &GenerateInterviewRequest,
) -> Result<Uuid, AppError> {
    validate(request)?;

    let techstack = split_techstack(&request.techstack);
    let prompt = build_prompt(request, &techstack);
    let reply = llm.call_text(&prompt, &json_system(QUESTIONS_SYSTEM)).await?;
    let questions = parse_questions(&reply, request.amount as usize)?;

    if questions.len() < request.amount as usize {
        warn!(
            "Asked for {} questions, model returned {}",
            request.amount,
            questions.len()
        );
    }

    let interview_id = insert_interview(
        db,
        &NewInterview {
            user_id: request.userid.trim(),
            company: request.company.trim(),
            role: request.role.trim(),
            level: request.level.trim(),
            techstack: &techstack,
            interview_type: request.interview_type.trim(),
            questions: &questions,
        },
    )
    .await?;

    info!(
        "Interview {interview_id} created for user {} with {} questions",
        request.userid,
        questions.len()
    );
    Ok(interview_id)
}
