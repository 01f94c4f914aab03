use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::{parse_json_reply, LlmClient};
use crate::resume::prompts::{RESUME_REVIEW_PROMPT_TEMPLATE, RESUME_REVIEW_SYSTEM};

/// Cap applied to both the resume text and the job description.
pub const MAX_CHARS: usize = 20_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeAnalysis {
    pub ats_score: f64,
    pub alignment_percentage: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub key_areas_to_improve: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Structured analysis, or the model's raw text when it wasn't JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResumeFeedback {
    Structured(ResumeAnalysis),
    Raw(String),
}

/// Truncates to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    RESUME_REVIEW_PROMPT_TEMPLATE
        .replace("{job_description}", truncate_chars(job_description, MAX_CHARS))
        .replace("{resume}", truncate_chars(resume_text, MAX_CHARS))
}

pub fn interpret_reply(reply: &str) -> ResumeFeedback {
    match parse_json_reply::<ResumeAnalysis>(reply) {
        Ok(analysis) => ResumeFeedback::Structured(analysis),
        Err(e) => {
            warn!("Resume review was not valid JSON, returning raw text: {e}");
            ResumeFeedback::Raw(reply.trim().to_string())
        }
    }
}

/// Pulls the text layer out of a PDF. Parsing is CPU-bound, so it runs on the
/// blocking pool.
pub async fn extract_pdf_text(pdf: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed documents.
            if e.is_panic() {
                AppError::UnprocessableEntity("Could not read text from the uploaded PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            }
        })?
        .map_err(|e| {
            warn!("PDF extraction failed: {e}");
            AppError::UnprocessableEntity("Could not read text from the uploaded PDF".to_string())
        })?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The uploaded PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<ResumeFeedback, AppError> {
    info!(
        "Reviewing resume ({} chars) against job description ({} chars)",
        resume_text.chars().count(),
        job_description.chars().count()
    );
    let prompt = build_prompt(resume_text, job_description);
    let reply = llm.call_text(&prompt, &json_system(RESUME_REVIEW_SYSTEM)).await?;
    Ok(interpret_reply(&reply))
}
