// Prompt constants for resume review.

pub const RESUME_REVIEW_SYSTEM: &str = "Act as an ATS scanner, a senior technical recruiter \
    and a career coach reviewing a resume against a job description.";

/// Replace `{resume}` and `{job_description}` before sending.
pub const RESUME_REVIEW_PROMPT_TEMPLATE: &str = r#"Return a JSON object with this EXACT schema:
{
  "atsScore": 0,
  "alignmentPercentage": 0,
  "strengths": ["..."],
  "weaknesses": ["..."],
  "keyAreasToImprove": ["..."],
  "recommendations": ["..."]
}

atsScore and alignmentPercentage are numbers from 0 to 100.

Resume:
{resume}

Job Description:
{job_description}"#;
