// Prompt constants for transcript assessment.

pub const FEEDBACK_SYSTEM: &str =
    "You are a technical interviewer evaluating candidates for software engineering roles.";

/// Replace `{transcript}` and `{categories}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are a professional software interview coach reviewing the interview transcript below:

{transcript}

Evaluate the candidate on these EXACT categories (all five must appear in your response):
{categories}

Return a JSON object with this EXACT schema:
{
  "totalScore": 0,
  "categoryScores": [
    {"name": "<category name exactly as listed>", "score": 0, "comment": "..."}
  ],
  "strengths": ["..."],
  "areasForImprovement": ["..."],
  "finalAssessment": "..."
}

Rules:
- score is an integer from 0 to 100
- totalScore is the average of the five category scores
- strengths and areasForImprovement each hold 2 to 4 short items
- finalAssessment ends with a hiring recommendation"#;
