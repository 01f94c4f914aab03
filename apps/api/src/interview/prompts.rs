// Prompt constants for question-set generation.

pub const QUESTIONS_SYSTEM: &str = "You are a senior hiring manager preparing a spoken job interview.";

/// Replace `{company}`, `{role}`, `{level}`, `{techstack}`, `{focus}`,
/// `{amount}` and `{voice_rules}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Prepare questions for a job interview.
The targeted company is {company}.
The job role is {role}.
The job experience level is {level}.
The tech stack used in the job is: {techstack}.
The focus between behavioural and technical questions should lean towards: {focus}.
The amount of questions required is: {amount}.

Keep every question short, one or two lines at most.
{voice_rules}

Return ONLY a JSON array of strings, formatted like this:
["Question 1", "Question 2", "Question 3"]"#;
