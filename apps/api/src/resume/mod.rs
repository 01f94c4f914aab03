// Resume review against a job description.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
