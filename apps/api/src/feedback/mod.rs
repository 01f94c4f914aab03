// Feedback Store/Generator: scores a finished interview transcript and
// persists one assessment per interview.

pub mod generator;
pub mod handlers;
pub mod prompts;
