// Interview Store and question-set generation.
// LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod store;
