// Prompt fragments shared by every feature that calls the model.
// Feature-specific prompts live in each feature's prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction for any text that a voice assistant will read aloud.
pub const VOICE_SAFE_INSTRUCTION: &str = "\
    The text will be read by a voice assistant, so do NOT use \"/\", \"*\", \
    bullet symbols or any other special characters that might break speech synthesis.";

/// Joins a feature system prompt with the JSON-only fragment.
pub fn json_system(role_prompt: &str) -> String {
    format!("{role_prompt} {JSON_ONLY_SYSTEM}")
}
