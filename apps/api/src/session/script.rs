//! Built-in call scripts.

use serde::Serialize;

use crate::session::voice::{ScriptConfig, VariableBindings};

const INTERVIEWER_FIRST_MESSAGE: &str =
    "Hello! Thank you for taking the time to speak with me today. I'm excited to learn more about you and your experience.";

/// `{{questions}}` is bound per call by [`interview_script`].
const INTERVIEWER_SYSTEM_PROMPT: &str = r#"You are a professional job interviewer conducting a real-time voice interview with a candidate. Your goal is to assess their qualifications, motivation, and fit for the role.

Interview Guidelines:
Follow the structured question flow:
{{questions}}

Engage naturally and react appropriately:
- Listen actively to responses and acknowledge them before moving forward.
- Ask brief follow-up questions if a response is vague or requires more detail.
- Keep the conversation flowing smoothly while maintaining control.

Be professional, yet warm and welcoming:
- Use official yet friendly language.
- Keep responses concise and to the point, like in a real voice interview.
- Avoid robotic phrasing; sound natural and conversational.

Conclude the interview properly:
- Thank the candidate for their time.
- Inform them that the company will reach out soon with feedback.
- End the conversation on a polite and positive note.

Keep all your responses short and simple. This is a voice conversation, so keep your responses short, like in a real conversation. Don't ramble for too long."#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub name: String,
    pub first_message: String,
    pub system_prompt: String,
    pub transcriber: TranscriberConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriberConfig {
    pub provider: String,
    pub model: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub speed: f32,
}

/// The fixed interviewer assistant used in interview mode.
pub fn interviewer() -> AssistantConfig {
    AssistantConfig {
        name: "Genie".to_string(),
        first_message: INTERVIEWER_FIRST_MESSAGE.to_string(),
        system_prompt: INTERVIEWER_SYSTEM_PROMPT.to_string(),
        transcriber: TranscriberConfig {
            provider: "deepgram".to_string(),
            model: "nova-2".to_string(),
            language: "en".to_string(),
        },
        voice: VoiceConfig {
            provider: "11labs".to_string(),
            voice_id: "sarah".to_string(),
            stability: 0.4,
            similarity_boost: 0.8,
            speed: 0.9,
        },
    }
}

/// Renders questions one per line for the `{{questions}}` binding.
pub fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn interview_script(questions: &[String]) -> (ScriptConfig, VariableBindings) {
    let mut variables = VariableBindings::new();
    variables.insert("questions".to_string(), format_questions(questions));
    (ScriptConfig::Assistant(interviewer()), variables)
}

pub fn onboarding_script(
    workflow_id: &str,
    user_name: &str,
    user_id: &str,
) -> (ScriptConfig, VariableBindings) {
    let mut variables = VariableBindings::new();
    variables.insert("username".to_string(), user_name.to_string());
    variables.insert("userid".to_string(), user_id.to_string());
    (
        ScriptConfig::Workflow {
            workflow_id: workflow_id.to_string(),
        },
        variables,
    )
}
