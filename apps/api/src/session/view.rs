use serde::Serialize;

use crate::session::status::CallStatus;
use crate::session::transcript::TranscriptEntry;

/// State of the single call button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallButton {
    Start,
    Connecting,
    End,
    Disabled,
}

impl CallButton {
    pub fn for_status(status: CallStatus, generating_feedback: bool) -> Self {
        match status {
            CallStatus::Inactive if generating_feedback => CallButton::Disabled,
            CallStatus::Inactive => CallButton::Start,
            CallStatus::Connecting => CallButton::Connecting,
            CallStatus::Active => CallButton::End,
            CallStatus::Finished => CallButton::Disabled,
        }
    }
}

/// Everything a UI needs to draw the interview screen.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub status: CallStatus,
    pub button: CallButton,
    pub caller_name: &'a str,
    pub caller_photo_url: Option<&'a str>,
    pub last_line: Option<&'a TranscriptEntry>,
    pub is_speaking: bool,
    pub mic_granted: bool,
    pub generating_feedback: bool,
    /// Feedback-step error.
    pub error_banner: Option<String>,
    /// Latest start or SDK error.
    pub last_error: Option<String>,
}
