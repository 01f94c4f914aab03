use thiserror::Error;
use uuid::Uuid;

/// Failures talking to the Genie API over HTTP.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("{0}")]
    Network(String),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON response from API: {0}")]
    InvalidJson(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Network(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Interview {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Everything a session attempt can surface to the caller.
/// None of these are fatal to the hosting process.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not start the call: {0}")]
    StartFailed(String),

    #[error("No conversation recorded. Please try the interview again.")]
    EmptyTranscript,

    #[error("{0}")]
    InvalidParameters(String),

    /// The generator answered, but reported failure. Shown verbatim.
    #[error("{0}")]
    Generation(String),

    #[error("Feedback service returned no feedback id")]
    MissingFeedbackId,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Feedback saved, but marking the interview as taken failed: {0}")]
    MarkTaken(StoreError),

    #[error("Voice session error: {0}")]
    Voice(String),

    #[error("Feedback task aborted: {0}")]
    TaskAborted(String),
}

impl SessionError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::StartFailed(_) => "start_failed",
            SessionError::EmptyTranscript => "no_conversation_recorded",
            SessionError::InvalidParameters(_) => "invalid_parameters",
            SessionError::Generation(_) => "generation_failed",
            SessionError::MissingFeedbackId => "missing_feedback_id",
            SessionError::Remote(_) => "transport",
            SessionError::MarkTaken(_) => "mark_taken_failed",
            SessionError::Voice(_) => "voice",
            SessionError::TaskAborted(_) => "task_aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_is_shown_verbatim() {
        assert_eq!(SessionError::Generation("boom".to_string()).to_string(), "boom");
    }

    #[test]
    fn test_status_error_carries_raw_body() {
        let err = SessionError::from(RemoteError::Status {
            status: 500,
            body: "upstream exploded".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: upstream exploded"
        );
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn test_empty_transcript_kind() {
        assert_eq!(SessionError::EmptyTranscript.kind(), "no_conversation_recorded");
    }
}
