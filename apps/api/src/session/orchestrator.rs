//! Feedback Orchestrator: turns a finished interview call into a saved
//! assessment, at most one request at a time.
//!
//! Policy, in order:
//! 1. a trigger while a request is in flight is ignored;
//! 2. an empty transcript fails without any remote call;
//! 3. the request is submitted and awaited;
//! 4. on success the interview is marked taken (failure there is reported
//!    separately and does not undo the saved feedback);
//! 5. failures are surfaced, never retried.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::session::collaborators::{CreateFeedbackRequest, FeedbackGenerator, InterviewStore};
use crate::session::error::SessionError;

#[derive(Debug)]
pub enum FeedbackOutcome {
    Saved {
        feedback_id: String,
        feedback: Option<Value>,
    },
    /// Feedback was written but the interview's `taken` flag was not.
    SavedNotMarked {
        feedback_id: String,
        feedback: Option<Value>,
        error: SessionError,
    },
    Failed(SessionError),
}

impl FeedbackOutcome {
    pub fn feedback_id(&self) -> Option<&str> {
        match self {
            FeedbackOutcome::Saved { feedback_id, .. }
            | FeedbackOutcome::SavedNotMarked { feedback_id, .. } => Some(feedback_id),
            FeedbackOutcome::Failed(_) => None,
        }
    }
}

pub struct FeedbackOrchestrator {
    generator: Arc<dyn FeedbackGenerator>,
    interviews: Arc<dyn InterviewStore>,
    in_flight: bool,
}

impl FeedbackOrchestrator {
    pub fn new(generator: Arc<dyn FeedbackGenerator>, interviews: Arc<dyn InterviewStore>) -> Self {
        Self {
            generator,
            interviews,
            in_flight: false,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight
    }

    /// Starts a generation run on the runtime.
    ///
    /// `Ok(None)` means a run is already in flight and this trigger was
    /// dropped. Pre-flight failures return `Err` without touching the network.
    pub fn begin(
        &mut self,
        request: CreateFeedbackRequest,
    ) -> Result<Option<JoinHandle<FeedbackOutcome>>, SessionError> {
        if self.in_flight {
            debug!(
                "Feedback for interview {} already in flight, ignoring trigger",
                request.interview_id
            );
            return Ok(None);
        }

        if request.transcript.is_empty() {
            warn!(
                "Interview {} ended with an empty transcript, skipping feedback",
                request.interview_id
            );
            return Err(SessionError::EmptyTranscript);
        }

        if request.user_id.trim().is_empty() {
            return Err(SessionError::InvalidParameters(
                "Missing interviewId or userId".to_string(),
            ));
        }

        self.in_flight = true;
        let generator = Arc::clone(&self.generator);
        let interviews = Arc::clone(&self.interviews);

        Ok(Some(tokio::spawn(async move {
            submit(generator.as_ref(), interviews.as_ref(), &request).await
        })))
    }

    /// Clears the in-flight flag once the run's outcome has been applied.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}

/// Submits the transcript, then marks the interview taken on success.
/// The two remote calls are awaited one after the other.
pub async fn submit(
    generator: &dyn FeedbackGenerator,
    interviews: &dyn InterviewStore,
    request: &CreateFeedbackRequest,
) -> FeedbackOutcome {
    info!(
        "Submitting {} transcript entries for interview {}",
        request.transcript.len(),
        request.interview_id
    );

    let result = match generator.create_feedback(request).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Feedback request for {} failed: {e}", request.interview_id);
            return FeedbackOutcome::Failed(e.into());
        }
    };

    if !result.success {
        let message = result
            .error
            .unwrap_or_else(|| "Failed to generate feedback".to_string());
        warn!("Feedback generation for {} failed: {message}", request.interview_id);
        return FeedbackOutcome::Failed(SessionError::Generation(message));
    }

    let feedback_id = match result.feedback_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return FeedbackOutcome::Failed(SessionError::MissingFeedbackId),
    };

    match interviews.mark_taken(request.interview_id).await {
        Ok(()) => {
            info!(
                "Feedback {feedback_id} saved, interview {} marked taken",
                request.interview_id
            );
            FeedbackOutcome::Saved {
                feedback_id,
                feedback: result.feedback,
            }
        }
        Err(e) => {
            warn!(
                "Feedback {feedback_id} saved but interview {} not marked taken: {e}",
                request.interview_id
            );
            FeedbackOutcome::SavedNotMarked {
                feedback_id,
                feedback: result.feedback,
                error: SessionError::MarkTaken(e),
            }
        }
    }
}
