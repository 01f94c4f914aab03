//! Contracts the controller depends on but does not implement:
//! the Feedback Store/Generator, the Interview Store and the navigator.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::session::error::{RemoteError, StoreError};
use crate::session::transcript::TranscriptEntry;

/// Body of `POST /api/v1/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub interview_id: Uuid,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<Uuid>,
}

/// Reply of the Feedback Store/Generator. `feedback` is opaque to the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedbackResult {
    pub fn saved(feedback_id: impl Into<String>, feedback: Value) -> Self {
        Self {
            success: true,
            feedback_id: Some(feedback_id.into()),
            feedback: Some(feedback),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn create_feedback(
        &self,
        request: &CreateFeedbackRequest,
    ) -> Result<FeedbackResult, RemoteError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Flags the interview as taken so it cannot be started again.
    async fn mark_taken(&self, interview_id: Uuid) -> Result<(), StoreError>;
}

/// Views the caller can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
