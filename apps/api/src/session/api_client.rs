use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionSettings;
use crate::session::collaborators::{
    CreateFeedbackRequest, FeedbackGenerator, FeedbackResult, InterviewStore,
};
use crate::session::error::{RemoteError, StoreError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the Genie API, used by an embedded session controller.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl FeedbackGenerator for ApiClient {
    async fn create_feedback(
        &self,
        request: &CreateFeedbackRequest,
    ) -> Result<FeedbackResult, RemoteError> {
        let response = self
            .client
            .post(self.url("/api/v1/feedback"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("POST /api/v1/feedback -> {status}");
        decode_reply(status, &body)
    }
}

#[async_trait]
impl InterviewStore for ApiClient {
    async fn mark_taken(&self, interview_id: Uuid) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/v1/interviews/{interview_id}/taken")))
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(interview_id));
        }
        let body = response.text().await.map_err(RemoteError::from)?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(())
    }
}

/// Maps a raw API reply onto `T`. Non-2xx replies keep the body verbatim.
fn decode_reply<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, RemoteError> {
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| RemoteError::InvalidJson(e.to_string()))
}
