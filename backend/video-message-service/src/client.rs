/// HTTP client for the video-message API
///
/// Thin wrapper used by embedding code and integration tooling to create
/// requests and poll the status endpoint until a terminal state is
/// reached, mirroring what the web client does with its refetch interval.
use std::time::Duration;

use thiserror::Error;

use crate::models::{CreateVideoRequest, StatusResponse, VideoRequest};

/// Errors surfaced by the API client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resource not found")]
    NotFound,

    #[error("unexpected status {status}: {body}")]
    Api { status: u16, body: String },
}

pub struct RequestsClient {
    http: reqwest::Client,
    base_url: String,
}

impl RequestsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST /api/requests
    pub async fn create_request(
        &self,
        input: &CreateVideoRequest,
    ) -> Result<VideoRequest, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/requests", self.base_url))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /api/requests/{id}
    pub async fn get_request(&self, id: &str) -> Result<VideoRequest, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/requests/{}", self.base_url, id))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /api/requests/{id}/status
    pub async fn status(&self, id: &str) -> Result<StatusResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/requests/{}/status", self.base_url, id))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Poll the status endpoint at a fixed interval until the request
    /// reaches `completed` or `failed`. Cancellation is cooperative:
    /// drop the future to stop polling.
    pub async fn poll_until_terminal(
        &self,
        id: &str,
        interval: Duration,
    ) -> Result<StatusResponse, ClientError> {
        loop {
            let status = self.status(id).await?;
            if status.status.is_terminal() {
                return Ok(status);
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(ClientError::NotFound)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}
