/// Request storage - durable persistence of video-message requests
///
/// The store is injected as a trait object so the lifecycle service and
/// the handlers never depend on the persistence mechanism directly.
mod json_store;

pub use json_store::JsonFileStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CreateVideoRequest, RequestStatus, VideoRequest};

/// Errors produced by the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request {0} not found")]
    NotFound(String),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key-value persistence of requests
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persist a new request with a freshly assigned id, `pending` status
    /// and zero progress
    async fn create(&self, input: CreateVideoRequest) -> Result<VideoRequest, StoreError>;

    /// Fetch a request by id
    async fn get(&self, id: &str) -> Result<Option<VideoRequest>, StoreError>;

    /// Transition a request's status and progress, optionally setting the
    /// result URL. Fails for unknown ids and for transitions out of a
    /// terminal state.
    async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
        progress: i32,
        video_url: Option<String>,
    ) -> Result<VideoRequest, StoreError>;
}
