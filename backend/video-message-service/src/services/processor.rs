/// Video processing lifecycle
///
/// Drives a request through the status state machine. No real encoding
/// happens here: the inline path completes a request immediately with a
/// constant result URL, the staged path simulates asynchronous processing
/// with progress checkpoints.
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::models::{RequestStatus, VideoRequest};
use crate::storage::{RequestStore, StoreError};

/// Progress checkpoints walked by the staged processor
const STAGE_PROGRESS: [i32; 3] = [10, 40, 80];

/// Which processing path the create endpoint takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Complete the request synchronously inside the create call
    Inline,
    /// Spawn a background task that advances progress in stages
    Staged,
}

pub struct VideoProcessor {
    store: Arc<dyn RequestStore>,
    mode: ProcessingMode,
    stage_delay: Duration,
    in_flight: Mutex<HashSet<String>>,
}

impl VideoProcessor {
    pub fn new(store: Arc<dyn RequestStore>, mode: ProcessingMode, stage_delay: Duration) -> Self {
        Self {
            store,
            mode,
            stage_delay,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    /// Short-circuit a freshly created request straight to `completed`
    pub async fn complete_inline(&self, id: &str) -> Result<VideoRequest, StoreError> {
        self.store
            .update_status(
                id,
                RequestStatus::Completed,
                100,
                Some(format!("/result/{}", id)),
            )
            .await
    }

    /// Simulated asynchronous processing with staged progress
    ///
    /// Idempotent once triggered: a second call for an id already being
    /// processed returns without touching the record. Any error while
    /// advancing the stages transitions the request to `failed` with
    /// progress reset to 0, so a request is never left stuck in
    /// `processing`.
    pub async fn process(&self, id: &str) {
        match self.store.get(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(request_id = %id, "request vanished before processing, skipping");
                return;
            }
            Err(err) => {
                error!(request_id = %id, "failed to load request for processing: {}", err);
                return;
            }
        }

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(id.to_string()) {
                debug!(request_id = %id, "processing already in flight, skipping");
                return;
            }
        }

        if let Err(err) = self.run_stages(id).await {
            error!(request_id = %id, "video processing failed: {}", err);
            if let Err(err) = self
                .store
                .update_status(id, RequestStatus::Failed, 0, None)
                .await
            {
                error!(request_id = %id, "failed to record processing failure: {}", err);
            }
        }

        self.in_flight.lock().await.remove(id);
    }

    async fn run_stages(&self, id: &str) -> Result<(), StoreError> {
        for progress in STAGE_PROGRESS {
            self.store
                .update_status(id, RequestStatus::Processing, progress, None)
                .await?;
            tokio::time::sleep(self.stage_delay).await;
        }

        self.store
            .update_status(
                id,
                RequestStatus::Completed,
                100,
                Some(format!("/api/requests/{}/video", id)),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateVideoRequest;
    use crate::storage::JsonFileStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn input() -> CreateVideoRequest {
        CreateVideoRequest {
            sender_name: "Alice".into(),
            receiver_name: "Bob".into(),
            message: "Hi".into(),
            music: "romantic".into(),
            custom_music_url: None,
        }
    }

    /// Store wrapper that fails updates at a chosen progress value
    struct FlakyStore {
        inner: JsonFileStore,
        fail_on_progress: i32,
    }

    #[async_trait]
    impl RequestStore for FlakyStore {
        async fn create(&self, input: CreateVideoRequest) -> Result<VideoRequest, StoreError> {
            self.inner.create(input).await
        }

        async fn get(&self, id: &str) -> Result<Option<VideoRequest>, StoreError> {
            self.inner.get(id).await
        }

        async fn update_status(
            &self,
            id: &str,
            status: RequestStatus,
            progress: i32,
            video_url: Option<String>,
        ) -> Result<VideoRequest, StoreError> {
            if progress == self.fail_on_progress {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.update_status(id, status, progress, video_url).await
        }
    }

    #[tokio::test]
    async fn inline_completion_sets_terminal_values() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn RequestStore> =
            Arc::new(JsonFileStore::new(tmp.path().join("requests.json")));
        let processor = VideoProcessor::new(
            store.clone(),
            ProcessingMode::Inline,
            Duration::from_millis(0),
        );

        let created = store.create(input()).await.unwrap();
        let completed = processor.complete_inline(&created.id).await.unwrap();

        assert_eq!(completed.status, RequestStatus::Completed);
        assert_eq!(completed.progress, 100);
        assert_eq!(
            completed.video_url.as_deref(),
            Some(format!("/result/{}", created.id).as_str())
        );
    }

    #[tokio::test]
    async fn staged_processing_reaches_completed() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn RequestStore> =
            Arc::new(JsonFileStore::new(tmp.path().join("requests.json")));
        let processor = VideoProcessor::new(
            store.clone(),
            ProcessingMode::Staged,
            Duration::from_millis(0),
        );

        let created = store.create(input()).await.unwrap();
        processor.process(&created.id).await;

        let done = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(done.progress, 100);
        assert_eq!(
            done.video_url.as_deref(),
            Some(format!("/api/requests/{}/video", created.id).as_str())
        );
    }

    #[tokio::test]
    async fn storage_failure_marks_request_failed() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn RequestStore> = Arc::new(FlakyStore {
            inner: JsonFileStore::new(tmp.path().join("requests.json")),
            fail_on_progress: 80,
        });
        let processor = VideoProcessor::new(
            store.clone(),
            ProcessingMode::Staged,
            Duration::from_millis(0),
        );

        let created = store.create(input()).await.unwrap();
        processor.process(&created.id).await;

        let failed = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(failed.status, RequestStatus::Failed);
        assert_eq!(failed.progress, 0);
    }

    #[tokio::test]
    async fn unknown_id_is_skipped_without_panic() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn RequestStore> =
            Arc::new(JsonFileStore::new(tmp.path().join("requests.json")));
        let processor =
            VideoProcessor::new(store, ProcessingMode::Staged, Duration::from_millis(0));

        processor.process("missing").await;
    }

    #[tokio::test]
    async fn concurrent_triggers_process_once() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn RequestStore> =
            Arc::new(JsonFileStore::new(tmp.path().join("requests.json")));
        let processor = Arc::new(VideoProcessor::new(
            store.clone(),
            ProcessingMode::Staged,
            Duration::from_millis(100),
        ));

        let created = store.create(input()).await.unwrap();

        let first = {
            let processor = processor.clone();
            let id = created.id.clone();
            tokio::spawn(async move { processor.process(&id).await })
        };

        // Give the first trigger time to claim the id, then fire a duplicate
        tokio::time::sleep(Duration::from_millis(20)).await;
        processor.process(&created.id).await;

        // The duplicate returned while the first run is still mid-flight
        let current = store.get(&created.id).await.unwrap().unwrap();
        assert!(!current.status.is_terminal());

        first.await.unwrap();
        let done = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(done.progress, 100);
    }
}
