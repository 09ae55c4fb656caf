/// JSON-file-backed request store
///
/// The whole request table is one pretty-printed JSON document mapping
/// id to request, rewritten on every mutation. A process-wide mutex
/// serializes mutations; the document is written to a temporary sibling
/// and renamed into place so a concurrent reader never observes a torn
/// file. A missing or empty file reads as an empty table.
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{CreateVideoRequest, RequestStatus, VideoRequest};

use super::{RequestStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_table(&self) -> Result<BTreeMap<String, VideoRequest>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_table(&self, table: &BTreeMap<String, VideoRequest>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RequestStore for JsonFileStore {
    async fn create(&self, input: CreateVideoRequest) -> Result<VideoRequest, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;

        let mut id = Uuid::new_v4().simple().to_string();
        while table.contains_key(&id) {
            id = Uuid::new_v4().simple().to_string();
        }

        let request = VideoRequest {
            id: id.clone(),
            sender_name: input.sender_name,
            receiver_name: input.receiver_name,
            message: input.message,
            music: input.music,
            custom_music_url: input.custom_music_url,
            status: RequestStatus::Pending,
            progress: 0,
            video_url: None,
            created_at: Utc::now(),
        };

        table.insert(id, request.clone());
        self.write_table(&table).await?;

        tracing::debug!(request_id = %request.id, "request persisted");
        Ok(request)
    }

    async fn get(&self, id: &str) -> Result<Option<VideoRequest>, StoreError> {
        let table = self.read_table().await?;
        Ok(table.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
        progress: i32,
        video_url: Option<String>,
    ) -> Result<VideoRequest, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;

        let request = table
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if !request.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: request.status,
                to: status,
            });
        }

        request.status = status;
        // Progress never regresses except when a failure resets it
        request.progress = if status == RequestStatus::Failed {
            progress
        } else {
            progress.clamp(request.progress, 100)
        };
        if let Some(url) = video_url {
            request.video_url = Some(url);
        }

        let updated = request.clone();
        self.write_table(&table).await?;
        Ok(updated)
    }
}
