/// Configuration management for video-message-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;
use std::path::PathBuf;

use crate::services::ProcessingMode;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
    pub processing: ProcessingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub requests_file: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProcessingConfig {
    pub mode: ProcessingMode,
    pub stage_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("VIDEO_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("VIDEO_SERVICE_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string()),
            },
            storage: StorageConfig {
                requests_file: PathBuf::from(
                    std::env::var("VIDEO_SERVICE_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
                )
                .join("requests.json"),
            },
            uploads: UploadConfig {
                dir: PathBuf::from(
                    std::env::var("VIDEO_SERVICE_UPLOADS_DIR")
                        .unwrap_or_else(|_| "uploads".to_string()),
                ),
                max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10 * 1024 * 1024),
            },
            processing: ProcessingConfig {
                mode: parse_processing_mode(),
                stage_delay_ms: std::env::var("PROCESSING_STAGE_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(500),
            },
        })
    }
}

fn parse_processing_mode() -> ProcessingMode {
    match std::env::var("PROCESSING_MODE").as_deref() {
        Ok("staged") => ProcessingMode::Staged,
        _ => ProcessingMode::Inline,
    }
}
