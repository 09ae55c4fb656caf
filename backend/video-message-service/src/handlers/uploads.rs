/// Music upload handlers - custom soundtrack files for video messages
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use std::path::Path;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::MusicUploadResponse;

/// Accept an audio file and store it under a generated name
/// POST /api/upload-music
pub async fn upload_music(
    config: web::Data<Config>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let max_bytes = config.uploads.max_bytes;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != Some("file") {
            // Drain unknown fields so the stream can make progress
            while field.next().await.is_some() {}
            continue;
        }

        let is_audio = field
            .content_type()
            .map(|ct| ct.type_() == mime::AUDIO)
            .unwrap_or(false);
        if !is_audio {
            return Err(AppError::BadRequest(
                "Only audio files are allowed".to_string(),
            ));
        }

        let extension = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "File exceeds maximum size of {} bytes",
                    max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AppError::BadRequest("No file uploaded".to_string()));
        }

        let filename = format!("audio-{}{}", Uuid::new_v4().simple(), extension);
        let dest = config.uploads.dir.join(&filename);

        tokio::fs::create_dir_all(&config.uploads.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create uploads dir: {}", e)))?;
        tokio::fs::write(&dest, &data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(file = %filename, bytes = data.len(), "stored uploaded music");

        return Ok(HttpResponse::Created().json(MusicUploadResponse {
            url: format!("/uploads/{}", filename),
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Serve a previously uploaded music file
/// GET /uploads/{filename}
pub async fn serve_upload(
    config: web::Data<Config>,
    filename: web::Path<String>,
) -> Result<HttpResponse> {
    let filename = filename.into_inner();

    // Reject anything that could escape the uploads directory
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::BadRequest("Invalid file name".to_string()));
    }

    let path = config.uploads.dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => {
            return Err(AppError::Internal(format!("Failed to read upload: {}", e)));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(audio_content_type(&filename))
        .body(bytes))
}

/// Map a stored file's extension to the content type served back
fn audio_content_type(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
