/// Request handlers - HTTP endpoints for the video-message lifecycle
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{CreateVideoRequest, RequestStatus, StatusResponse, VideoRequest};
use crate::services::{ProcessingMode, VideoProcessor};
use crate::storage::RequestStore;

/// Create field names in validation-report order, paired with their wire
/// spelling
const CREATE_FIELDS: [(&str, &str); 3] = [
    ("sender_name", "senderName"),
    ("receiver_name", "receiverName"),
    ("message", "message"),
];

fn first_validation_error(errors: &validator::ValidationErrors) -> AppError {
    let by_field = errors.field_errors();
    for (rust_name, wire_name) in CREATE_FIELDS {
        if let Some(field_errors) = by_field.get(rust_name) {
            if let Some(err) = field_errors.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", wire_name));
                return AppError::Validation {
                    field: Some(wire_name.to_string()),
                    message,
                };
            }
        }
    }

    AppError::Validation {
        field: None,
        message: "Invalid request".to_string(),
    }
}

/// Create a video-message request
/// POST /api/requests
pub async fn create_request(
    store: web::Data<Arc<dyn RequestStore>>,
    processor: web::Data<Arc<VideoProcessor>>,
    input: web::Json<CreateVideoRequest>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    input.validate().map_err(|e| first_validation_error(&e))?;

    let request = store.create(input).await?;
    tracing::info!(request_id = %request.id, "video request created");

    let request = match processor.mode() {
        ProcessingMode::Inline => processor.complete_inline(&request.id).await?,
        ProcessingMode::Staged => {
            let processor = processor.get_ref().clone();
            let id = request.id.clone();
            tokio::spawn(async move { processor.process(&id).await });
            request
        }
    };

    Ok(HttpResponse::Created().json(request))
}

/// Fetch a full request record
/// GET /api/requests/{id}
pub async fn get_request(
    store: web::Data<Arc<dyn RequestStore>>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let request = store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

    Ok(HttpResponse::Ok().json(request))
}

/// Status projection for polling clients
/// GET /api/requests/{id}/status
pub async fn get_status(
    store: web::Data<Arc<dyn RequestStore>>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let request = store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

    Ok(HttpResponse::Ok().json(StatusResponse::from(request)))
}

/// Placeholder result page for a completed request
/// GET /api/requests/{id}/video
pub async fn get_video_page(
    store: web::Data<Arc<dyn RequestStore>>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let request = store
        .get(&id)
        .await?
        .filter(|r| r.status == RequestStatus::Completed)
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_video_page(&request)))
}

fn render_video_page(request: &VideoRequest) -> String {
    format!(
        r#"<html>
  <body style="background: black; color: white; display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100vh; font-family: sans-serif;">
    <h1>Video from {sender} for {receiver}</h1>
    <p style="font-size: 1.5rem; max-width: 600px; text-align: center; font-style: italic;">"{message}"</p>
    <div style="margin-top: 2rem; border: 2px solid pink; padding: 2rem; border-radius: 1rem;">
      &#127926; Music: {music}
    </div>
    <p style="margin-top: 2rem; color: #666;">This is a generated preview of your video message.</p>
  </body>
</html>
"#,
        sender = escape_html(&request.sender_name),
        receiver = escape_html(&request.receiver_name),
        message = escape_html(&request.message),
        music = escape_html(&request.music),
    )
}

/// Minimal HTML escaping for interpolated user content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
