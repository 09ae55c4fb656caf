/// HTTP handlers for the video-message API
///
/// This module contains handlers for:
/// - Requests: create, fetch, status polling, result page
/// - Uploads: custom music upload and retrieval
pub mod requests;
pub mod uploads;

pub use requests::{create_request, get_request, get_status, get_video_page};

pub use uploads::{serve_upload, upload_music};
