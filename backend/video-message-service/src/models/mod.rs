/// Data models for video-message-service
///
/// This module defines structures for:
/// - VideoRequest: the persisted request entity and its status lifecycle
/// - CreateVideoRequest: validated creation input
/// - StatusResponse: the projection served to polling clients
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Maximum number of whitespace-separated words allowed in a message
pub const MAX_MESSAGE_WORDS: usize = 1000;

/// Music tag applied when the client does not pick one
pub const DEFAULT_MUSIC: &str = "romantic";

/// Request status in the processing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Allowed transitions: pending and processing may advance (or, for
    /// processing, re-assert itself with new progress); terminal states
    /// absorb.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::Processing | Self::Completed | Self::Failed
            ),
            Self::Processing => matches!(
                next,
                Self::Processing | Self::Completed | Self::Failed
            ),
            Self::Completed | Self::Failed => false,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted video-message request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub id: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub message: String,
    pub music: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_music_url: Option<String>,
    pub status: RequestStatus,
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create request payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, message = "Sender name is required"))]
    pub sender_name: String,
    #[validate(length(min = 1, message = "Receiver name is required"))]
    pub receiver_name: String,
    #[validate(
        length(min = 1, message = "Message is required"),
        custom(function = "validate_message_words")
    )]
    pub message: String,
    #[serde(default = "default_music")]
    pub music: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_music_url: Option<String>,
}

fn default_music() -> String {
    DEFAULT_MUSIC.to_string()
}

/// Count non-empty whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reject messages longer than `MAX_MESSAGE_WORDS` words
pub fn validate_message_words(message: &str) -> Result<(), ValidationError> {
    if word_count(message) > MAX_MESSAGE_WORDS {
        let mut err = ValidationError::new("too_many_words");
        err.message = Some(format!("Message must not exceed {} words", MAX_MESSAGE_WORDS).into());
        return Err(err);
    }
    Ok(())
}

/// Status projection returned by the polling endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: RequestStatus,
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl From<VideoRequest> for StatusResponse {
    fn from(request: VideoRequest) -> Self {
        Self {
            status: request.status,
            progress: request.progress,
            video_url: request.video_url,
        }
    }
}

/// Response to a successful music upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicUploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RequestStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::from_str::<RequestStatus>("\"completed\"").unwrap(),
            RequestStatus::Completed
        );
    }

    #[test]
    fn terminal_states_absorb() {
        assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::Processing));
        assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::Failed));
        assert!(!RequestStatus::Failed.can_transition_to(RequestStatus::Pending));
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
        assert!(!RequestStatus::Processing.is_terminal());
    }

    #[test]
    fn pending_may_short_circuit_to_completed() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Completed));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Processing));
        assert!(RequestStatus::Processing.can_transition_to(RequestStatus::Processing));
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("Hi"), 1);
        assert_eq!(word_count("  one   two\tthree\n"), 3);
    }

    #[test]
    fn message_word_limit_is_inclusive() {
        let at_limit = vec!["word"; MAX_MESSAGE_WORDS].join(" ");
        assert!(validate_message_words(&at_limit).is_ok());

        let over_limit = vec!["word"; MAX_MESSAGE_WORDS + 1].join(" ");
        assert!(validate_message_words(&over_limit).is_err());
    }

    #[test]
    fn create_request_defaults_music() {
        let input: CreateVideoRequest = serde_json::from_value(serde_json::json!({
            "senderName": "Alice",
            "receiverName": "Bob",
            "message": "Hi"
        }))
        .unwrap();
        assert_eq!(input.music, DEFAULT_MUSIC);
        assert!(input.custom_music_url.is_none());
    }

    #[test]
    fn request_round_trips_camel_case() {
        let request = VideoRequest {
            id: "abc123".into(),
            sender_name: "Alice".into(),
            receiver_name: "Bob".into(),
            message: "Hi".into(),
            music: "romantic".into(),
            custom_music_url: None,
            status: RequestStatus::Pending,
            progress: 0,
            video_url: None,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["senderName"], "Alice");
        assert_eq!(value["status"], "pending");
        assert!(value.get("videoUrl").is_none());

        let parsed: VideoRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.id, request.id);
    }
}
