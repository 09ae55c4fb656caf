/// Error types for video-message-service
///
/// This module defines all error types that can occur in the service.
/// Errors are converted to appropriate HTTP responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;

use crate::storage::StoreError;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Input failed schema validation
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Malformed request outside schema validation
    BadRequest(String),

    /// Resource not found
    NotFound(String),

    /// Storage operation failed
    Storage(String),

    /// Internal server error
    Internal(String),
}

/// JSON body attached to error responses
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "Validation error: {}", message),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { field, message } => ErrorBody {
                message: message.clone(),
                field: field.clone(),
            },
            AppError::BadRequest(msg) | AppError::NotFound(msg) => ErrorBody {
                message: msg.clone(),
                field: None,
            },
            AppError::Storage(_) | AppError::Internal(_) => ErrorBody {
                message: "Internal Server Error".to_string(),
                field: None,
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Request {} not found", id)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
