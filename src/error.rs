//! Error types for validation, persistence and request handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::ThemeError;

/// Rejected user input. Raised before any timer state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid duration")]
    MissingDuration,

    #[error("{field} must be a whole number")]
    NotANumber { field: &'static str },

    #[error("Duration must be at least 1 minute, got {0}")]
    DurationTooShort(i64),

    #[error("Duration must be at most {max} minutes, got {minutes}")]
    DurationTooLong { minutes: i64, max: u64 },

    #[error("Nudge count must be at least 1, got {0}")]
    NudgeCountTooLow(i64),

    #[error("Nudge percentage must be between 0 and 100, got {0}")]
    PercentOutOfRange(i64),
}

/// Crate-level error returned by [`crate::AppState`] and the HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body that is not JSON or does not match the request shape
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("Theme preference error: {0}")]
    Theme(#[from] ThemeError),

    #[error("Failed to lock {0}")]
    Poisoned(&'static str),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Body(_) => StatusCode::BAD_REQUEST,
            AppError::Theme(_) | AppError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = json!({
            "status": "error",
            "message": self.to_string(),
            "timestamp": Utc::now(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::from(ValidationError::DurationTooShort(0));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Duration must be at least 1 minute, got 0");
    }

    #[test]
    fn poisoned_lock_is_server_error() {
        let err = AppError::Poisoned("session");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
