use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;
use crate::services::SwipeError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_retryable() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<SwipeError> for ApiError {
    fn from(err: SwipeError) -> Self {
        match err {
            // Handlers answer resubmissions themselves; logged as internal when they don't
            SwipeError::AlreadySwiped { previous } => {
                ApiError::Internal(format!("unhandled resubmission of a {previous} swipe"))
            }
            SwipeError::InvalidTarget(reason) => ApiError::BadRequest(reason),
            SwipeError::Store(store_err) => store_err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retryable) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string(), false),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string(), false),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string(), false),
            ApiError::Unavailable(detail) => {
                warn!("Storage unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable, please retry".to_string(),
                    true,
                )
            }
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    false,
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "retryable": retryable,
        });

        (status, Json(body)).into_response()
    }
}
