//! Error types for the HTTP layer.
//!
//! Every failure leaves the server as `{ "status_code": .., "message": .. }`
//! with the HTTP status mirrored in the body.
//!
//! ```text
//! ServiceError::Core(validation / EmptyOrder /
//!                    BookNotFound / EmailTaken)      → 400, rule message
//! ServiceError::Core(UnknownEmail / PasswordMismatch) → 401, rule message
//! ServiceError::Auth                                   → 401 "invalid token"
//! ServiceError::Storage / Internal                     → 500, generic message
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use shelf_core::CoreError;
use tracing::error;

use crate::services::ServiceError;

/// Message for every 5xx; details only go to the log.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownEmail | CoreError::PasswordMismatch => {
                ApiError::unauthorized(err.to_string())
            }
            CoreError::EmptyOrder
            | CoreError::BookNotFound(_)
            | CoreError::EmailTaken
            | CoreError::Validation(_) => ApiError::bad_request(err.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(core) => core.into(),
            ServiceError::Auth(reason) => {
                tracing::debug!(%reason, "Rejected token");
                ApiError::unauthorized("invalid token")
            }
            ServiceError::Storage { .. } | ServiceError::Internal(_) => {
                error!(error = %err, "Request failed");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
