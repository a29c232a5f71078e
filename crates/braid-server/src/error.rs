//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use braid_core::error::BraidError;
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "BACKEND_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from braid-core errors
impl From<BraidError> for ApiError {
    fn from(err: BraidError) -> Self {
        match err {
            BraidError::Validation {
                message, details, ..
            } => {
                let api = ApiError::validation(message);
                if details.is_empty() {
                    api
                } else {
                    api.with_details(serde_json::json!(details))
                }
            }
            BraidError::Configuration(msg) => ApiError::bad_request(msg),
            BraidError::Backend {
                backend, message, ..
            } => ApiError::bad_gateway(format!("{} backend error: {}", backend, message)),
            BraidError::Network { message, .. } => {
                ApiError::bad_gateway(format!("Network error: {}", message))
            }
            BraidError::Timeout(msg) => ApiError::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg),
            BraidError::Tool { message, .. } => {
                ApiError::bad_gateway(format!("Tool error: {}", message))
            }
            BraidError::Parse { message, .. } => {
                ApiError::internal(format!("Parse error: {}", message))
            }
            BraidError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            BraidError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            BraidError::Internal(msg) => ApiError::internal(msg),
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
