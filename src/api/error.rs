//! API error handling.
//!
//! This module provides error types and response formatting for the API.
//! Every error body carries a human-readable `error` message and a
//! machine-checkable `code`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::StoreError;

/// Error code for a body field that failed validation.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Error code for an unknown or unparseable task identity.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Error code for a body that is not a JSON object.
pub const INVALID_JSON: &str = "INVALID_JSON";

// =============================================================================
// API Error
// =============================================================================

/// API error structure for JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description of the first violated constraint.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Name of the offending field, for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            field: None,
        }
    }

    /// Creates a validation error naming the offending field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: VALIDATION_ERROR.to_string(),
            field: Some(field.into()),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and error details.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error details.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response for a field validation error.
    #[must_use]
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::validation(field, message))
    }

    /// Creates a 400 Bad Request response for an unreadable body.
    #[must_use]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(INVALID_JSON, message))
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new(NOT_FOUND, message))
    }

    /// Creates the 404 response used for every unknown task identity.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self::not_found("Task not found.")
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => {
                tracing::debug!(task_id = %id, "Task not found");
                Self::task_not_found()
            }
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        Self::invalid_json(rejection.body_text())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// The first constraint a request body violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the field that failed validation.
    pub field: &'static str,
    /// Error message for this field.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.message)
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        tracing::debug!(field = error.field, message = %error.message, "Validation failed");
        Self::validation_error(error.field, error.message)
    }
}

// =============================================================================
// Tests
// =============================================================================
