//! Client-side error taxonomy.

use thiserror::Error;

use crate::api::ApiError;

/// Errors observed by the client when talking to the Task API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The API rejected the request body (HTTP 400).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Offending field, when the API named one.
        field: Option<String>,
        /// Message from the API.
        message: String,
    },

    /// The API does not know the task (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request did not complete; server state is unknown.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The API answered with something the client cannot interpret.
    #[error("Unexpected response ({status}): {message}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Body text or decoding error.
        message: String,
    },
}

impl ClientError {
    /// Classifies a non-success response by status and parsed error body.
    #[must_use]
    pub fn from_response(status: u16, body: Option<ApiError>) -> Self {
        match (status, body) {
            (400, Some(error)) => Self::InvalidInput {
                field: error.field,
                message: error.error,
            },
            (400, None) => Self::InvalidInput {
                field: None,
                message: "Bad request".to_string(),
            },
            (404, Some(error)) => Self::NotFound(error.error),
            (404, None) => Self::NotFound("Task not found.".to_string()),
            (status, Some(error)) => Self::Unexpected {
                status,
                message: error.error,
            },
            (status, None) => Self::Unexpected {
                status,
                message: String::new(),
            },
        }
    }

    /// Returns true for failures where the server state is unknown.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Unexpected {
                status: error.status().map_or(0, |status| status.as_u16()),
                message: error.to_string(),
            }
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{NOT_FOUND, VALIDATION_ERROR};
    use rstest::rstest;

    #[rstest]
    fn test_from_response_validation() {
        let error = ClientError::from_response(
            400,
            Some(ApiError::validation("title", "title is required")),
        );
        assert_eq!(
            error,
            ClientError::InvalidInput {
                field: Some("title".to_string()),
                message: "title is required".to_string(),
            }
        );
        assert_eq!(error.to_string(), "Invalid input: title is required");
    }

    #[rstest]
    fn test_from_response_not_found() {
        let error = ClientError::from_response(404, Some(ApiError::new(NOT_FOUND, "Task not found.")));
        assert_eq!(error, ClientError::NotFound("Task not found.".to_string()));
        assert!(!error.is_transport());
    }

    #[rstest]
    #[case(500)]
    #[case(503)]
    fn test_from_response_unexpected(#[case] status: u16) {
        let error = ClientError::from_response(status, Some(ApiError::new(VALIDATION_ERROR, "x")));
        assert!(matches!(error, ClientError::Unexpected { status: s, .. } if s == status));
    }

    #[rstest]
    fn test_from_response_without_body() {
        assert!(matches!(
            ClientError::from_response(400, None),
            ClientError::InvalidInput { field: None, .. }
        ));
        assert!(matches!(
            ClientError::from_response(404, None),
            ClientError::NotFound(_)
        ));
    }

    #[rstest]
    fn test_transport_classification() {
        assert!(ClientError::Transport("connection refused".to_string()).is_transport());
    }
}
