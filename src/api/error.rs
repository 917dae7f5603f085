//! API error handling.
//!
//! Errors are rendered as `text/plain` bodies. Storage faults never leak
//! their detail to the client: handlers log the underlying error and answer
//! with one of the fixed messages below.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body of every 500 raised by the list and create handlers.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong...";

/// Body of the 400 raised when a required creation field is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "issue_title, issue_text and created_by are required.";

/// Body of the 400 raised when an update carries nothing to apply.
pub const NO_UPDATED_FIELD_MESSAGE: &str = "no updated field sent";

/// Body of the 400 raised when `_id` is absent.
pub const MISSING_ID_MESSAGE: &str = "_id error";

// =============================================================================
// ApiError
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },
}

// =============================================================================
// Factory Methods
// =============================================================================

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn generic() -> Self {
        Self::internal(GENERIC_ERROR_MESSAGE)
    }

    #[must_use]
    pub fn required_fields() -> Self {
        Self::bad_request(REQUIRED_FIELDS_MESSAGE)
    }

    #[must_use]
    pub fn no_updated_field() -> Self {
        Self::bad_request(NO_UPDATED_FIELD_MESSAGE)
    }

    #[must_use]
    pub fn missing_id() -> Self {
        Self::bad_request(MISSING_ID_MESSAGE)
    }

    /// The issue to update does not exist.
    #[must_use]
    pub fn update_not_found(id: &str) -> Self {
        Self::not_found(format!("could not update {id}"))
    }

    /// Storage failed while updating; same text as [`ApiError::update_not_found`].
    #[must_use]
    pub fn update_failed(id: &str) -> Self {
        Self::internal(format!("could not update {id}"))
    }

    #[must_use]
    pub fn delete_failed(id: &str) -> Self {
        Self::internal(format!("could not delete {id}"))
    }
}

// =============================================================================
// Query Methods
// =============================================================================

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message } | Self::NotFound { message } | Self::Internal { message } => {
                message
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        match self {
            Self::BadRequest { message } | Self::NotFound { message } | Self::Internal { message } => {
                (status_code, message).into_response()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
