//! Application error type and its HTTP rendering.
//!
//! Every handler returns `Result<_, AppError>`. Errors render as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Slug not found", "details": { "slug": "abc123" } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::errors::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed client input.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No record for the requested slug.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The allocator ran out of attempts. Indicates a broken generator or store.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// The record store could not be reached; the request may be retried.
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error renders with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AllocationExhausted { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::AllocationExhausted { message, details } => {
                ("allocation_exhausted", message, details)
            }
            AppError::Unavailable { message, details } => ("store_unavailable", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, details = %self.to_error_info().details, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(slug) => {
                AppError::not_found("Slug not found", json!({ "slug": slug }))
            }
            StoreError::Unavailable(reason) => {
                AppError::unavailable("Record store unavailable", json!({ "reason": reason }))
            }
            // Only the allocator can act on a duplicate; anywhere else it is a bug.
            StoreError::DuplicateSlug(slug) => {
                AppError::internal("Unexpected duplicate slug", json!({ "slug": slug }))
            }
            StoreError::Backend(reason) => {
                AppError::internal("Record store error", json!({ "reason": reason }))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request", details)
    }
}
