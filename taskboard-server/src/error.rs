//! Service error type and its HTTP mapping.
//!
//! Every handler returns [`ServiceError`] on failure. The JSON body always
//! carries a stable `code` plus a human-readable `message`:
//!
//! ```json
//! {"code": "NOT_FOUND", "message": "Task not found"}
//! ```
//!
//! Internal failures are logged with their detail and answered with a
//! generic message naming the failed action.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskboard_proto::schema::ValidationError;
use taskboard_proto::wire::ErrorBody;

use crate::store::StoreError;

/// Stable error codes sent to clients.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Errors surfaced by the task service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad request body. HTTP 400.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task for the requested id. HTTP 404.
    #[error("Task not found")]
    NotFound(String),

    /// Store failure. HTTP 500.
    #[error("Error {action}")]
    Internal {
        /// What the handler was doing, e.g. `"creating task"`.
        action: &'static str,
        /// The underlying store failure (logged, never sent).
        source: StoreError,
    },
}

impl ServiceError {
    /// Classifies a store error raised while performing `action`.
    #[must_use]
    pub fn from_store(action: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id.to_string()),
            source => Self::Internal { action, source },
        }
    }

    /// Stable, machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => error_code::VALIDATION_FAILED,
            Self::NotFound(_) => error_code::NOT_FOUND,
            Self::Internal { .. } => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal { action, source } => {
                tracing::error!(action = %action, error = %source, "request failed");
            }
            Self::NotFound(id) => tracing::debug!(id = %id, "task not found"),
            Self::Validation(e) => tracing::debug!(error = %e, "request rejected"),
        }
        let body = ErrorBody {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), axum::Json(body)).into_response()
    }
}
