//! Error types for the HTTP API.
//!
//! Every failure leaves the server as a status code plus `{"error": message}`.
//!
//! ```text
//! ValidationError ─────────────► 400
//! CoreError::*NotFound ────────► 404
//! wrong method ────────────────► 405
//! anything else ───────────────► 500 (logged, generic message)
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use luna_core::{CoreError, ValidationError};
use luna_db::DbError;

/// An error ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, message)
    }

    pub fn method_not_allowed() -> Self {
        ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn internal() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// A required query parameter is absent or blank.
    pub fn missing_param(name: &str) -> Self {
        ApiError::bad_request(format!("Missing required parameter: {name}"))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::BranchNotFound(_) => ApiError::not_found("Branch not found"),
            CoreError::MenuItemNotFound(_) => ApiError::not_found("Invalid menu item"),
            CoreError::OrderNotFound(_) => ApiError::not_found("Order not found"),
            e if e.is_not_found() => ApiError::not_found(e.to_string()),
            e => {
                error!(error = %e, "Domain error surfaced as internal error");
                ApiError::internal()
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            e @ DbError::NotFound { .. } => ApiError::not_found(e.to_string()),
            e => {
                error!(error = %e, "Database error");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
