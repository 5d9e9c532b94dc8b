//! Application error types.

use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, rejected before any storage call.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    /// Any storage failure, tagged with the call site that issued it.
    #[error("database error in {operation}")]
    Persistence {
        operation: String,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    /// Wrap a storage failure with its call site, e.g. `blogs.create`.
    pub fn persistence(operation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Persistence {
            operation: operation.into(),
            source,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Persistence { source, .. } => persistence_status(source),
        }
    }

    /// Text safe to show to clients. Driver messages never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound => "resource not found".to_string(),
            AppError::Persistence { .. } => match self.status() {
                StatusCode::CONFLICT => "resource conflicts with existing data".to_string(),
                StatusCode::SERVICE_UNAVAILABLE => "storage temporarily unavailable".to_string(),
                StatusCode::NOT_FOUND => "resource not found".to_string(),
                _ => "internal server error".to_string(),
            },
        }
    }

    /// Full `a: b: c` chain of this error and its sources, for logs.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = StdError::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

fn persistence_status(err: &sqlx::Error) -> StatusCode {
    match err {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StatusCode::SERVICE_UNAVAILABLE,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Uniform error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// Render the uniform body for `status`.
///
/// Also used by the transport middleware for failures that never reach a
/// handler (panics, timeouts).
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        status: status.as_u16(),
        error: status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
        message: message.into(),
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.public_message())
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
