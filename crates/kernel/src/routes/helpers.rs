//! Shared route helpers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the request id set by the request-id middleware.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request details attached to error logs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub request_id: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            request_id,
        })
    }
}

impl RequestContext {
    /// Log `err` with request context and hand it back for the response.
    ///
    /// Every error that reaches a handler goes through here exactly once.
    pub fn fail(&self, resource: &str, err: AppError) -> AppError {
        let status = err.status();
        let request_id = self.request_id.as_deref().unwrap_or("-");
        let chain = err.chain();

        if status.is_server_error() {
            tracing::error!(
                method = %self.method,
                path = %self.path,
                request_id,
                resource,
                status = status.as_u16(),
                error = %chain,
                "request failed"
            );
        } else {
            tracing::warn!(
                method = %self.method,
                path = %self.path,
                request_id,
                resource,
                status = status.as_u16(),
                error = %chain,
                "request rejected"
            );
        }

        err
    }
}

/// Parse a path identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("invalid identifier '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_uuid() {
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string()).ok(), Some(id));
    }

    #[test]
    fn rejects_malformed_id() {
        let err = parse_id("not-a-uuid");
        assert!(matches!(err, Err(AppError::Validation(msg)) if msg.contains("not-a-uuid")));
    }
}
