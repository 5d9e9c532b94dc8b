//! Transport middleware wrapped around the application router.
//!
//! Layers, outermost first: request id, trace, propagate id, security
//! headers, catch panic, timeout, CORS, gzip, body limit.
//!
//! Panics and timeouts never reach a handler, so they are logged here and
//! rendered with the same error body the handlers use.

use std::any::Any;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::Response;
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::error_response;
use crate::routes::helpers::REQUEST_ID_HEADER;

/// Wrap `router` in the full transport stack.
pub fn apply(router: Router, config: &Config) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(build_cors_layer(config))
        .layer(CompressionLayer::new());

    router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(middleware)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        header::ORIGIN,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    let layer = CorsLayer::new().allow_methods(methods).allow_headers(headers);

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        layer.allow_origin(origins)
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };

    error!(status = 500, panic = %detail, "handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

async fn handle_middleware_error(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    err: BoxError,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    if err.is::<Elapsed>() {
        error!(
            method = %method,
            path = %uri.path(),
            request_id,
            status = 408,
            "request timed out"
        );
        return error_response(StatusCode::REQUEST_TIMEOUT, "request timed out");
    }

    error!(
        method = %method,
        path = %uri.path(),
        request_id,
        status = 500,
        error = %err,
        "request failed in middleware"
    );
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}
