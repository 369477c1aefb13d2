/// Host header allowlisting
///
/// Mirrors the deployment practice of refusing requests addressed to a
/// hostname the server was not configured to serve. With the default
/// allowlist of `*` the filter is a no-op.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::app::AppState;
use crate::error::ErrorResponse;

/// Middleware that rejects requests with a disallowed Host header
pub async fn reject_unknown_hosts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if state.config.host_allowed(host) {
        return next.run(request).await;
    }

    warn!(host = %host, "Rejected request for disallowed host");
    let body = Json(ErrorResponse {
        error: "bad_request".to_string(),
        message: "Invalid Host header.".to_string(),
        details: None,
    });
    (StatusCode::BAD_REQUEST, body).into_response()
}
