/// Login guard for the admin area
///
/// Every request to a protected path must carry an authenticated session.
/// An unauthenticated caller is redirected to the login page with a
/// warning flash, and the originally requested path is remembered in the
/// session so a successful login can return them there.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use solstore_shared::session::{FlashLevel, Session};
use tracing::debug;

use crate::app::AppState;

/// Path prefixes that require an authenticated session
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/products",
    "/slider",
    "/registeruser",
    "/deleteuser",
];

/// Whether a request path falls inside the admin area
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Middleware that enforces authentication on protected paths
///
/// Requests outside the admin area pass through untouched. The guard only
/// reads the session; the redirect response carries the updated cookie
/// with the remembered path and flash message.
pub async fn require_login(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !is_protected(&path) {
        return next.run(request).await;
    }

    let secret = state.session_secret.expose().to_string();
    let session = Session::from_request_headers(request.headers(), &secret);
    if session.is_authenticated() {
        return next.run(request).await;
    }

    debug!(path = %path, "Unauthenticated access to protected path");

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or(path);

    let mut session = session;
    session.remember_next(&target);
    session.flash(
        FlashLevel::Warning,
        "You need to login first to access this page.",
    );

    session.apply(&secret, Redirect::to("/login/").into_response())
}
