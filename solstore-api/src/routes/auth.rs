/// Login and logout
///
/// Authentication is intentionally boring: username lookup, Argon2id
/// verification, and a signed session cookie. Two hardening details worth
/// noting:
///
/// - Failed attempts are counted per caller address inside the session;
///   the fifth failure locks login out with a 429 until the cookie-held
///   counter is gone.
/// - A wrong username and a wrong password produce the same message, so
///   the login form cannot be used to enumerate accounts.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use solstore_shared::auth::password::verify_password;
use solstore_shared::models::user::User;
use solstore_shared::session::{Flash, FlashLevel, Session};

use crate::app::AppState;
use crate::error::{AppError, AppResult, ErrorResponse, FieldError};

/// Cooldown window after too many failed attempts, in seconds
const RATE_LIMIT_RETRY_AFTER: u64 = 15 * 60;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// "Remember me" checkbox; any non-empty value counts as checked
    #[serde(default)]
    pub remember: Option<String>,

    /// Post-login redirect target carried through the form
    #[serde(default)]
    pub next: Option<String>,
}

/// Login page payload
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub messages: Vec<Flash>,
}

/// GET /login/ - login page with any pending flash messages
pub async fn login_page(State(state): State<AppState>, mut session: Session) -> Response {
    let page = LoginPage {
        messages: session.take_messages(),
    };
    let response = Json(page).into_response();
    session.apply(state.session_secret.expose(), response)
}

/// POST /login/ - authenticate and open a session
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let secret = state.session_secret.expose();

    // Already logged in: nothing to do, go to the dashboard
    if session.is_authenticated() {
        session.flash(FlashLevel::Info, "You are already logged in.");
        let response = Redirect::to("/dashboard/").into_response();
        return Ok(session.apply(secret, response));
    }

    let username = form.username.trim();
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Please enter your username."));
    } else if username.len() > 150 {
        errors.push(FieldError::new("username", "Username is too long."));
    }
    if form.password.is_empty() {
        errors.push(FieldError::new("password", "Please enter your password."));
    } else if form.password.len() > 128 {
        errors.push(FieldError::new("password", "Password is too long."));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // The cooldown only gates actual credential checks; incomplete forms
    // get their field messages regardless
    let addr = caller_addr(&headers);
    if session.is_rate_limited(&addr) {
        return Err(AppError::RateLimited {
            retry_after: RATE_LIMIT_RETRY_AFTER,
            message: "Too many failed login attempts. Please try again in 15 minutes."
                .to_string(),
        });
    }

    if let Some(user) = User::find_by_username(&state.db, username).await? {
        if verify_password(&form.password, &user.password_hash)? {
            session.clear_failed_attempts(&addr);
            let remember = form
                .remember
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty());
            session.login(user.id, &user.username, &user.email, remember);
            session.flash(
                FlashLevel::Success,
                format!("Welcome back, {}!", user.username),
            );

            // Form-supplied target wins over one remembered by the guard;
            // either way it must be a same-site relative path
            let target = form
                .next
                .filter(|n| is_safe_redirect(n))
                .or_else(|| session.take_next().filter(|n| is_safe_redirect(n)))
                .unwrap_or_else(|| "/dashboard/".to_string());

            info!(user_id = user.id, username = %user.username, "Login succeeded");
            let response = Redirect::to(&target).into_response();
            return Ok(session.apply(secret, response));
        }
    }

    // Unknown user and wrong password are indistinguishable to the caller
    session.record_failed_attempt(&addr);
    warn!(
        username = %username,
        addr = %addr,
        attempts = session.failed_attempts(&addr),
        "Login failed"
    );

    let body = Json(ErrorResponse {
        error: "invalid_credentials".to_string(),
        message: "Invalid username or password.".to_string(),
        details: None,
    });
    let response = (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
    Ok(session.apply(secret, response))
}

/// POST /logout/ - end the session
///
/// Idempotent: logging out while logged out is fine.
pub async fn logout(State(state): State<AppState>, mut session: Session) -> Response {
    let username = session.username().unwrap_or("User").to_string();

    session.flush();
    session.flash(
        FlashLevel::Success,
        format!("Goodbye {}! You have been logged out successfully.", username),
    );

    let response = Redirect::to("/login/").into_response();
    session.apply(state.session_secret.expose(), response)
}

/// Best-effort caller network address for the failed-attempt counter
///
/// Takes the first X-Forwarded-For entry, then X-Real-IP, then gives up
/// with a shared "unknown" bucket.
fn caller_addr(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

/// Whether a post-login target is a same-site relative path
///
/// `//host` is scheme-relative and would leave the site, so only a single
/// leading slash is accepted.
fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//")
}
