/// Session state for the admin area
///
/// Per-caller state carried in a signed cookie: authentication flag and
/// identity, the post-login redirect target, per-address failed-login
/// counters, and flash messages. The session is an explicit typed object
/// handed to each handler through an axum extractor; there is no shared
/// in-process session table.
///
/// # Lifecycle
///
/// A request without a cookie (or with a tampered/expired one) gets a fresh
/// empty session. Handlers mutate the session, then call
/// [`Session::apply`] on their response; only sessions that were actually
/// mutated emit a `Set-Cookie` header.
///
/// # Example
///
/// ```
/// use solstore_shared::session::Session;
///
/// let mut session = Session::new();
/// session.login(1, "admin", "admin@example.com", false);
/// assert!(session.is_authenticated());
///
/// session.flush();
/// assert!(!session.is_authenticated());
/// ```

pub mod cookie;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

pub use cookie::SessionError;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

/// Session lifetime when "remember me" was requested: 30 days
pub const REMEMBER_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Failed login attempts allowed per caller address before cooldown
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Severity of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-shot status message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

/// Serialized session payload
///
/// Every field defaults so that older cookies keep decoding when new
/// fields are added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Unix timestamp of the last successful login
    #[serde(default)]
    pub login_time: Option<i64>,

    #[serde(default)]
    pub is_authenticated: bool,

    /// Path the caller originally requested before being sent to login
    #[serde(default)]
    pub next: Option<String>,

    /// Failed login attempts, keyed by caller network address
    #[serde(default)]
    pub login_attempts: HashMap<String, u32>,

    /// Pending flash messages, drained on the next render
    #[serde(default)]
    pub messages: Vec<Flash>,

    /// Unix expiry timestamp; None = expires when the client disconnects
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// A caller's session, decoded from (and re-encoded into) the `sid` cookie
#[derive(Debug, Default)]
pub struct Session {
    data: SessionData,
    dirty: bool,
}

impl Session {
    /// Creates a fresh empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the session from request headers
    ///
    /// A missing, tampered, malformed, or expired cookie yields a fresh
    /// session instead of an error; a bad cookie should never take down a
    /// request.
    pub fn from_request_headers(headers: &HeaderMap, secret: &str) -> Self {
        let Some(value) = cookie_value(headers, SESSION_COOKIE) else {
            return Self::new();
        };

        let data: SessionData = match cookie::open(secret, &value) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding invalid session cookie");
                return Self::new();
            }
        };

        if let Some(expires_at) = data.expires_at {
            if expires_at <= Utc::now().timestamp() {
                tracing::debug!("Discarding expired session");
                return Self::new();
            }
        }

        Session { data, dirty: false }
    }

    /// Whether the caller has logged in
    pub fn is_authenticated(&self) -> bool {
        self.data.is_authenticated
    }

    /// Identity of the logged-in user, if any
    pub fn user_id(&self) -> Option<i64> {
        self.data.user_id
    }

    /// Username of the logged-in user, if any
    pub fn username(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    /// Records a successful login
    ///
    /// Populates identity and login timestamp, sets the authenticated
    /// flag, and sets the session lifetime: 30 days when `remember` was
    /// requested, otherwise browser-session only.
    pub fn login(&mut self, user_id: i64, username: &str, email: &str, remember: bool) {
        let now = Utc::now().timestamp();
        self.data.user_id = Some(user_id);
        self.data.username = Some(username.to_string());
        self.data.email = Some(email.to_string());
        self.data.login_time = Some(now);
        self.data.is_authenticated = true;
        self.data.expires_at = if remember {
            Some(now + REMEMBER_SECONDS)
        } else {
            None
        };
        self.dirty = true;
    }

    /// Clears all session state unconditionally
    pub fn flush(&mut self) {
        self.data = SessionData::default();
        self.dirty = true;
    }

    /// Failed login attempts recorded for a caller address
    pub fn failed_attempts(&self, addr: &str) -> u32 {
        self.data.login_attempts.get(addr).copied().unwrap_or(0)
    }

    /// Whether a caller address has hit the failed-attempt threshold
    pub fn is_rate_limited(&self, addr: &str) -> bool {
        self.failed_attempts(addr) >= MAX_LOGIN_ATTEMPTS
    }

    /// Records one failed login attempt for a caller address
    pub fn record_failed_attempt(&mut self, addr: &str) {
        let count = self.data.login_attempts.entry(addr.to_string()).or_insert(0);
        *count += 1;
        self.dirty = true;
    }

    /// Clears the failed-attempt counter for a caller address
    pub fn clear_failed_attempts(&mut self, addr: &str) {
        if self.data.login_attempts.remove(addr).is_some() {
            self.dirty = true;
        }
    }

    /// Remembers the path to return to after login
    pub fn remember_next(&mut self, path: &str) {
        self.data.next = Some(path.to_string());
        self.dirty = true;
    }

    /// Takes the remembered post-login path, clearing it
    pub fn take_next(&mut self) -> Option<String> {
        let next = self.data.next.take();
        if next.is_some() {
            self.dirty = true;
        }
        next
    }

    /// Attaches a flash message
    pub fn flash(&mut self, level: FlashLevel, text: impl Into<String>) {
        self.data.messages.push(Flash {
            level,
            text: text.into(),
        });
        self.dirty = true;
    }

    /// Drains pending flash messages for rendering
    pub fn take_messages(&mut self) -> Vec<Flash> {
        if self.data.messages.is_empty() {
            return Vec::new();
        }
        self.dirty = true;
        std::mem::take(&mut self.data.messages)
    }

    /// Whether the session was mutated and needs re-encoding
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Encodes the session into a `Set-Cookie` header value
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or the result
    /// is not a valid header value
    pub fn to_set_cookie(&self, secret: &str) -> Result<HeaderValue, SessionError> {
        let value = cookie::seal(secret, &self.data)?;

        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, value
        );
        if let Some(expires_at) = self.data.expires_at {
            let max_age = (expires_at - Utc::now().timestamp()).max(0);
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        HeaderValue::from_str(&cookie).map_err(|_| SessionError::Malformed)
    }

    /// Writes the session cookie onto a response if the session changed
    ///
    /// Encoding failures are logged and swallowed; a response must never
    /// fail because the session couldn't be re-signed.
    pub fn apply<B>(self, secret: &str, mut response: Response<B>) -> Response<B> {
        if !self.dirty {
            return response;
        }

        match self.to_set_cookie(secret) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session cookie");
            }
        }

        response
    }
}

/// Session signing secret, injected into the router state
///
/// Newtype so the axum extractor can pull it out of any state type that
/// implements `FromRef<S>` for it.
#[derive(Clone)]
pub struct SessionSecret(Arc<String>);

impl SessionSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::new(secret.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    SessionSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secret = SessionSecret::from_ref(state);
        Ok(Session::from_request_headers(&parts.headers, secret.expose()))
    }
}

/// Extracts a named cookie's value from request headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some((key, value)) = pair.split_once('=') {
                if key == name {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const SECRET: &str = "test-session-secret-at-least-32-bytes!!";

    fn headers_with_cookie(value: &HeaderValue) -> HeaderMap {
        // Set-Cookie value up to the first attribute is a valid Cookie pair
        let cookie_pair = value
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie_pair.parse().unwrap());
        headers
    }

    #[test]
    fn test_fresh_session_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(!session.is_dirty());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_login_roundtrip_through_cookie() {
        let mut session = Session::new();
        session.login(7, "admin", "admin@example.com", false);

        let set_cookie = session.to_set_cookie(SECRET).unwrap();
        let headers = headers_with_cookie(&set_cookie);

        let restored = Session::from_request_headers(&headers, SECRET);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user_id(), Some(7));
        assert_eq!(restored.username(), Some("admin"));
        assert!(!restored.is_dirty());
    }

    #[test]
    fn test_tampered_cookie_yields_fresh_session() {
        let mut session = Session::new();
        session.login(7, "admin", "admin@example.com", false);

        let set_cookie = session.to_set_cookie(SECRET).unwrap();
        let headers = headers_with_cookie(&set_cookie);

        let restored = Session::from_request_headers(&headers, "some-other-32-byte-session-secret!!!!!");
        assert!(!restored.is_authenticated());
    }

    #[test]
    fn test_remember_sets_expiry_and_max_age() {
        let mut session = Session::new();
        session.login(7, "admin", "admin@example.com", true);

        let set_cookie = session.to_set_cookie(SECRET).unwrap();
        let cookie = set_cookie.to_str().unwrap();
        assert!(cookie.contains("Max-Age="));

        let mut without_remember = Session::new();
        without_remember.login(7, "admin", "admin@example.com", false);
        let set_cookie = without_remember.to_set_cookie(SECRET).unwrap();
        assert!(!set_cookie.to_str().unwrap().contains("Max-Age="));
    }

    #[test]
    fn test_expired_session_discarded() {
        let mut session = Session::new();
        session.login(7, "admin", "admin@example.com", false);
        // Force an expiry in the past
        session.data.expires_at = Some(Utc::now().timestamp() - 60);
        session.dirty = true;

        let set_cookie = session.to_set_cookie(SECRET).unwrap();
        let headers = headers_with_cookie(&set_cookie);

        let restored = Session::from_request_headers(&headers, SECRET);
        assert!(!restored.is_authenticated());
    }

    #[test]
    fn test_failed_attempt_counter() {
        let mut session = Session::new();
        assert_eq!(session.failed_attempts("10.0.0.1"), 0);
        assert!(!session.is_rate_limited("10.0.0.1"));

        for _ in 0..MAX_LOGIN_ATTEMPTS {
            session.record_failed_attempt("10.0.0.1");
        }
        assert_eq!(session.failed_attempts("10.0.0.1"), 5);
        assert!(session.is_rate_limited("10.0.0.1"));

        // Another address is unaffected
        assert!(!session.is_rate_limited("10.0.0.2"));

        session.clear_failed_attempts("10.0.0.1");
        assert!(!session.is_rate_limited("10.0.0.1"));
    }

    #[test]
    fn test_flash_messages_drain_once() {
        let mut session = Session::new();
        session.flash(FlashLevel::Success, "Inverter created successfully!");
        session.flash(FlashLevel::Error, "Price must be a number.");

        let messages = session.take_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, FlashLevel::Success);

        assert!(session.take_messages().is_empty());
    }

    #[test]
    fn test_next_path_taken_once() {
        let mut session = Session::new();
        session.remember_next("/products/");
        assert_eq!(session.take_next().as_deref(), Some("/products/"));
        assert_eq!(session.take_next(), None);
    }

    #[test]
    fn test_flush_clears_everything() {
        let mut session = Session::new();
        session.login(7, "admin", "admin@example.com", true);
        session.record_failed_attempt("10.0.0.1");
        session.flush();

        assert!(!session.is_authenticated());
        assert_eq!(session.user_id(), None);
        assert_eq!(session.failed_attempts("10.0.0.1"), 0);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_apply_only_writes_when_dirty() {
        let clean = Session::new();
        let response = clean.apply(SECRET, Response::new(Body::empty()));
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let mut dirty = Session::new();
        dirty.flash(FlashLevel::Info, "hello");
        let response = dirty.apply(SECRET, Response::new(Body::empty()));
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }
}
