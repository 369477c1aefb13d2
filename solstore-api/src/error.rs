/// Error handling for the API server
///
/// A single boundary-level error type that maps the internal taxonomy to
/// HTTP responses. Handlers return `Result<T, AppError>`; the conversion
/// to a response happens exactly once, here.
///
/// # Taxonomy
///
/// - Validation: user-correctable input problems, collected as a field
///   list and surfaced together
/// - Not-found: the referenced id does not exist; a normal outcome, not a
///   server failure
/// - Conflict: duplicate username/email (unique constraint violations)
/// - Rate-limited: too many failed login attempts; expected, logged at WARN
/// - Internal: persistence or other unexpected failures; logged at ERROR
///   with a generic user-facing message — raw store errors never reach the
///   caller
///
/// # Example
///
/// ```
/// use solstore_api::error::{AppError, AppResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler() -> AppResult<Json<serde_json::Value>> {
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug)]
pub enum AppError {
    /// Bad request (400) - malformed submission
    BadRequest(String),

    /// Not found (404) - referenced id does not exist
    NotFound(String),

    /// Conflict (409) - duplicate username or email
    Conflict(String),

    /// Unprocessable entity (422) - collected validation errors
    Validation(Vec<FieldError>),

    /// Too many requests (429) - login attempt threshold reached
    RateLimited { retry_after: u64, message: String },

    /// Internal server error (500)
    Internal(String),
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            AppError::RateLimited { message, .. } => write!(f, "Rate limited: {}", message),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Rate limit gets a Retry-After header
        if let AppError::RateLimited {
            retry_after,
            message,
        } = &self
        {
            tracing::warn!(retry_after, "Login rate limit hit");
            let body = Json(ErrorResponse {
                error: "rate_limited".to_string(),
                message: message.clone(),
                details: None,
            });

            let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
            return response;
        }

        let (status, error_code, message, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::RateLimited { message, .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", message, None)
            }
            AppError::Internal(msg) => {
                // Log internal errors but don't expose details to callers
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An error occurred. Please try again.".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to application errors
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found.".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as user-level conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return AppError::Conflict(
                            "Username already exists. Please choose a different one.".to_string(),
                        );
                    }
                    if constraint.contains("email") {
                        return AppError::Conflict(
                            "Email already registered. Please use a different email.".to_string(),
                        );
                    }
                    return AppError::Conflict(format!("Constraint violation: {}", constraint));
                }

                AppError::Internal(format!("Database error: {}", db_err))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert password hashing errors to application errors
impl From<solstore_shared::auth::password::PasswordError> for AppError {
    fn from(err: solstore_shared::auth::password::PasswordError) -> Self {
        AppError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert image storage errors to application errors
impl From<solstore_shared::storage::StorageError> for AppError {
    fn from(err: solstore_shared::storage::StorageError) -> Self {
        AppError::Internal(format!("Image store operation failed: {}", err))
    }
}

/// Convert multipart parsing errors to application errors
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed form submission: {}", err))
    }
}
