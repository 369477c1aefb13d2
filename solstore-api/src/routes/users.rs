/// Admin account management
///
/// Registration collects every validation failure into one response
/// instead of stopping at the first, so the whole form can be corrected
/// in one pass. Duplicate username/email checks run up front; the unique
/// constraints remain the backstop for concurrent submissions.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::ValidateEmail;

use solstore_shared::auth::password::hash_password;
use solstore_shared::models::user::{CreateUser, User};
use solstore_shared::session::{Flash, FlashLevel, Session};

use crate::app::AppState;
use crate::error::{AppError, AppResult, FieldError};

/// Registration form fields
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub confirm_password: String,
}

/// User management page payload
#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub messages: Vec<Flash>,
}

/// GET /registeruser/ - admin account list
pub async fn page(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    let users = User::list(&state.db).await?;
    let page = UsersPage {
        users,
        messages: session.take_messages(),
    };

    let response = Json(page).into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}

/// POST /registeruser/ - create an admin account
pub async fn register(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push(FieldError::new("username", "Username is required."));
    } else if username.chars().count() > 50 {
        errors.push(FieldError::new(
            "username",
            "Username must be less than 50 characters.",
        ));
    }

    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required."));
    } else if !email.validate_email() {
        errors.push(FieldError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }

    if form.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required."));
    } else if form.password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters long.",
        ));
    }

    // Confirmation is only checked when the field was actually filled in
    if !form.confirm_password.is_empty() && form.password != form.confirm_password {
        errors.push(FieldError::new(
            "confirm_password",
            "Passwords do not match.",
        ));
    }

    // Duplicate checks join the same error list as the field checks
    if !username.is_empty() && User::username_taken(&state.db, &username).await? {
        errors.push(FieldError::new(
            "username",
            "Username already exists. Please choose a different one.",
        ));
    }
    if !email.is_empty() && User::email_taken(&state.db, &email).await? {
        errors.push(FieldError::new(
            "email",
            "Email already registered. Please use a different email.",
        ));
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = hash_password(&form.password)?;
    let user = User::create(
        &state.db,
        CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, "Admin account created");
    session.flash(
        FlashLevel::Success,
        format!("Account created successfully for {}!", user.username),
    );

    let response = Redirect::to("/dashboard/").into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}

/// POST /deleteuser/:id/ - remove an admin account
pub async fn delete(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    if User::delete(&state.db, id).await? {
        info!(user_id = id, "Admin account deleted");
        session.flash(FlashLevel::Success, "User deleted successfully.");
    } else {
        session.flash(FlashLevel::Error, "User not found.");
    }

    let response = Redirect::to("/registeruser/").into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}
