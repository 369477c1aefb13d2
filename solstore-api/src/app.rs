/// Application state and router construction
///
/// # Routes
///
/// Public:
/// - `GET /` - landing page payload (sliders + product cards)
/// - `GET /health` - liveness check
/// - `GET /login/`, `POST /login/` - admin login
/// - `POST /logout/` - end the session
///
/// Admin (authenticated session required):
/// - `GET /dashboard/` - admin overview
/// - `GET /products/`, `POST /products/` - inverter list and CRUD
/// - `GET /slider/`, `POST /slider/` - homepage slider list and CRUD
/// - `GET /registeruser/`, `POST /registeruser/` - admin accounts
/// - `POST /deleteuser/:id/` - remove an admin account

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use solstore_shared::session::SessionSecret;
use solstore_shared::storage::ImageStore;

use crate::config::Config;
use crate::middleware::{require_login, reject_unknown_hosts, SecurityHeadersLayer};
use crate::routes;

/// Request body cap; comfortably above the 5 MB image limit plus fields
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Image storage backend
    pub images: Arc<dyn ImageStore>,

    /// Session cookie signing key
    pub session_secret: SessionSecret,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, images: Arc<dyn ImageStore>) -> Self {
        let session_secret = SessionSecret::new(config.session.secret.clone());
        Self {
            db,
            config: Arc::new(config),
            images,
            session_secret,
        }
    }
}

/// Lets the `Session` extractor pull the signing key out of the state
impl FromRef<AppState> for SessionSecret {
    fn from_ref(state: &AppState) -> Self {
        state.session_secret.clone()
    }
}

/// Builds the complete application router
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/dashboard/", get(routes::dashboard::show))
        .route(
            "/products/",
            get(routes::products::page).post(routes::products::submit),
        )
        .route(
            "/slider/",
            get(routes::slider::page).post(routes::slider::submit),
        )
        .route(
            "/registeruser/",
            get(routes::users::page).post(routes::users::register),
        )
        .route("/deleteuser/:id/", post(routes::users::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    Router::new()
        .route("/", get(routes::home::index))
        .route("/health", get(routes::health::health_check))
        .route(
            "/login/",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route("/logout/", post(routes::auth::logout))
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reject_unknown_hosts,
        ))
        .layer(SecurityHeadersLayer::new(!state.config.server.debug))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
