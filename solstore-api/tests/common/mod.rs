/// Common test utilities for integration tests
///
/// Two flavors of setup:
/// - `router_only()` builds the app over a lazy pool that never connects;
///   enough for everything that doesn't touch the database (guard
///   redirects, login validation, security headers).
/// - `db_context()` builds the full app against `DATABASE_URL`, running
///   migrations first. Tests calling it return early when the variable is
///   unset so the suite passes on machines without Postgres.

use axum::body::Body;
use axum::http::{header, Request, Response};
use sqlx::PgPool;
use std::sync::Arc;

use solstore_api::app::{build_router, AppState};
use solstore_api::config::{Config, DatabaseConfig, MediaConfig, ServerConfig, SessionConfig};
use solstore_shared::auth::password::hash_password;
use solstore_shared::models::user::{CreateUser, User};
use solstore_shared::session::Session;
use solstore_shared::storage::{ImageStore, LocalImageStore};

pub const TEST_SECRET: &str = "integration-test-secret-32-bytes-min!!";

/// Multipart boundary used by [`multipart_body`]
pub const BOUNDARY: &str = "solstore-test-boundary";

/// Media root shared by all test apps
pub fn media_root() -> std::path::PathBuf {
    std::env::temp_dir().join("solstore-test-media")
}

pub fn test_config(allowed_hosts: Vec<&str>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_hosts: allowed_hosts.into_iter().map(String::from).collect(),
            debug: true,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            max_connections: 5,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
        },
        media: MediaConfig {
            root: media_root().to_string_lossy().into_owned(),
        },
    }
}

fn state_with(db: PgPool, config: Config) -> AppState {
    let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(config.media.root.clone()));
    AppState::new(db, config, images)
}

/// App over a pool that never actually connects
pub fn router_only() -> axum::Router {
    router_only_with_hosts(vec!["*"])
}

pub fn router_only_with_hosts(allowed_hosts: Vec<&str>) -> axum::Router {
    let config = test_config(allowed_hosts);
    let db = PgPool::connect_lazy(&config.database.url).expect("lazy pool");
    build_router(state_with(db, config))
}

/// Full test context backed by a real database
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub admin: User,
    pub password: String,
}

impl TestContext {
    pub async fn cleanup(&self) {
        let _ = User::delete(&self.db, self.admin.id).await;
    }
}

/// Connects to `DATABASE_URL`, or None when it isn't set
pub async fn db_context() -> Option<TestContext> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };

    let db = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("../solstore-shared/migrations")
        .run(&db)
        .await
        .expect("run migrations");

    let password = "correct-horse-battery".to_string();
    let admin = User::create(
        &db,
        CreateUser {
            username: unique("admin"),
            email: format!("{}@example.com", unique("admin")),
            password_hash: hash_password(&password).expect("hash password"),
        },
    )
    .await
    .expect("create admin user");

    let mut config = test_config(vec!["*"]);
    config.database.url = url;
    let app = build_router(state_with(db.clone(), config));

    Some(TestContext {
        db,
        app,
        admin,
        password,
    })
}

/// A name made unique across test runs
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Cookie header value for an authenticated session
pub fn logged_in_cookie(user_id: i64, username: &str) -> String {
    let mut session = Session::new();
    session.login(user_id, username, &format!("{}@example.com", username), false);
    cookie_pair(&session.to_set_cookie(TEST_SECRET).expect("encode session"))
}

/// Cookie header value carrying `attempts` failed logins for an address
pub fn rate_limited_cookie(addr: &str, attempts: u32) -> String {
    let mut session = Session::new();
    for _ in 0..attempts {
        session.record_failed_attempt(addr);
    }
    cookie_pair(&session.to_set_cookie(TEST_SECRET).expect("encode session"))
}

/// Extracts the `name=value` pair from a Set-Cookie header value
pub fn cookie_pair(set_cookie: &axum::http::HeaderValue) -> String {
    set_cookie
        .to_str()
        .expect("cookie is ascii")
        .split(';')
        .next()
        .expect("cookie has a pair")
        .to_string()
}

/// Set-Cookie pair from a response, if present
pub fn response_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(cookie_pair)
}

/// URL-encoded form POST request
pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// Multipart form POST request with text fields only
pub fn multipart_request(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let mut builder = Request::builder().method("POST").uri(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body)).expect("request")
}

/// Multipart form POST request with text fields plus one image upload
pub fn multipart_request_with_image(
    uri: &str,
    fields: &[(&str, &str)],
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    cookie: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, filename, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body)).expect("request")
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is json")
}
