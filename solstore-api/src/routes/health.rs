/// Health check endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// Reports service liveness and database reachability
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = solstore_shared::db::pool::health_check(&state.db)
        .await
        .is_ok();

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "healthy" } else { "degraded" },
            "database": database_ok,
            "version": solstore_shared::VERSION,
        })),
    )
}
