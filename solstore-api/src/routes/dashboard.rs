/// Admin dashboard

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use solstore_shared::models::inverter::Inverter;
use solstore_shared::session::{Flash, Session};

use crate::app::AppState;
use crate::error::AppResult;

/// Dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub username: Option<String>,
    pub inverter_count: i64,
    pub messages: Vec<Flash>,
}

/// GET /dashboard/ - admin overview
pub async fn show(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    let inverter_count = Inverter::count(&state.db).await?;

    let page = DashboardPage {
        username: session.username().map(String::from),
        inverter_count,
        messages: session.take_messages(),
    };

    let response = Json(page).into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}
