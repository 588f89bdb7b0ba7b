//! Roster handler: who is currently on the canvas.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RosterResponse;
use crate::app_state::AppState;

/// `GET /roster` — Current roster of joined participants.
#[utoipa::path(
    get,
    path = "/api/v1/roster",
    tag = "Roster",
    summary = "Current roster",
    description = "Returns the joined participants in the same order as the latest `update-user-list` broadcast. Connections that have not joined are not listed.",
    responses(
        (status = 200, description = "Current roster", body = RosterResponse),
    )
)]
pub async fn get_roster(State(state): State<AppState>) -> impl IntoResponse {
    let roster = state.relay.roster().await;
    (StatusCode::OK, Json(RosterResponse::from(roster.as_slice())))
}

/// Roster routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/roster", get(get_roster))
}
