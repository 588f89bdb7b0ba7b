//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::dto::{ParticipantDto, RosterResponse};
use super::handlers::{roster, system};

/// OpenAPI description of the read-only REST endpoints.
///
/// The WebSocket protocol at `/ws` is not described here; see
/// [`crate::ws::messages`].
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "canvas-relay",
        description = "Session and broadcast relay for a shared real-time drawing canvas"
    ),
    paths(system::health_handler, roster::get_roster),
    components(schemas(system::HealthResponse, RosterResponse, ParticipantDto)),
    tags(
        (name = "System", description = "Service health"),
        (name = "Roster", description = "Connected participants")
    )
)]
pub struct ApiDoc;
