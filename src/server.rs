//! Router assembly and server startup.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::relay::BroadcastRelay;
use crate::ws::handler::ws_handler;

/// Builds the application router: REST endpoints, `/ws`, and (with the
/// `swagger-ui` feature) the interactive API docs.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the relay described by `config`, wrapped for the handlers.
#[must_use]
pub fn build_state(config: &RelayConfig) -> AppState {
    AppState::new(BroadcastRelay::new(
        config.outbound_queue_capacity,
        config.max_display_name_len,
    ))
}

/// Serves the application on an already-bound listener until the process
/// stops.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_app(state)).await
}
