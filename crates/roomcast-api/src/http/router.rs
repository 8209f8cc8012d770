//! Axum router configuration with middleware.
//!
//! REST routes live under `/api/v1/`; the per-room WebSocket endpoint is
//! mounted at `/ws/rooms/{room_id}`. Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/rooms", post(handlers::room::create_room))
        .route("/rooms/{room_id}", get(handlers::room::get_room))
        .route(
            "/rooms/{room_id}/messages",
            get(handlers::room::get_messages),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws/rooms/{room_id}", get(handlers::ws::room_ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
