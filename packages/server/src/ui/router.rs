//! HTTP routing.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    state::AppState,
};

/// Build the application router.
///
/// Every path other than the HTTP endpoints is treated as a WebSocket
/// upgrade, so a bad room path is refused with a close frame rather than a 404.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .fallback(websocket_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
