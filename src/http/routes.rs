use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/session/start", post(handlers::start_recording))
        .route("/session/stop", post(handlers::stop_recording))
        .route("/session/toggle", post(handlers::toggle_recording))
        // Readout and export
        .route("/session/status", get(handlers::get_status))
        .route("/session/export", post(handlers::export_recording))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
