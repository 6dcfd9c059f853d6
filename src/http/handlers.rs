use super::state::AppState;
use crate::export::ExportOutcome;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: PathBuf,
    pub rows: usize,
    pub shared: bool,
    /// Set when the file has to be fetched manually
    pub notice: Option<String>,
}

impl From<ExportOutcome> for ExportResponse {
    fn from(outcome: ExportOutcome) -> Self {
        Self {
            path: outcome.path().clone(),
            rows: outcome.rows(),
            shared: !outcome.needs_manual_retrieval(),
            notice: outcome.notice().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(message: String) -> axum::response::Response {
    error!("{}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Start recording (no-op when already recording)
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.session.start().await {
        return internal_error(format!("Failed to start recording: {:#}", e));
    }

    (StatusCode::OK, Json(state.session.status().await)).into_response()
}

/// POST /session/stop
/// Stop recording (no-op when idle)
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.session.stop().await;
    info!(
        "Recording stopped with {} samples",
        status.sample_count
    );
    (StatusCode::OK, Json(status)).into_response()
}

/// POST /session/toggle
/// Start/Stop Recording button
pub async fn toggle_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.toggle().await {
        Ok(new_state) => {
            info!("Recording toggled to {:?}", new_state);
            (StatusCode::OK, Json(state.session.status().await)).into_response()
        }
        Err(e) => internal_error(format!("Failed to toggle recording: {:#}", e)),
    }
}

/// GET /session/status
/// Live readout of the session
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.status().await))
}

/// POST /session/export
/// Save button: write the recording and share it
pub async fn export_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.export(&state.exporter).await {
        Ok(outcome) => (StatusCode::OK, Json(ExportResponse::from(outcome))).into_response(),
        Err(e) => internal_error(format!("Failed to export recording: {:#}", e)),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
