//! HTTP API server for remote control
//!
//! This module provides a REST API for driving the recording session:
//! - POST /session/start - Start recording
//! - POST /session/stop - Stop recording
//! - POST /session/toggle - Start or stop, whichever applies
//! - GET /session/status - Live readout
//! - POST /session/export - Save and share the recording
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, ExportResponse};
pub use routes::create_router;
pub use state::AppState;
