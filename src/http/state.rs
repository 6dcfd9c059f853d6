use crate::export::Exporter;
use crate::session::RecordingSession;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one recording session this service drives
    pub session: Arc<RecordingSession>,

    /// Writes and shares exports
    pub exporter: Arc<Exporter>,
}

impl AppState {
    pub fn new(session: RecordingSession, exporter: Exporter) -> Self {
        Self {
            session: Arc::new(session),
            exporter: Arc::new(exporter),
        }
    }
}
