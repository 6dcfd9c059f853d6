use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recording lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Recording,
}

/// Live readout of a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Session identifier
    pub session_id: String,

    /// Whether recording is currently active
    pub state: SessionState,

    /// Whether the accelerometer subscription is live
    pub motion_active: bool,

    /// Whether the barometer subscription is live
    pub pressure_active: bool,

    /// Timestamp of the first row, if any
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the first row
    pub elapsed_secs: f64,

    /// Elapsed time as `m:ss`, empty before the first row
    pub elapsed: String,

    /// Number of rows recorded so far
    pub sample_count: usize,

    /// Magnitude of the latest acceleration (m/s²)
    pub acceleration: f64,

    /// Acceleration as displayed
    pub acceleration_display: String,

    /// Latest pressure (hPa)
    pub pressure: f64,

    /// Pressure as displayed
    pub pressure_display: String,

    /// Altitude from the latest pressure in a standard atmosphere (m), `0` without one
    pub altitude: f64,

    /// Pressure readings that arrived before any motion row
    pub dropped_pressure_events: usize,
}

impl SessionStatus {
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }
}
