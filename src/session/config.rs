use serde::{Deserialize, Serialize};

/// Configuration for a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "session-2025-10-28-stairs")
    pub session_id: String,

    /// Accelerometer update rate in Hz
    /// Default: 60
    pub motion_rate_hz: u32,

    /// Capacity of the event queue shared by both sensor streams
    pub event_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            motion_rate_hz: 60,         // 1000 / 60 ms between updates
            event_queue_capacity: 256,  // ~4s of motion at 60 Hz
        }
    }
}
