//! Recording session management
//!
//! This module provides the `RecordingSession` abstraction that manages:
//! - The Idle/Recording lifecycle
//! - Accelerometer and barometer subscriptions
//! - The serialized event loop that fills the sample table
//! - The live status readout

mod config;
mod session;
mod status;

pub use config::SessionConfig;
pub use session::RecordingSession;
pub use status::{SessionState, SessionStatus};
