use serde::{Deserialize, Serialize};

/// Exported recording published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMessage {
    pub session_id: String,
    pub file_name: String,
    pub content: String,  // Base64-encoded file contents
    pub size_bytes: usize,
    pub timestamp: String,  // RFC3339 timestamp
}
