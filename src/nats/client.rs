use anyhow::{Context, Result};
use async_nats::connection::State;
use async_nats::Client;
use base64::Engine;
use std::path::Path;
use tracing::info;

use crate::export::ShareTarget;

use super::messages::ExportMessage;

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    /// Subject exports of this session are published on
    pub fn export_subject(&self) -> String {
        export_subject(&self.session_id)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.client.connection_state(), State::Connected)
    }

    /// Publish an exported file to NATS
    pub async fn publish_export(&self, file_name: &str, content: &[u8]) -> Result<()> {
        let subject = self.export_subject();

        let message = ExportMessage {
            session_id: self.session_id.clone(),
            file_name: file_name.to_string(),
            content: base64::engine::general_purpose::STANDARD.encode(content),
            size_bytes: content.len(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish export")?;

        self.client
            .flush()
            .await
            .context("Failed to flush NATS connection")?;

        info!(
            "Published export to {} (file={}, bytes={})",
            subject,
            file_name,
            content.len()
        );

        Ok(())
    }
}

/// NATS subject for exports of a session
pub fn export_subject(session_id: &str) -> String {
    format!("sensor.export.{}", session_id)
}

/// Shares exported files by publishing them over NATS
pub struct NatsShare {
    client: NatsClient,
}

impl NatsShare {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ShareTarget for NatsShare {
    async fn is_available(&self) -> bool {
        self.client.is_connected()
    }

    async fn share(&self, path: &Path) -> Result<()> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.client.publish_export(&file_name, &content).await
    }

    fn name(&self) -> &str {
        "nats"
    }
}
