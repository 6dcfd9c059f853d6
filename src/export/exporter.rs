use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use super::format::{render, EXPORT_FILE_NAME};
use super::store::{FileStore, ShareTarget};
use crate::recording::SampleBuffer;

/// Notice shown when the file was saved but could not be shared
pub const MANUAL_RETRIEVAL_NOTICE: &str = "Sharing not available: Please save the file manually.";

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Written and handed to the share target
    Shared { path: PathBuf, rows: usize },
    /// Written, but no share target is available
    SavedOnly { path: PathBuf, rows: usize },
}

impl ExportOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            ExportOutcome::Shared { path, .. } | ExportOutcome::SavedOnly { path, .. } => path,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            ExportOutcome::Shared { rows, .. } | ExportOutcome::SavedOnly { rows, .. } => *rows,
        }
    }

    /// Whether the user has to fetch the file themselves
    pub fn needs_manual_retrieval(&self) -> bool {
        matches!(self, ExportOutcome::SavedOnly { .. })
    }

    /// User-visible notice, if any
    pub fn notice(&self) -> Option<&'static str> {
        self.needs_manual_retrieval()
            .then_some(MANUAL_RETRIEVAL_NOTICE)
    }
}

/// Writes a recording to the document store and shares it
pub struct Exporter {
    store: Box<dyn FileStore>,
    share: Box<dyn ShareTarget>,
    file_name: String,
}

impl Exporter {
    pub fn new(store: Box<dyn FileStore>, share: Box<dyn ShareTarget>) -> Self {
        Self {
            store,
            share,
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }

    /// Use a different relative path for the written file
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Export `buffer`
    ///
    /// A failed write is an error. A missing share target is not: the file
    /// stays written and the outcome carries a notice instead.
    pub async fn export(&self, buffer: &SampleBuffer) -> Result<ExportOutcome> {
        let content = render(buffer);
        let rows = buffer.len();

        let path = self
            .store
            .write(&self.file_name, &content)
            .await
            .context("Failed to save sensor data")?;

        if !self.share.is_available().await {
            warn!(
                "Sharing not available ({}), {} left for manual retrieval",
                self.share.name(),
                path.display()
            );
            return Ok(ExportOutcome::SavedOnly { path, rows });
        }

        self.share
            .share(&path)
            .await
            .with_context(|| format!("Failed to share {}", path.display()))?;

        info!(
            "Exported {} rows to {} via {}",
            rows,
            path.display(),
            self.share.name()
        );

        Ok(ExportOutcome::Shared { path, rows })
    }
}
