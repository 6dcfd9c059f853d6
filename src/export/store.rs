use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Persistence collaborator
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// Write `content` at `relative_path` and return where it landed
    async fn write(&self, relative_path: &str, content: &str) -> Result<PathBuf>;
}

/// Share collaborator
#[async_trait::async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether sharing is possible at all on this host
    async fn is_available(&self) -> bool;

    /// Hand a written file to the share mechanism
    async fn share(&self, path: &Path) -> Result<()>;

    /// Get target name for logging
    fn name(&self) -> &str;
}

/// Stores files under the application's private document directory
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    documents_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
        }
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }
}

#[async_trait::async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, relative_path: &str, content: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.documents_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create documents directory: {}",
                    self.documents_dir.display()
                )
            })?;

        let path = self.documents_dir.join(relative_path);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Wrote {} bytes to {}", content.len(), path.display());

        Ok(path)
    }
}

/// Share target for hosts without any share mechanism
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait::async_trait]
impl ShareTarget for Unavailable {
    async fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, path: &Path) -> Result<()> {
        anyhow::bail!("Sharing not available for {}", path.display())
    }

    fn name(&self) -> &str {
        "none"
    }
}
