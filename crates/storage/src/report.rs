use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Persists run reports (send results and the like) outside the tables.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    async fn save_report(&self, name: &str, report: &serde_json::Value) -> Result<PathBuf>;
}

pub struct JsonFileStorage {
    pub folder: PathBuf,
}

impl JsonFileStorage {
    pub fn new(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref().to_path_buf();
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("creating report folder {}", folder.display()))?;
        Ok(Self { folder })
    }
}

/// Serializes any report into the JSON value the storage accepts.
pub fn to_report<T: Serialize>(report: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(report)?)
}

#[async_trait]
impl ReportStorage for JsonFileStorage {
    async fn save_report(&self, name: &str, report: &serde_json::Value) -> Result<PathBuf> {
        let path = self.folder.join(format!("{}.json", name));
        let data = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&path, data).await
            .with_context(|| format!("writing report {}", path.display()))?;
        tracing::info!(path = %path.display(), "report saved");
        Ok(path)
    }
}
