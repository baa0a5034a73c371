//! Durable storage for the URL list and ping interval

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{PingerError, Result};
use crate::models::StoredConfig;

/// Load/save boundary for the monitoring configuration.
///
/// `load` returns `Ok(None)` when nothing has been stored yet; callers fall
/// back to their defaults in that case and on `Err`.
#[async_trait]
pub trait ConfigGateway: Send + Sync {
    async fn load(&self) -> Result<Option<StoredConfig>>;

    async fn save(&self, urls: &[String], ping_interval_ms: u64) -> Result<()>;
}

/// Stores the configuration as a single JSON document on disk
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigGateway for FileGateway {
    async fn load(&self) -> Result<Option<StoredConfig>> {
        let path = &self.path;
        info!(?path, "load config");

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(?path, "no stored config");
                return Ok(None);
            }
            Err(err) => {
                return Err(PingerError::Persistence(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                )));
            }
        };

        let stored: StoredConfig = serde_json::from_str(&content)?;
        Ok(Some(stored))
    }

    async fn save(&self, urls: &[String], ping_interval_ms: u64) -> Result<()> {
        let path = &self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let stored = StoredConfig {
            urls: urls.to_vec(),
            ping_interval: ping_interval_ms,
        };
        let body = serde_json::to_vec_pretty(&stored)?;

        // Write then rename so a crash never leaves a truncated document
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, body).await?;
        fs::rename(&tmp_path, path).await?;

        debug!(?path, "saved config with {} URLs", urls.len());
        Ok(())
    }
}

/// In-process gateway, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryGateway {
    stored: Mutex<Option<StoredConfig>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(stored: StoredConfig) -> Self {
        Self {
            stored: Mutex::new(Some(stored)),
        }
    }

    pub async fn stored(&self) -> Option<StoredConfig> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl ConfigGateway for MemoryGateway {
    async fn load(&self) -> Result<Option<StoredConfig>> {
        Ok(self.stored.lock().await.clone())
    }

    async fn save(&self, urls: &[String], ping_interval_ms: u64) -> Result<()> {
        *self.stored.lock().await = Some(StoredConfig {
            urls: urls.to_vec(),
            ping_interval: ping_interval_ms,
        });
        Ok(())
    }
}
