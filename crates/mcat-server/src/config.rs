use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mcat_store::{OperatorBlobStore, S3Settings, StoreResult};

use crate::error::{ServerError, ServerResult};

/// Where blobs and the catalog document are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// A local directory.
    Fs { root: PathBuf },
    /// An S3-compatible bucket.
    S3(S3Settings),
    /// Process memory; nothing survives a restart.
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Fs {
            root: PathBuf::from("./data"),
        }
    }
}

impl StorageConfig {
    pub fn open(&self, io_timeout: Duration) -> StoreResult<OperatorBlobStore> {
        match self {
            Self::Fs { root } => OperatorBlobStore::fs_with_timeout(root, io_timeout),
            Self::S3(settings) => OperatorBlobStore::s3_with_timeout(settings, io_timeout),
            Self::Memory => OperatorBlobStore::memory(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// `max-age` sent with served assets.
    pub cache_max_age_secs: u64,
    /// Bound on each storage call.
    pub io_timeout_secs: u64,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_upload_bytes: 256 * 1024 * 1024,
            cache_max_age_secs: 31_536_000,
            io_timeout_secs: 60,
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Default settings with in-memory storage.
    pub fn ephemeral() -> Self {
        Self {
            storage: StorageConfig::Memory,
            ..Self::default()
        }
    }

    /// Load from a TOML file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}
