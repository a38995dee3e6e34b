//! [`BlobStore`] over an `opendal` [`Operator`].
//!
//! One adapter serves every backend: a local directory, an S3-compatible
//! bucket, or process memory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use opendal::layers::TimeoutLayer;
use opendal::{services, ErrorKind, Operator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mcat_types::content_type_for_extension;

use crate::bucket;
use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, StoredBlob};

/// Staging directory for atomic writes, relative to a filesystem root.
const ATOMIC_WRITE_DIR: &str = ".staging";

/// Prefix for content-type sidecars on backends without object metadata.
/// Asset filenames cannot start with `.`, so sidecars are never served.
pub const CONTENT_TYPE_DIR: &str = ".content-type";

/// Default bound on a single storage call.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for an S3-compatible bucket.
///
/// Credentials are not part of the settings: they are picked up from the
/// standard `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Settings {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl S3Settings {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: default_region(),
            endpoint: None,
        }
    }
}

#[derive(Clone, Debug)]
enum Container {
    Directory(PathBuf),
    Bucket(S3Settings),
    Memory,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(p) => write!(f, "directory {}", p.display()),
            Self::Bucket(s) => write!(f, "bucket {}", s.bucket),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Blob store backed by an `opendal` operator.
#[derive(Clone)]
pub struct OperatorBlobStore {
    op: Operator,
    container: Container,
}

impl OperatorBlobStore {
    /// Store blobs under a local directory.
    pub fn fs(root: impl AsRef<Path>) -> StoreResult<Self> {
        Self::fs_with_timeout(root, DEFAULT_IO_TIMEOUT)
    }

    pub fn fs_with_timeout(root: impl AsRef<Path>, timeout: Duration) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        let staging = root.join(ATOMIC_WRITE_DIR);
        let builder = services::Fs::default()
            .root(&root.to_string_lossy())
            .atomic_write_dir(&staging.to_string_lossy());
        let op = Operator::new(builder)?
            .layer(TimeoutLayer::new().with_timeout(timeout))
            .finish();
        Ok(Self {
            op,
            container: Container::Directory(root),
        })
    }

    /// Store blobs in an S3-compatible bucket.
    pub fn s3(settings: &S3Settings) -> StoreResult<Self> {
        Self::s3_with_timeout(settings, DEFAULT_IO_TIMEOUT)
    }

    pub fn s3_with_timeout(settings: &S3Settings, timeout: Duration) -> StoreResult<Self> {
        let mut builder = services::S3::default()
            .bucket(&settings.bucket)
            .region(&settings.region);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint(endpoint);
        }
        let op = Operator::new(builder)?
            .layer(TimeoutLayer::new().with_timeout(timeout))
            .finish();
        Ok(Self {
            op,
            container: Container::Bucket(settings.clone()),
        })
    }

    /// Keep blobs in process memory. Contents are lost on drop.
    pub fn memory() -> StoreResult<Self> {
        let op = Operator::new(services::Memory::default())?.finish();
        Ok(Self {
            op,
            container: Container::Memory,
        })
    }

    /// Human-readable description of the backing container.
    pub fn describe(&self) -> String {
        self.container.to_string()
    }

    fn stores_content_type(&self) -> bool {
        self.op.info().full_capability().write_with_content_type
    }

    /// Content type from the sidecar written alongside `key`, if any.
    async fn read_sidecar(&self, key: &str) -> StoreResult<Option<String>> {
        match self.op.read(&sidecar_key(key)).await {
            Ok(buf) => {
                let ct = String::from_utf8_lossy(&buf.to_bytes()).trim().to_string();
                Ok((!ct.is_empty()).then_some(ct))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn sidecar_key(key: &str) -> String {
    format!("{CONTENT_TYPE_DIR}/{key}")
}

fn map_read_error(key: &str, err: opendal::Error) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(key.to_string())
    } else {
        StoreError::Backend(err)
    }
}

#[async_trait]
impl BlobStore for OperatorBlobStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StoreResult<()> {
        let len = data.len();
        // Backends without content-type metadata reject the option outright.
        if self.stores_content_type() {
            self.op.write_with(key, data).content_type(content_type).await?;
        } else {
            self.op.write(key, data).await?;
            self.op
                .write(&sidecar_key(key), content_type.as_bytes().to_vec())
                .await?;
        }
        debug!(key, len, content_type, "blob written");
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<StoredBlob> {
        let meta = self.op.stat(key).await.map_err(|e| map_read_error(key, e))?;
        let data = self
            .op
            .read(key)
            .await
            .map_err(|e| map_read_error(key, e))?
            .to_bytes();
        let stored = match meta.content_type() {
            Some(ct) if !ct.is_empty() => Some(ct.to_string()),
            _ if self.stores_content_type() => None,
            _ => self.read_sidecar(key).await?,
        };
        let content_type = stored
            .unwrap_or_else(|| content_type_for_extension(key_extension(key)).to_string());
        debug!(key, len = data.len(), "blob read");
        Ok(StoredBlob { data, content_type })
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.op.exists(key).await?)
    }

    async fn ensure_container(&self) -> StoreResult<()> {
        match &self.container {
            Container::Directory(root) => {
                if tokio::fs::try_exists(root).await? {
                    info!(root = %root.display(), "storage directory already exists");
                } else {
                    tokio::fs::create_dir_all(root).await?;
                    info!(root = %root.display(), "created storage directory");
                }
                Ok(())
            }
            Container::Bucket(settings) => {
                let client = bucket::client_for(settings).await;
                bucket::ensure_bucket(&client, settings).await?;
                self.op.check().await.map_err(|e| {
                    StoreError::ContainerUnavailable(format!("bucket {}: {e}", settings.bucket))
                })?;
                info!(bucket = %settings.bucket, "bucket is reachable");
                Ok(())
            }
            Container::Memory => Ok(()),
        }
    }
}

fn key_extension(key: &str) -> &str {
    let base = key.rsplit('/').next().unwrap_or(key);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[idx..],
        _ => "",
    }
}

impl fmt::Debug for OperatorBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorBlobStore")
            .field("container", &self.container)
            .finish()
    }
}
