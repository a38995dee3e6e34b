use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use mcat_types::{ModelRecord, CATALOG_KEY};

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, CatalogStore};

/// Catalog persisted as one JSON array inside a [`BlobStore`].
///
/// Atomicity of the document write is inherited from the blob store, which
/// never exposes a partially written object.
pub struct DocumentCatalogStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl DocumentCatalogStore {
    /// Catalog at the standard [`CATALOG_KEY`].
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_key(blobs, CATALOG_KEY)
    }

    pub fn with_key(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl CatalogStore for DocumentCatalogStore {
    async fn read_catalog(&self) -> StoreResult<Vec<ModelRecord>> {
        let blob = match self.blobs.get(&self.key).await {
            Ok(blob) => blob,
            Err(StoreError::NotFound(_)) => {
                debug!(key = %self.key, "catalog document absent; treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let models: Vec<ModelRecord> =
            serde_json::from_slice(&blob.data).map_err(|e| StoreError::CorruptCatalog {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        debug!(key = %self.key, count = models.len(), "catalog read");
        Ok(models)
    }

    async fn write_catalog(&self, models: &[ModelRecord]) -> StoreResult<()> {
        let data =
            serde_json::to_vec(models).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.blobs
            .put(&self.key, Bytes::from(data), "application/json")
            .await?;
        debug!(key = %self.key, count = models.len(), "catalog written");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentCatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCatalogStore")
            .field("key", &self.key)
            .finish()
    }
}
