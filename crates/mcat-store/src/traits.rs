use async_trait::async_trait;
use bytes::Bytes;
use mcat_types::ModelRecord;

use crate::error::StoreResult;

/// A binary object read back from a [`BlobStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: String,
}

/// Opaque binary storage keyed by path.
///
/// Implementations must satisfy these invariants:
/// - `put` overwrites whatever was stored at the key (last writer wins).
/// - A reader never observes a partially written object.
/// - Missing parent containers are created on first write.
/// - The store never interprets object contents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StoreResult<()>;

    /// Read the object at `key`.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) when
    /// nothing is stored there.
    async fn get(&self, key: &str) -> StoreResult<StoredBlob>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Make sure the backing container exists, creating it if the backend
    /// allows. Safe to call repeatedly.
    async fn ensure_container(&self) -> StoreResult<()>;
}

/// Durable storage for the single catalog document.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read every record in stored order. A missing document is an empty
    /// catalog.
    async fn read_catalog(&self) -> StoreResult<Vec<ModelRecord>>;

    /// Replace the whole document. Concurrent readers see either the old or
    /// the new document, never a mix.
    async fn write_catalog(&self, models: &[ModelRecord]) -> StoreResult<()>;
}
