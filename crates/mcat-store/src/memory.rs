use std::sync::RwLock;

use async_trait::async_trait;
use mcat_types::ModelRecord;

use crate::error::StoreResult;
use crate::traits::CatalogStore;

/// In-memory catalog store.
///
/// Intended for tests and embedding. The record list sits behind a `RwLock`
/// and is cloned on every read and write, so readers always see a whole
/// document.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    models: RwLock<Vec<ModelRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing catalog.
    pub fn with_models(models: Vec<ModelRecord>) -> Self {
        Self {
            models: RwLock::new(models),
        }
    }

    pub fn len(&self) -> usize {
        self.models.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn read_catalog(&self) -> StoreResult<Vec<ModelRecord>> {
        Ok(self.models.read().expect("lock poisoned").clone())
    }

    async fn write_catalog(&self, models: &[ModelRecord]) -> StoreResult<()> {
        *self.models.write().expect("lock poisoned") = models.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcat_types::NewModel;

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryCatalogStore::new();
        assert!(store.is_empty());
        assert!(store.read_catalog().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_replaces_document() {
        let first = NewModel::new("a", ".glb", b"a".to_vec()).to_record();
        let second = NewModel::new("b", ".glb", b"b".to_vec()).to_record();
        let store = InMemoryCatalogStore::with_models(vec![first]);

        store.write_catalog(&[second.clone()]).await.unwrap();
        assert_eq!(store.read_catalog().await.unwrap(), vec![second]);
        assert_eq!(store.len(), 1);
    }
}
