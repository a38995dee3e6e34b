use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use mcat_store::{BlobStore, CatalogStore, DocumentCatalogStore};
use mcat_types::{asset_key, ModelField, ModelPatch, ModelRecord, NewModel};

use crate::error::{CatalogError, CatalogResult};

/// A model binary as served to viewers.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    pub data: Bytes,
    pub content_type: String,
}

/// Orchestrates asset ingestion, catalog mutation, and retrieval.
///
/// Every catalog mutation is a full read-modify-write of one shared
/// document, so all of them run under a single process-wide lock. Reads
/// (`list_models`, `find_model`, `fetch_asset`) never take it: the catalog
/// store guarantees a reader sees a whole document, old or new.
///
/// Mutations run on their own task. Dropping the future returned by
/// [`register_model`](Self::register_model) or
/// [`update_model`](Self::update_model) stops the wait, not the mutation.
///
/// Registration writes the blob first and appends the record second. The
/// two steps are not atomic; a failure in between leaves an orphaned blob,
/// which is logged and reported to the caller rather than hidden.
pub struct CatalogService {
    shared: Arc<Shared>,
}

struct Shared {
    blobs: Arc<dyn BlobStore>,
    catalog: Arc<dyn CatalogStore>,
    write_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(blobs: Arc<dyn BlobStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            shared: Arc::new(Shared {
                blobs,
                catalog,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Keep the catalog document in the same container as the blobs.
    pub fn with_blob_store(blobs: Arc<dyn BlobStore>) -> Self {
        let catalog = Arc::new(DocumentCatalogStore::new(blobs.clone()));
        Self::new(blobs, catalog)
    }

    /// Prepare the storage container. Call once at startup.
    pub async fn init(&self) -> CatalogResult<()> {
        self.shared.blobs.ensure_container().await?;
        Ok(())
    }

    /// Store a new model binary and append its record to the catalog.
    ///
    /// A filename that is already registered is not rejected: the blob is
    /// overwritten and a second record is appended.
    pub async fn register_model(&self, model: NewModel) -> CatalogResult<ModelRecord> {
        model.validate()?;
        let shared = self.shared.clone();
        run_detached("register", async move { shared.register(model).await }).await
    }

    /// Every record in stored order. Empty when nothing has been registered.
    pub async fn list_models(&self) -> CatalogResult<Vec<ModelRecord>> {
        Ok(self.shared.catalog.read_catalog().await?)
    }

    /// The first record registered under `filename`.
    pub async fn find_model(&self, filename: &str) -> CatalogResult<ModelRecord> {
        self.shared
            .catalog
            .read_catalog()
            .await?
            .into_iter()
            .find(|m| m.filename == filename)
            .ok_or_else(|| CatalogError::NotFound(filename.to_string()))
    }

    /// Replace the given fields of the record registered under `filename`.
    ///
    /// Fields not listed keep their stored values. When several records
    /// share the filename, the first one is updated.
    pub async fn update_model(
        &self,
        filename: &str,
        fields: Vec<ModelField>,
    ) -> CatalogResult<ModelRecord> {
        let shared = self.shared.clone();
        let filename = filename.to_string();
        run_detached("update", async move { shared.update(&filename, fields).await }).await
    }

    /// [`update_model`](Self::update_model) from a wire-level patch.
    ///
    /// Falsy patch values (`""`, `0`) are ignored and keep the stored value.
    pub async fn apply_patch(&self, filename: &str, patch: ModelPatch) -> CatalogResult<ModelRecord> {
        let fields = patch.into_fields()?;
        self.update_model(filename, fields).await
    }

    /// Read the binary stored for `filename`.
    pub async fn fetch_asset(&self, filename: &str) -> CatalogResult<Asset> {
        if !is_plain_filename(filename) {
            return Err(CatalogError::NotFound(filename.to_string()));
        }
        let blob = self
            .shared
            .blobs
            .get(&asset_key(filename))
            .await
            .map_err(|e| match CatalogError::from(e) {
                CatalogError::NotFound(_) => CatalogError::NotFound(filename.to_string()),
                other => other,
            })?;
        Ok(Asset {
            data: blob.data,
            content_type: blob.content_type,
        })
    }
}

impl Shared {
    async fn register(&self, model: NewModel) -> CatalogResult<ModelRecord> {
        let record = model.to_record();
        let key = asset_key(&record.filename);
        let content_type = model.resolved_content_type();

        self.blobs
            .put(&key, model.payload.clone(), &content_type)
            .await?;

        let _guard = self.write_lock.lock().await;
        let result = self.append_record(&record).await;
        if let Err(e) = &result {
            error!(key = %key, error = %e, "blob stored but catalog append failed; blob is orphaned");
        }
        result?;

        info!(
            filename = %record.filename,
            size = model.payload.len(),
            content_type = %content_type,
            "model registered"
        );
        Ok(record)
    }

    async fn append_record(&self, record: &ModelRecord) -> CatalogResult<()> {
        let mut models = self.catalog.read_catalog().await?;
        if models.iter().any(|m| m.filename == record.filename) {
            warn!(filename = %record.filename, "filename already registered; appending duplicate entry");
        }
        models.push(record.clone());
        self.catalog.write_catalog(&models).await?;
        Ok(())
    }

    async fn update(&self, filename: &str, fields: Vec<ModelField>) -> CatalogResult<ModelRecord> {
        let _guard = self.write_lock.lock().await;
        let mut models = self.catalog.read_catalog().await?;
        let index = models
            .iter()
            .position(|m| m.filename == filename)
            .ok_or_else(|| CatalogError::NotFound(filename.to_string()))?;

        if fields.is_empty() {
            debug!(filename, "update carries no changes");
            return Ok(models.swap_remove(index));
        }

        let changed: Vec<&'static str> = fields.iter().map(ModelField::name).collect();
        models[index].apply_all(fields);
        self.catalog.write_catalog(&models).await?;

        info!(filename, fields = ?changed, "model updated");
        Ok(models.swap_remove(index))
    }
}

/// Drive a mutation on its own task and wait for it.
async fn run_detached<T, F>(op: &'static str, mutation: F) -> CatalogResult<T>
where
    T: Send + 'static,
    F: Future<Output = CatalogResult<T>> + Send + 'static,
{
    tokio::spawn(mutation).await.map_err(|e| {
        error!(op, error = %e, "catalog mutation task failed");
        CatalogError::Interrupted(format!("{op}: {e}"))
    })?
}

/// A filename that cannot address anything outside the asset prefix.
fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}
