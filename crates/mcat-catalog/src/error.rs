use thiserror::Error;

use mcat_store::StoreError;
use mcat_types::TypeError;

/// Failures surfaced by the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request was rejected before any storage I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No model or asset exists under the filename.
    #[error("not found: {0}")]
    NotFound(String),

    /// The catalog document exists but cannot be parsed.
    #[error("corrupt catalog: {0}")]
    CorruptCatalog(String),

    /// The blob or catalog backend failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The task running a mutation panicked or was cancelled by the runtime.
    #[error("mutation interrupted: {0}")]
    Interrupted(String),
}

impl From<TypeError> for CatalogError {
    fn from(e: TypeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::CorruptCatalog { .. } => Self::CorruptCatalog(e.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
