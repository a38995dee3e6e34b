/// Errors from blob and catalog storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under the key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The catalog document exists but is not a list of model records.
    #[error("corrupt catalog document {key}: {reason}")]
    CorruptCatalog { key: String, reason: String },

    /// Encoding a value for storage failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The storage container (directory or bucket) is missing or unreachable.
    #[error("storage container unavailable: {0}")]
    ContainerUnavailable(String),

    /// Error reported by the object storage backend.
    #[error("storage backend error: {0}")]
    Backend(#[from] opendal::Error),

    /// Local filesystem error outside the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
