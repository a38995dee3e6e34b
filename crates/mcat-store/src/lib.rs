//! Storage backends for the model catalog.
//!
//! Two independent stores live here:
//!
//! - [`BlobStore`] -- opaque binaries keyed by path. [`OperatorBlobStore`]
//!   adapts an `opendal` operator so the same code runs against a local
//!   directory, an S3-compatible bucket, or memory.
//! - [`CatalogStore`] -- the one JSON document listing every model.
//!   [`DocumentCatalogStore`] keeps it inside a blob store;
//!   [`InMemoryCatalogStore`] is for tests and embedding.
//!
//! # Design Rules
//!
//! 1. Stores never interpret blob contents.
//! 2. A missing catalog document is an empty catalog; an unparseable one is
//!    an error and is never reset.
//! 3. Writes are whole-object replacements; readers never see torn data.
//! 4. All backend errors are propagated, never retried here.

pub mod bucket;
pub mod document;
pub mod error;
pub mod memory;
pub mod operator;
pub mod traits;

pub use document::DocumentCatalogStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCatalogStore;
pub use operator::{OperatorBlobStore, S3Settings, CONTENT_TYPE_DIR, DEFAULT_IO_TIMEOUT};
pub use traits::{BlobStore, CatalogStore, StoredBlob};
