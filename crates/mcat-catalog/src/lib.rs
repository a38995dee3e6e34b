//! Catalog service for the model catalog.
//!
//! [`CatalogService`] is the only component that touches both stores. It
//! registers uploaded binaries, keeps the catalog document consistent under
//! concurrent writers, and serves records and assets back.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mcat_catalog::CatalogService;
//! use mcat_store::OperatorBlobStore;
//! use mcat_types::{NewModel, Vec3};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let blobs = Arc::new(OperatorBlobStore::fs("./data")?);
//! let service = CatalogService::with_blob_store(blobs);
//! service.init().await?;
//!
//! let chair = NewModel::new("chair", ".glb", std::fs::read("chair.glb")?)
//!     .with_position(Vec3::new(1.0, 0.0, 0.0));
//! let record = service.register_model(chair).await?;
//! assert_eq!(record.filename, "chair.glb");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use service::{Asset, CatalogService};
