//! Foundation types for the model catalog.
//!
//! Every other catalog crate depends on `mcat-types`. It defines the shape of
//! a catalog entry and the rules that turn user input into one.
//!
//! # Key Types
//!
//! - [`ModelRecord`] -- one registered 3D asset and its placement metadata
//! - [`Vec3`] -- exactly three `f64` components (position, rotation, scale)
//! - [`NewModel`] -- validated input for registering an asset
//! - [`ModelField`] -- the fixed set of fields an update may replace
//! - [`ModelPatch`] -- wire form of a partial update
//!
//! # Storage Layout
//!
//! Blobs live under [`ASSET_PREFIX`] keyed by their derived filename and the
//! catalog is a single JSON document at [`CATALOG_KEY`], both inside one
//! storage container.

pub mod error;
pub mod filename;
pub mod model;
pub mod update;
pub mod vec3;

pub use error::TypeError;
pub use filename::{derive_filename, file_extension, sanitize_name, DEFAULT_MODEL_NAME};
pub use model::{
    content_type_for_extension, validate_price, ModelRecord, NewModel, DEFAULT_CONTENT_TYPE,
};
pub use update::{ModelField, ModelPatch, PriceValue};
pub use vec3::Vec3;

/// Key prefix under which model binaries are stored.
pub const ASSET_PREFIX: &str = "models/";

/// Key of the catalog document.
pub const CATALOG_KEY: &str = "models.json";

/// Storage key of the blob for `filename`.
pub fn asset_key(filename: &str) -> String {
    format!("{ASSET_PREFIX}{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_key_uses_prefix() {
        assert_eq!(asset_key("chair.glb"), "models/chair.glb");
    }

    #[test]
    fn catalog_key_is_outside_asset_prefix() {
        assert!(!CATALOG_KEY.starts_with(ASSET_PREFIX));
    }
}
