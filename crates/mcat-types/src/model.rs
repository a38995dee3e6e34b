use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::filename::{derive_filename, DEFAULT_MODEL_NAME};
use crate::update::ModelField;
use crate::vec3::Vec3;

/// Content type recorded when neither the client nor the extension tells us
/// anything better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One registered 3D asset.
///
/// `filename` is the primary key: it names the blob in storage and is the
/// lookup key for updates. `rotation` and `price` were added in later
/// revisions of the catalog format and default when absent from a stored
/// document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    pub filename: String,
    pub position: Vec3,
    #[serde(default = "zero")]
    pub rotation: Vec3,
    pub scale: Vec3,
    pub details: String,
    #[serde(default)]
    pub price: f64,
}

fn zero() -> Vec3 {
    Vec3::ZERO
}

impl ModelRecord {
    /// Replace a single field.
    pub fn apply(&mut self, field: ModelField) {
        match field {
            ModelField::Position(v) => self.position = v,
            ModelField::Rotation(v) => self.rotation = v,
            ModelField::Scale(v) => self.scale = v,
            ModelField::Details(d) => self.details = d,
            ModelField::Price(p) => self.price = p,
        }
    }

    /// Replace every field in `fields`, in order.
    pub fn apply_all(&mut self, fields: impl IntoIterator<Item = ModelField>) {
        for field in fields {
            self.apply(field);
        }
    }
}

/// Input to model registration.
///
/// Optional transform and metadata fields fall back to the catalog defaults
/// in [`NewModel::to_record`].
#[derive(Clone, Debug)]
pub struct NewModel {
    pub name: String,
    /// Extension of the uploaded file, including the leading dot.
    pub extension: String,
    pub payload: Bytes,
    pub content_type: Option<String>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub details: Option<String>,
    pub price: Option<f64>,
}

impl NewModel {
    pub fn new(name: impl Into<String>, extension: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            payload: payload.into(),
            content_type: None,
            position: None,
            rotation: None,
            scale: None,
            details: None,
            price: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Reject input that must never reach storage.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.payload.is_empty() {
            return Err(TypeError::EmptyPayload);
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    /// Display name after blank-name substitution.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_MODEL_NAME
        } else {
            &self.name
        }
    }

    pub fn filename(&self) -> String {
        derive_filename(&self.name, &self.extension)
    }

    /// Content type to store the payload under.
    pub fn resolved_content_type(&self) -> String {
        match self.content_type.as_deref().map(str::trim) {
            Some(ct) if !ct.is_empty() => ct.to_string(),
            _ => content_type_for_extension(&self.extension).to_string(),
        }
    }

    /// Build the catalog entry with defaults substituted.
    pub fn to_record(&self) -> ModelRecord {
        ModelRecord {
            name: self.display_name().to_string(),
            filename: self.filename(),
            position: self.position.unwrap_or(Vec3::ZERO),
            rotation: self.rotation.unwrap_or(Vec3::ZERO),
            scale: self.scale.unwrap_or(Vec3::ONE),
            details: self.details.clone().unwrap_or_default(),
            price: self.price.unwrap_or(0.0),
        }
    }
}

/// Prices must be finite and non-negative.
pub fn validate_price(price: f64) -> Result<f64, TypeError> {
    if !price.is_finite() || price < 0.0 {
        return Err(TypeError::InvalidPrice(price.to_string()));
    }
    Ok(price)
}

/// Best-effort content type for common 3D asset extensions.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        "obj" => "model/obj",
        "stl" => "model/stl",
        "usdz" => "model/vnd.usdz+zip",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
