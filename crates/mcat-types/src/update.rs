//! Partial updates to a catalog entry.
//!
//! A wire-level [`ModelPatch`] is reduced to a list of [`ModelField`]s. Only
//! truthy values survive the reduction: an empty `details` string or a
//! `price` of zero means "keep the stored value", so neither can be reset
//! through an update.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::model::validate_price;
use crate::vec3::Vec3;

/// A single replaceable field of a [`ModelRecord`](crate::ModelRecord).
#[derive(Clone, Debug, PartialEq)]
pub enum ModelField {
    Position(Vec3),
    Rotation(Vec3),
    Scale(Vec3),
    Details(String),
    Price(f64),
}

impl ModelField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position(_) => "position",
            Self::Rotation(_) => "rotation",
            Self::Scale(_) => "scale",
            Self::Details(_) => "details",
            Self::Price(_) => "price",
        }
    }
}

impl fmt::Display for ModelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(v) | Self::Rotation(v) | Self::Scale(v) => {
                write!(f, "{}={v}", self.name())
            }
            Self::Details(d) => write!(f, "details={d:?}"),
            Self::Price(p) => write!(f, "price={p}"),
        }
    }
}

/// A price as sent by clients: editors post form values, so both JSON
/// numbers and numeric strings are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Numeric value, or `None` for an empty string.
    pub fn to_f64(&self) -> Result<Option<f64>, TypeError> {
        match self {
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| TypeError::InvalidPrice(s.clone())),
        }
    }
}

/// Body of a partial update request. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceValue>,
}

impl ModelPatch {
    /// Reduce to the fields that actually replace stored values.
    ///
    /// Absent and falsy values (`""`, `0`) are dropped. A negative or
    /// unparseable price is an error.
    pub fn into_fields(self) -> Result<Vec<ModelField>, TypeError> {
        let mut fields = Vec::new();
        if let Some(v) = self.position {
            fields.push(ModelField::Position(v));
        }
        if let Some(v) = self.rotation {
            fields.push(ModelField::Rotation(v));
        }
        if let Some(v) = self.scale {
            fields.push(ModelField::Scale(v));
        }
        if let Some(d) = self.details.filter(|d| !d.is_empty()) {
            fields.push(ModelField::Details(d));
        }
        if let Some(price) = self.price {
            if let Some(p) = price.to_f64()? {
                let p = validate_price(p)?;
                if p != 0.0 {
                    fields.push(ModelField::Price(p));
                }
            }
        }
        Ok(fields)
    }
}
