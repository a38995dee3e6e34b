use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An ordered `(x, y, z)` triple.
///
/// Serializes as a JSON array of exactly three numbers. Any other length is
/// rejected on deserialization, so a catalog entry can never hold a
/// malformed transform.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vec3(pub [f64; 3]);

impl Vec3 {
    /// `[0, 0, 0]`, the default position and rotation.
    pub const ZERO: Self = Self([0.0, 0.0, 0.0]);

    /// `[1, 1, 1]`, the default scale.
    pub const ONE: Self = Self([1.0, 1.0, 1.0]);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// Parse a JSON-encoded triple such as `"[1, 0, 0]"`.
    ///
    /// `field` names the input in the error message.
    pub fn parse_json(field: &'static str, input: &str) -> Result<Self, TypeError> {
        serde_json::from_str(input.trim()).map_err(|_| TypeError::InvalidTriple {
            field,
            input: input.to_string(),
        })
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec3({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self(v)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.0
    }
}
