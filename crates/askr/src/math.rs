//! Math types for the scene graph.
//!
//! [`Vec3`] is the only spatial value type. It covers positions, per-axis
//! rotations, and scales. Rotation is a plain per-axis angle triple that
//! composes by addition; there is no quaternion or matrix layer here, and
//! rotation never feeds into position or scale composition.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SceneError;

/// A three-axis `f32` triple.
///
/// Serializes as an object with explicit keys (`{"x": .., "y": .., "z": ..}`)
/// so documents stay readable and diffable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Uniform value on every axis.
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Read a `Vec3` out of a JSON value, requiring all three keys.
    ///
    /// A missing key, or a key holding anything other than a number, is a
    /// [`SceneError::MissingField`] naming that key.
    pub fn from_value(value: &Value) -> Result<Self, SceneError> {
        Ok(Self {
            x: axis(value, "x")?,
            y: axis(value, "y")?,
            z: axis(value, "z")?,
        })
    }
}

fn axis(value: &Value, key: &'static str) -> Result<f32, SceneError> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .ok_or(SceneError::MissingField(key))
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Component-wise product. This is how scales compose down the tree.
impl Mul for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}
