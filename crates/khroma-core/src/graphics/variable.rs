// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Named, typed value bundles bound to shader inputs for one draw variant.

use crate::graphics::error::VariableError;
use crate::math::{Mat4, Vec2, Vec3, Vec4};

/// The kind of a draw variable, without its payload.
///
/// Shaders declare their inputs as kinds; variable-set entries must carry
/// the same kind to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// A single `f32`.
    Float,
    /// A single `i32`.
    Int,
    /// A single `u32`.
    UInt,
    /// A 2-component float vector.
    Vec2,
    /// A 3-component float vector.
    Vec3,
    /// A 4-component float vector.
    Vec4,
    /// A 4x4 float matrix.
    Mat4,
    /// A texture resource, referenced by name.
    Texture,
}

/// A tagged draw-variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    /// A single `f32`.
    Float(f32),
    /// A single `i32`.
    Int(i32),
    /// A single `u32`.
    UInt(u32),
    /// A 2-component float vector.
    Vec2(Vec2),
    /// A 3-component float vector.
    Vec3(Vec3),
    /// A 4-component float vector.
    Vec4(Vec4),
    /// A 4x4 float matrix.
    Mat4(Mat4),
    /// A texture resource, referenced by name.
    Texture(String),
}

impl VariableValue {
    /// Creates a texture reference to the image resource with `name`.
    pub fn texture(name: impl Into<String>) -> Self {
        VariableValue::Texture(name.into())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValue::Float(_) => VariableKind::Float,
            VariableValue::Int(_) => VariableKind::Int,
            VariableValue::UInt(_) => VariableKind::UInt,
            VariableValue::Vec2(_) => VariableKind::Vec2,
            VariableValue::Vec3(_) => VariableKind::Vec3,
            VariableValue::Vec4(_) => VariableKind::Vec4,
            VariableValue::Mat4(_) => VariableKind::Mat4,
            VariableValue::Texture(_) => VariableKind::Texture,
        }
    }
}

impl From<f32> for VariableValue {
    fn from(v: f32) -> Self {
        VariableValue::Float(v)
    }
}

impl From<i32> for VariableValue {
    fn from(v: i32) -> Self {
        VariableValue::Int(v)
    }
}

impl From<u32> for VariableValue {
    fn from(v: u32) -> Self {
        VariableValue::UInt(v)
    }
}

impl From<Vec2> for VariableValue {
    fn from(v: Vec2) -> Self {
        VariableValue::Vec2(v)
    }
}

impl From<Vec3> for VariableValue {
    fn from(v: Vec3) -> Self {
        VariableValue::Vec3(v)
    }
}

impl From<Vec4> for VariableValue {
    fn from(v: Vec4) -> Self {
        VariableValue::Vec4(v)
    }
}

impl From<Mat4> for VariableValue {
    fn from(v: Mat4) -> Self {
        VariableValue::Mat4(v)
    }
}

/// An ordered name → value mapping describing one draw variant.
///
/// Names are unique within a set; the first write of a name fixes its kind
/// and later writes must carry the same kind. Whether a name actually binds
/// to anything is decided at draw resolution against the shader's declared
/// inputs, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
    entries: Vec<(String, VariableValue)>,
}

impl VariableSet {
    /// Creates an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `name`, inserting the entry if absent.
    ///
    /// ## Errors
    /// * [`VariableError::KindMismatch`] - if `name` already holds a value
    ///   of a different kind.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<VariableValue>,
    ) -> Result<&mut Self, VariableError> {
        let name = name.into();
        let value = value.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            if existing.kind() != value.kind() {
                return Err(VariableError::KindMismatch {
                    name,
                    expected: existing.kind(),
                    found: value.kind(),
                });
            }
            *existing = value;
        } else {
            self.entries.push((name, value));
        }
        Ok(self)
    }

    /// Returns the value stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
