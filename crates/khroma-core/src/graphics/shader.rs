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

//! Backend-neutral shader descriptors: one source pair per backend family,
//! plus the binding tables draw resolution works against.

use crate::graphics::backend::BackendType;
use crate::graphics::geometry::VertexAttribute;
use crate::graphics::variable::VariableKind;

/// A vertex-stage and pixel-stage source pair for one backend family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    /// Vertex-stage source text.
    pub vertex: String,
    /// Pixel-stage source text.
    pub pixel: String,
}

impl ShaderSet {
    /// Creates a shader set from its stage sources.
    pub fn new(vertex: impl Into<String>, pixel: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            pixel: pixel.into(),
        }
    }
}

/// A well-known binding point a shader global can be attached to.
///
/// Values for these are supplied implicitly from the frame's
/// [`ViewInfo`](crate::graphics::backend::ViewInfo) unless the active
/// variable set overrides the mapped global by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingPoint {
    /// The camera's world-to-view matrix.
    ViewMatrix,
    /// The camera's view-to-clip matrix.
    ProjectionMatrix,
    /// The object's model-to-world matrix.
    WorldMatrix,
    /// The camera's world-space position.
    CameraPosition,
}

impl BindingPoint {
    /// Returns the variable kind an implicit value for this point carries.
    pub fn kind(&self) -> VariableKind {
        match self {
            BindingPoint::ViewMatrix
            | BindingPoint::ProjectionMatrix
            | BindingPoint::WorldMatrix => VariableKind::Mat4,
            BindingPoint::CameraPosition => VariableKind::Vec3,
        }
    }
}

/// One declared shader global: its name and the kind it accepts.
///
/// Backends with real compilers would reflect this table out of the
/// compiled module; here the descriptor carries it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInput {
    /// The shader-global name.
    pub name: String,
    /// The kind the shader declares for this name.
    pub kind: VariableKind,
}

/// A named, backend-neutral shader description.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDescriptor {
    /// The resource name render objects link against.
    pub name: String,
    sets: Vec<(BackendType, ShaderSet)>,
    vertex_inputs: Vec<(VertexAttribute, String)>,
    bindings: Vec<(BindingPoint, String)>,
    inputs: Vec<ShaderInput>,
}

impl ShaderDescriptor {
    /// Creates an empty shader descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
            vertex_inputs: Vec::new(),
            bindings: Vec::new(),
            inputs: Vec::new(),
        }
    }

    /// Inserts (or replaces) the source pair for one backend family,
    /// returning the descriptor for chaining.
    pub fn insert(mut self, backend: BackendType, set: ShaderSet) -> Self {
        if let Some(slot) = self.sets.iter_mut().find(|(b, _)| *b == backend) {
            slot.1 = set;
        } else {
            self.sets.push((backend, set));
        }
        self
    }

    /// Maps a geometry attribute to the shader's named vertex input.
    pub fn add_vertex_input_binding(
        mut self,
        attribute: VertexAttribute,
        input: impl Into<String>,
    ) -> Self {
        self.vertex_inputs.push((attribute, input.into()));
        self
    }

    /// Attaches a well-known binding point to a shader-global name.
    pub fn add_input_binding(mut self, point: BindingPoint, global: impl Into<String>) -> Self {
        self.bindings.push((point, global.into()));
        self
    }

    /// Declares a shader-global input name and the kind it accepts.
    pub fn declare_input(mut self, name: impl Into<String>, kind: VariableKind) -> Self {
        self.inputs.push(ShaderInput {
            name: name.into(),
            kind,
        });
        self
    }

    /// Returns the source pair for `backend`, if one was inserted.
    pub fn set_for(&self, backend: BackendType) -> Option<&ShaderSet> {
        self.sets
            .iter()
            .find(|(b, _)| *b == backend)
            .map(|(_, s)| s)
    }

    /// Returns the geometry-attribute → input-name bindings.
    pub fn vertex_inputs(&self) -> &[(VertexAttribute, String)] {
        &self.vertex_inputs
    }

    /// Returns the binding-point → global-name attachments.
    pub fn bindings(&self) -> &[(BindingPoint, String)] {
        &self.bindings
    }

    /// Returns the declared shader-global inputs.
    pub fn inputs(&self) -> &[ShaderInput] {
        &self.inputs
    }

    /// Returns the declared kind of the global named `name`, if any.
    pub fn declared_kind(&self, name: &str) -> Option<VariableKind> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .map(|input| input.kind)
    }
}
