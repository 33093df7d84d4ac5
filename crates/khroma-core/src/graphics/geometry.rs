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

//! Backend-neutral geometry descriptors: vertex layout, vertex and index
//! storage, and the configure-time validation applied to them.

use crate::graphics::error::GeometryError;
use std::mem;

/// The semantic meaning of one vertex layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    /// Object-space position.
    Position,
    /// Surface normal.
    Normal,
    /// Surface tangent.
    Tangent,
    /// Vertex color.
    Color,
    /// First texture coordinate set.
    TexCoord0,
    /// Second texture coordinate set.
    TexCoord1,
}

/// The scalar component type of a vertex layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 32-bit IEEE float.
    Float32,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    Uint32,
}

impl ScalarType {
    /// Returns the size in bytes of one scalar of this type.
    pub const fn size(&self) -> usize {
        match self {
            ScalarType::Float32 | ScalarType::Int32 | ScalarType::Uint32 => 4,
        }
    }
}

/// The primitive assembly mode of a geometry resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Each index is an independent point.
    PointList,
    /// Every two indices form an independent line.
    LineList,
    /// Every three indices form an independent triangle.
    TriangleList,
}

impl PrimitiveTopology {
    /// Returns the number of indices consumed per primitive.
    pub const fn indices_per_primitive(&self) -> usize {
        match self {
            PrimitiveTopology::PointList => 1,
            PrimitiveTopology::LineList => 2,
            PrimitiveTopology::TriangleList => 3,
        }
    }
}

/// One element of a vertex layout: a semantic attribute, its scalar type,
/// and its component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexLayoutElement {
    /// The semantic attribute this element feeds.
    pub attribute: VertexAttribute,
    /// The scalar type of each component.
    pub scalar: ScalarType,
    /// The number of components (1 to 4).
    pub components: u32,
}

impl VertexLayoutElement {
    /// Returns the byte size of this element within a vertex.
    pub const fn size(&self) -> usize {
        self.scalar.size() * self.components as usize
    }
}

/// Interleaved vertex storage with an ordered layout.
///
/// The storage is raw bytes sized to `vertex_count * stride`; typed access
/// goes through [`VertexBuffer::write`], which casts the storage to a `Pod`
/// vertex struct matching the stride.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    layout: Vec<VertexLayoutElement>,
    count: usize,
    data: Vec<u8>,
}

impl VertexBuffer {
    /// Creates an empty vertex buffer with no layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layout element, consuming and returning the buffer so
    /// layout construction can be chained.
    pub fn add_element(
        mut self,
        attribute: VertexAttribute,
        scalar: ScalarType,
        components: u32,
    ) -> Self {
        self.layout.push(VertexLayoutElement {
            attribute,
            scalar,
            components,
        });
        // Layout changes invalidate previously sized storage.
        self.data = vec![0; self.count * self.stride()];
        self
    }

    /// Resizes the storage to hold `count` vertices, zero-filling new space.
    pub fn resize(mut self, count: usize) -> Self {
        self.count = count;
        self.data.resize(count * self.stride(), 0);
        self
    }

    /// Returns the byte distance between consecutive vertices.
    pub fn stride(&self) -> usize {
        self.layout.iter().map(|e| e.size()).sum()
    }

    /// Returns the number of vertices the buffer holds.
    pub fn vertex_count(&self) -> usize {
        self.count
    }

    /// Returns the ordered layout elements.
    pub fn layout(&self) -> &[VertexLayoutElement] {
        &self.layout
    }

    /// Returns the raw byte storage.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Gives `f` a typed, mutable window over the whole storage.
    ///
    /// The window is staged in an aligned buffer of `V`, so the byte
    /// storage itself never needs `V`'s alignment.
    ///
    /// ## Errors
    /// * [`GeometryError::StrideMismatch`] - if `size_of::<V>()` differs
    ///   from the layout stride.
    pub fn write<V: bytemuck::Pod>(
        &mut self,
        f: impl FnOnce(&mut [V]),
    ) -> Result<&mut Self, GeometryError> {
        if mem::size_of::<V>() != self.stride() {
            return Err(GeometryError::StrideMismatch {
                expected: self.stride(),
                actual: mem::size_of::<V>(),
            });
        }

        let mut staging = vec![<V as bytemuck::Zeroable>::zeroed(); self.count];
        bytemuck::cast_slice_mut::<V, u8>(&mut staging).copy_from_slice(&self.data);
        f(&mut staging);
        self.data.copy_from_slice(bytemuck::cast_slice(&staging));
        Ok(self)
    }
}

/// Index storage. Elements are 32-bit unsigned, matching what the demos
/// submit everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBuffer {
    data: Vec<u32>,
}

impl IndexBuffer {
    /// Creates an empty index buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the storage to `count` zeroed indices.
    pub fn resize(mut self, count: usize) -> Self {
        self.data.resize(count, 0);
        self
    }

    /// Gives `f` a mutable window over the indices.
    pub fn write(&mut self, f: impl FnOnce(&mut [u32])) -> &mut Self {
        f(&mut self.data);
        self
    }

    /// Returns the number of indices.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no indices.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the indices as a slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
}

impl From<Vec<u32>> for IndexBuffer {
    fn from(data: Vec<u32>) -> Self {
        Self { data }
    }
}

/// A named, backend-neutral geometry description.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDescriptor {
    /// The resource name other descriptors link against.
    pub name: String,
    /// The primitive assembly mode.
    pub topology: PrimitiveTopology,
    /// The interleaved vertex storage.
    pub vertices: VertexBuffer,
    /// The index storage.
    pub indices: IndexBuffer,
}

impl GeometryDescriptor {
    /// Creates a geometry descriptor from its parts.
    pub fn new(
        name: impl Into<String>,
        topology: PrimitiveTopology,
        vertices: VertexBuffer,
        indices: IndexBuffer,
    ) -> Self {
        Self {
            name: name.into(),
            topology,
            vertices,
            indices,
        }
    }

    /// Validates the descriptor as a whole.
    ///
    /// Backends run this when the descriptor is configured or updated, so a
    /// malformed geometry fails registration instead of a later draw.
    ///
    /// ## Errors
    /// * [`GeometryError::EmptyLayout`] - the vertex layout has no elements.
    /// * [`GeometryError::StorageSizeMismatch`] - storage size disagrees
    ///   with `vertex_count * stride`.
    /// * [`GeometryError::PartialPrimitive`] - the index count does not
    ///   divide into whole primitives.
    /// * [`GeometryError::IndexOutOfBounds`] - an index references a vertex
    ///   past the end of the vertex storage.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.layout().is_empty() {
            return Err(GeometryError::EmptyLayout {
                name: self.name.clone(),
            });
        }

        let expected = self.vertices.vertex_count() * self.vertices.stride();
        if self.vertices.bytes().len() != expected {
            return Err(GeometryError::StorageSizeMismatch {
                name: self.name.clone(),
                expected,
                actual: self.vertices.bytes().len(),
            });
        }

        if self.indices.len() % self.topology.indices_per_primitive() != 0 {
            return Err(GeometryError::PartialPrimitive {
                name: self.name.clone(),
                index_count: self.indices.len(),
                topology: self.topology,
            });
        }

        let vertex_count = self.vertices.vertex_count();
        for &index in self.indices.as_slice() {
            if index as usize >= vertex_count {
                return Err(GeometryError::IndexOutOfBounds {
                    name: self.name.clone(),
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct PosVertex {
        pos: [f32; 3],
    }

    fn quad() -> GeometryDescriptor {
        let mut vertices = VertexBuffer::new()
            .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
            .resize(4);
        vertices
            .write(|verts: &mut [PosVertex]| {
                verts[0].pos = [-0.5, -0.5, 0.0];
                verts[1].pos = [-0.5, 0.5, 0.0];
                verts[2].pos = [0.5, 0.5, 0.0];
                verts[3].pos = [0.5, -0.5, 0.0];
            })
            .unwrap();

        let mut indices = IndexBuffer::new().resize(6);
        indices.write(|idx| idx.copy_from_slice(&[0, 1, 2, 0, 2, 3]));

        GeometryDescriptor::new("quad", PrimitiveTopology::TriangleList, vertices, indices)
    }

    #[test]
    fn quad_passes_validation() {
        assert!(quad().validate().is_ok());
    }

    #[test]
    fn stride_follows_layout() {
        let vb = VertexBuffer::new()
            .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
            .add_element(VertexAttribute::TexCoord0, ScalarType::Float32, 2);
        assert_eq!(vb.stride(), 20);
    }

    #[test]
    fn typed_write_rejects_mismatched_stride() {
        let mut vb = VertexBuffer::new()
            .add_element(VertexAttribute::Position, ScalarType::Float32, 2)
            .resize(4);

        let err = vb.write(|_: &mut [PosVertex]| {}).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::StrideMismatch {
                expected: 8,
                actual: 12
            }
        ));
    }

    #[test]
    fn empty_layout_fails_validation() {
        let geo = GeometryDescriptor::new(
            "empty",
            PrimitiveTopology::TriangleList,
            VertexBuffer::new(),
            IndexBuffer::new(),
        );
        assert!(matches!(
            geo.validate(),
            Err(GeometryError::EmptyLayout { .. })
        ));
    }

    #[test]
    fn out_of_bounds_index_fails_validation() {
        let mut geo = quad();
        geo.indices.write(|idx| idx[5] = 9);

        assert!(matches!(
            geo.validate(),
            Err(GeometryError::IndexOutOfBounds {
                index: 9,
                vertex_count: 4,
                ..
            })
        ));
    }

    #[test]
    fn partial_triangle_fails_validation() {
        let mut geo = quad();
        geo.indices = IndexBuffer::from(vec![0, 1, 2, 3]);

        assert!(matches!(
            geo.validate(),
            Err(GeometryError::PartialPrimitive { index_count: 4, .. })
        ));
    }
}
