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

//! Defines the hierarchy of error types for the dispatch core.
//!
//! Errors stay local to the backend that raised them: a failed configure or
//! draw is logged on that backend's worker and the next request proceeds.

use crate::graphics::backend::BackendType;
use crate::graphics::geometry::PrimitiveTopology;
use crate::graphics::image::PixelFormat;
use crate::graphics::variable::VariableKind;
use std::fmt;

/// An error raised while validating geometry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The vertex layout contains no elements.
    EmptyLayout {
        /// The name of the offending geometry resource.
        name: String,
    },
    /// An index value references a vertex outside the vertex buffer.
    IndexOutOfBounds {
        /// The name of the offending geometry resource.
        name: String,
        /// The out-of-bounds index value.
        index: u32,
        /// The number of vertices actually stored.
        vertex_count: usize,
    },
    /// The vertex byte storage does not match `vertex_count * stride`.
    StorageSizeMismatch {
        /// The name of the offending geometry resource.
        name: String,
        /// The expected byte size.
        expected: usize,
        /// The actual byte size.
        actual: usize,
    },
    /// The index count does not form whole primitives for the topology.
    PartialPrimitive {
        /// The name of the offending geometry resource.
        name: String,
        /// The number of indices stored.
        index_count: usize,
        /// The topology the count was checked against.
        topology: PrimitiveTopology,
    },
    /// A typed write window does not match the buffer's element stride.
    StrideMismatch {
        /// The stride implied by the vertex layout, in bytes.
        expected: usize,
        /// The size of the requested element type, in bytes.
        actual: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::EmptyLayout { name } => {
                write!(f, "Geometry '{name}' has an empty vertex layout")
            }
            GeometryError::IndexOutOfBounds {
                name,
                index,
                vertex_count,
            } => {
                write!(
                    f,
                    "Geometry '{name}' index {index} is out of bounds for {vertex_count} vertices"
                )
            }
            GeometryError::StorageSizeMismatch {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Geometry '{name}' vertex storage is {actual} bytes, expected {expected}"
                )
            }
            GeometryError::PartialPrimitive {
                name,
                index_count,
                topology,
            } => {
                write!(
                    f,
                    "Geometry '{name}' index count {index_count} does not form whole {topology:?} primitives"
                )
            }
            GeometryError::StrideMismatch { expected, actual } => {
                write!(
                    f,
                    "Typed write of {actual}-byte elements does not match the {expected}-byte layout stride"
                )
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// An error raised while assembling image pixel storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// An appended layer has different dimensions than the image.
    LayerDimensionMismatch {
        /// The dimensions already established by the image.
        expected: (u32, u32),
        /// The dimensions of the rejected layer.
        actual: (u32, u32),
    },
    /// An appended layer has a different pixel format than the image.
    FormatMismatch {
        /// The format already established by the image.
        expected: PixelFormat,
        /// The format of the rejected layer.
        actual: PixelFormat,
    },
    /// A typed pixel write does not match the image's pixel size.
    PixelSizeMismatch {
        /// The pixel size implied by the format, in bytes.
        expected: usize,
        /// The size of the requested pixel type, in bytes.
        actual: usize,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::LayerDimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Appended layer is {}x{}, image layers are {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
            ImageError::FormatMismatch { expected, actual } => {
                write!(
                    f,
                    "Appended layer format {actual:?} does not match image format {expected:?}"
                )
            }
            ImageError::PixelSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Typed write of {actual}-byte pixels does not match the {expected}-byte format"
                )
            }
        }
    }
}

impl std::error::Error for ImageError {}

/// An error raised while writing a variable into a [`VariableSet`].
///
/// [`VariableSet`]: crate::graphics::variable::VariableSet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    /// A name was re-written with a value of a different kind.
    KindMismatch {
        /// The variable name.
        name: String,
        /// The kind established by the first write.
        expected: VariableKind,
        /// The kind of the rejected value.
        found: VariableKind,
    },
}

impl fmt::Display for VariableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableError::KindMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Variable '{name}' is declared {expected:?}, rejected write of {found:?}"
                )
            }
        }
    }
}

impl std::error::Error for VariableError {}

/// An error raised while registering or updating a named resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// `configure` was called twice for the same name.
    Duplicate {
        /// The already-registered resource name.
        name: String,
    },
    /// `update` (or a link resolution) referenced a name never configured.
    NotFound {
        /// The missing resource name.
        name: String,
    },
    /// A shader descriptor carries no source for the configuring backend.
    MissingBackendVariant {
        /// The shader resource name.
        name: String,
        /// The backend family that found no source entry.
        backend: BackendType,
    },
    /// Geometry validation failed.
    Geometry(GeometryError),
    /// Image validation failed.
    Image(ImageError),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Duplicate { name } => {
                write!(f, "Resource '{name}' is already configured")
            }
            ResourceError::NotFound { name } => {
                write!(f, "Resource '{name}' is not configured")
            }
            ResourceError::MissingBackendVariant { name, backend } => {
                write!(f, "Shader '{name}' has no source for backend {backend:?}")
            }
            ResourceError::Geometry(err) => write!(f, "Geometry resource error: {err}"),
            ResourceError::Image(err) => write!(f, "Image resource error: {err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Geometry(err) => Some(err),
            ResourceError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeometryError> for ResourceError {
    fn from(err: GeometryError) -> Self {
        ResourceError::Geometry(err)
    }
}

impl From<ImageError> for ResourceError {
    fn from(err: ImageError) -> Self {
        ResourceError::Image(err)
    }
}

/// An error that aborts a single draw call.
///
/// A draw-level error never outlives the request that raised it: the
/// backend stays ready for the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The draw referenced a resource name absent from the backend's store.
    ResourceNotFound {
        /// The missing resource name.
        name: String,
    },
    /// A variable set entry's kind disagrees with the shader's declaration.
    TypeMismatch {
        /// The variable name.
        variable: String,
        /// The kind the shader declares for this name.
        expected: VariableKind,
        /// The kind the variable set supplied.
        found: VariableKind,
    },
    /// The requested variable-set index is outside the object's list.
    VariantOutOfRange {
        /// The render object name.
        object: String,
        /// The requested variable-set index.
        varset: usize,
        /// The number of variable sets the object owns.
        available: usize,
    },
    /// A resource-level failure surfaced during draw resolution.
    Resource(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceNotFound { name } => {
                write!(f, "Draw references unconfigured resource '{name}'")
            }
            RenderError::TypeMismatch {
                variable,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Variable '{variable}' bound as {found:?}, shader declares {expected:?}"
                )
            }
            RenderError::VariantOutOfRange {
                object,
                varset,
                available,
            } => {
                write!(
                    f,
                    "Render object '{object}' has {available} variable sets, index {varset} requested"
                )
            }
            RenderError::Resource(err) => write!(f, "Draw resolution failed: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

/// An error returned by an asset-import collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The import produced no payload.
    NoPayload {
        /// The logical path that was requested.
        location: String,
    },
    /// The payload could not be decoded.
    Decode {
        /// The logical path that was requested.
        location: String,
        /// Details from the decoder.
        details: String,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoPayload { location } => {
                write!(f, "Import of '{location}' produced no payload")
            }
            ImportError::Decode { location, details } => {
                write!(f, "Import of '{location}' failed to decode: {details}")
            }
        }
    }
}

impl std::error::Error for ImportError {}
