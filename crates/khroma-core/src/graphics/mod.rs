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

//! Backend-agnostic rendering core.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`geometry`]**, **[`image`]**, **[`shader`]**, **[`state`]**,
//!   **[`variable`]**, **[`render_object`]**: the value-like resource
//!   descriptors a client declares once.
//! - **[`descriptor`]**: the uniform envelope carrying any of them.
//! - **[`backend`]**: the executor contract one concrete implementation
//!   per backend family satisfies.
//! - **[`store`]**, **[`binding`]**: the per-backend registry and the
//!   draw-resolution logic implementations share.
//! - **[`view`]**, **[`views`]**: the async handle to one executor, and
//!   the fan-out over many.
//! - **[`error`]**: the failure taxonomy for all of the above.

pub mod backend;
pub mod binding;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod image;
pub mod render_object;
pub mod shader;
pub mod state;
pub mod store;
pub mod variable;
pub mod view;
pub mod views;

pub use backend::{BackendType, GraphicsBackend, ViewInfo};
pub use binding::{resolve_draw, ResolvedBinding, ResolvedDraw};
pub use descriptor::ResourceDescriptor;
pub use error::{
    GeometryError, ImageError, ImportError, RenderError, ResourceError, VariableError,
};
pub use geometry::{
    GeometryDescriptor, IndexBuffer, PrimitiveTopology, ScalarType, VertexAttribute,
    VertexBuffer, VertexLayoutElement,
};
pub use image::{FilterMode, Image, ImageDescriptor, PixelFormat, TextureKind, WrapMode};
pub use render_object::{RenderDetail, RenderObjectDescriptor};
pub use shader::{BindingPoint, ShaderDescriptor, ShaderInput, ShaderSet};
pub use state::{
    BlendFactor, BlendState, CullMode, DepthState, EffectiveStates, FillMode, FrontFace,
    PolygonState, RenderStates, ScissorState, StateSetDescriptor, StateStack, Toggle,
};
pub use store::{ObjectLinks, ResourceId, ResourceStore};
pub use variable::{VariableKind, VariableSet, VariableValue};
pub use view::{AsyncView, ViewId};
pub use views::AsyncViews;
