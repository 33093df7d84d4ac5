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

//! The backend executor contract: the capability set every concrete
//! graphics backend implements, and the per-frame view context it consumes.

use crate::graphics::descriptor::ResourceDescriptor;
use crate::graphics::error::{RenderError, ResourceError};
use crate::graphics::render_object::RenderDetail;
use crate::graphics::state::StateSetDescriptor;
use crate::math::{Mat4, Vec3};
use std::fmt::Debug;

/// A backend-agnostic representation of a graphics API family.
///
/// Shader descriptors key their source variants by this; a backend only
/// accepts shaders carrying an entry for its own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Desktop OpenGL.
    OpenGl,
    /// OpenGL ES.
    OpenGlEs,
    /// Microsoft's DirectX 11 API.
    D3d11,
    /// Vulkan API.
    Vulkan,
    /// Apple's Metal API.
    Metal,
}

/// Camera and projection information for rendering one view.
///
/// Published per frame through `prepare_frame`; well-known binding points
/// a variable set does not override are filled from here.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewInfo {
    /// The camera's view matrix (world to view space).
    pub view_matrix: Mat4,
    /// The camera's projection matrix (view to clip space).
    pub projection_matrix: Mat4,
    /// The camera's position in world space.
    pub camera_position: Vec3,
}

impl ViewInfo {
    /// Creates a new `ViewInfo` from individual components.
    pub fn new(view_matrix: Mat4, projection_matrix: Mat4, camera_position: Vec3) -> Self {
        Self {
            view_matrix,
            projection_matrix,
            camera_position,
        }
    }
}

impl Default for ViewInfo {
    fn default() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
        }
    }
}

/// One concrete graphics backend: an executor over a private, name-keyed
/// resource store.
///
/// Implementations run behind an [`AsyncView`] on their own thread, so
/// methods take `&mut self` and are free of internal locking. Errors are
/// local to the request that raised them; the executor keeps consuming.
///
/// [`AsyncView`]: crate::graphics::view::AsyncView
pub trait GraphicsBackend: Send + Debug + 'static {
    /// Returns the API family this backend executes.
    fn backend_type(&self) -> BackendType;

    /// Registers a resource under its descriptor name.
    ///
    /// ## Errors
    /// * [`ResourceError::Duplicate`] - the name is already configured.
    /// * [`ResourceError::MissingBackendVariant`] - a shader descriptor has
    ///   no source for this backend's family.
    /// * [`ResourceError::Geometry`] / [`ResourceError::Image`] -
    ///   validation of the descriptor's content failed.
    fn configure(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceError>;

    /// Reconciles an already-configured resource in place.
    ///
    /// The resource keeps its identity: subsequent draws referencing its
    /// name see the new content and no second resource appears.
    ///
    /// ## Errors
    /// * [`ResourceError::NotFound`] - the name was never configured.
    /// * The same validation errors as [`GraphicsBackend::configure`].
    fn update(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceError>;

    /// Publishes the view context consumed by implicit binding points in
    /// subsequent draws.
    fn prepare_frame(&mut self, view: ViewInfo);

    /// Resolves and executes one draw of the render object named `object`.
    ///
    /// ## Errors
    /// * [`RenderError::ResourceNotFound`] - the object, its links, or a
    ///   referenced texture are absent from this backend's store.
    /// * [`RenderError::VariantOutOfRange`] - `detail.varset` exceeds the
    ///   object's variable-set list.
    /// * [`RenderError::TypeMismatch`] - a variable's kind disagrees with
    ///   the shader's declaration. Aborts only this draw.
    fn render(&mut self, object: &str, detail: &RenderDetail) -> Result<(), RenderError>;

    /// Pushes a state override at `priority`; a set with no changed groups
    /// clears every override at or below `priority` instead.
    fn use_states(&mut self, states: &StateSetDescriptor, priority: u32);

    /// Returns `true` if a resource named `name` is registered in this
    /// backend's store.
    fn contains(&self, name: &str) -> bool;
}
