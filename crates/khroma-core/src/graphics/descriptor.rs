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

//! The uniform envelope carrying any resource description to a backend.

use crate::graphics::geometry::GeometryDescriptor;
use crate::graphics::image::ImageDescriptor;
use crate::graphics::render_object::RenderObjectDescriptor;
use crate::graphics::shader::ShaderDescriptor;
use crate::graphics::state::StateSetDescriptor;

/// Any named resource description a backend can configure or update.
///
/// `configure`/`update` take this envelope instead of one method per
/// resource kind, so the backend contract stays a fixed capability set.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDescriptor {
    /// Geometry: vertex layout, vertex storage, index storage.
    Geometry(GeometryDescriptor),
    /// Image: layered pixels plus sampling state.
    Image(ImageDescriptor),
    /// Shader: per-family sources plus binding tables.
    Shader(ShaderDescriptor),
    /// Render-state set.
    StateSet(StateSetDescriptor),
    /// Render object: links, overrides, and draw variants.
    RenderObject(RenderObjectDescriptor),
}

impl ResourceDescriptor {
    /// Returns the resource name, the cross-backend shared identifier.
    pub fn name(&self) -> &str {
        match self {
            ResourceDescriptor::Geometry(d) => &d.name,
            ResourceDescriptor::Image(d) => &d.name,
            ResourceDescriptor::Shader(d) => &d.name,
            ResourceDescriptor::StateSet(d) => &d.name,
            ResourceDescriptor::RenderObject(d) => &d.name,
        }
    }
}

impl From<GeometryDescriptor> for ResourceDescriptor {
    fn from(d: GeometryDescriptor) -> Self {
        ResourceDescriptor::Geometry(d)
    }
}

impl From<ImageDescriptor> for ResourceDescriptor {
    fn from(d: ImageDescriptor) -> Self {
        ResourceDescriptor::Image(d)
    }
}

impl From<ShaderDescriptor> for ResourceDescriptor {
    fn from(d: ShaderDescriptor) -> Self {
        ResourceDescriptor::Shader(d)
    }
}

impl From<StateSetDescriptor> for ResourceDescriptor {
    fn from(d: StateSetDescriptor) -> Self {
        ResourceDescriptor::StateSet(d)
    }
}

impl From<RenderObjectDescriptor> for ResourceDescriptor {
    fn from(d: RenderObjectDescriptor) -> Self {
        ResourceDescriptor::RenderObject(d)
    }
}
