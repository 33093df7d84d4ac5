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

//! The per-backend resource registry: name → slot mapping with stable
//! identity across updates, plus cached link resolution for render objects.

use crate::graphics::backend::BackendType;
use crate::graphics::descriptor::ResourceDescriptor;
use crate::graphics::error::{RenderError, ResourceError};
use std::collections::HashMap;

/// An opaque handle to a slot in one backend's [`ResourceStore`].
///
/// Ids are only meaningful within the store that issued them; the resource
/// *name* is the cross-backend identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

/// The geometry and shader slots a render object resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectLinks {
    /// The linked geometry's slot.
    pub geometry: ResourceId,
    /// The linked shader's slot.
    pub shader: ResourceId,
}

#[derive(Debug)]
struct StoredResource {
    descriptor: ResourceDescriptor,
    // Resolved once at first draw, invalidated when the object is updated.
    links: Option<ObjectLinks>,
}

/// One backend's private, name-keyed resource registry.
///
/// `configure` claims a fresh slot per name, `update` rewrites the slot in
/// place, so a resource keeps its [`ResourceId`] for its whole lifetime.
#[derive(Debug, Default)]
pub struct ResourceStore {
    entries: Vec<StoredResource>,
    names: HashMap<String, usize>,
}

impl ResourceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` under its name.
    ///
    /// ## Arguments
    /// * `backend` - the family of the owning backend, used to validate
    ///   shader descriptors against.
    /// * `descriptor` - the resource description to copy into the store.
    ///
    /// ## Errors
    /// * [`ResourceError::Duplicate`] - the name is already registered.
    /// * Validation errors from the descriptor's content.
    pub fn configure(
        &mut self,
        backend: BackendType,
        descriptor: ResourceDescriptor,
    ) -> Result<ResourceId, ResourceError> {
        let name = descriptor.name().to_string();
        if self.names.contains_key(&name) {
            return Err(ResourceError::Duplicate { name });
        }
        Self::validate(backend, &descriptor)?;

        let slot = self.entries.len();
        self.entries.push(StoredResource {
            descriptor,
            links: None,
        });
        self.names.insert(name, slot);
        Ok(ResourceId(slot))
    }

    /// Rewrites the already-registered resource named by `descriptor`,
    /// preserving its slot.
    ///
    /// ## Errors
    /// * [`ResourceError::NotFound`] - the name was never configured.
    /// * Validation errors from the descriptor's content.
    pub fn update(
        &mut self,
        backend: BackendType,
        descriptor: ResourceDescriptor,
    ) -> Result<ResourceId, ResourceError> {
        let slot = match self.names.get(descriptor.name()) {
            Some(&slot) => slot,
            None => {
                return Err(ResourceError::NotFound {
                    name: descriptor.name().to_string(),
                })
            }
        };
        Self::validate(backend, &descriptor)?;

        let entry = &mut self.entries[slot];
        // A rewritten object may link different names; its cache is stale.
        if matches!(descriptor, ResourceDescriptor::RenderObject(_)) {
            entry.links = None;
        }
        entry.descriptor = descriptor;
        Ok(ResourceId(slot))
    }

    fn validate(backend: BackendType, descriptor: &ResourceDescriptor) -> Result<(), ResourceError> {
        match descriptor {
            ResourceDescriptor::Geometry(geo) => geo.validate().map_err(ResourceError::from),
            ResourceDescriptor::Shader(shader) => {
                if shader.set_for(backend).is_none() {
                    return Err(ResourceError::MissingBackendVariant {
                        name: shader.name.clone(),
                        backend,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Returns `true` if a resource named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns the slot registered under `name`, if any.
    pub fn id_of(&self, name: &str) -> Option<ResourceId> {
        self.names.get(name).copied().map(ResourceId)
    }

    /// Returns the descriptor stored at `id`, if any.
    pub fn get(&self, id: ResourceId) -> Option<&ResourceDescriptor> {
        self.entries.get(id.0).map(|e| &e.descriptor)
    }

    /// Returns the descriptor registered under `name`, if any.
    pub fn get_by_name(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no resources are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the geometry and shader slots of the render object at
    /// `object`, caching the result on the entry so later draws skip the
    /// name lookups.
    ///
    /// ## Errors
    /// * [`RenderError::ResourceNotFound`] - a linked name is absent or
    ///   registered as a different resource kind.
    pub fn resolve_object_links(&mut self, object: ResourceId) -> Result<ObjectLinks, RenderError> {
        if let Some(links) = self.entries.get(object.0).and_then(|e| e.links) {
            return Ok(links);
        }

        let (geometry_name, shader_name) = match self.get(object) {
            Some(ResourceDescriptor::RenderObject(ro)) => {
                (ro.geometry().to_string(), ro.shader().to_string())
            }
            _ => {
                return Err(RenderError::ResourceNotFound {
                    name: format!("render object #{}", object.0),
                })
            }
        };

        let geometry = self.link_of(&geometry_name, |d| {
            matches!(d, ResourceDescriptor::Geometry(_))
        })?;
        let shader = self.link_of(&shader_name, |d| {
            matches!(d, ResourceDescriptor::Shader(_))
        })?;

        let links = ObjectLinks { geometry, shader };
        self.entries[object.0].links = Some(links);
        Ok(links)
    }

    fn link_of(
        &self,
        name: &str,
        is_expected_kind: impl Fn(&ResourceDescriptor) -> bool,
    ) -> Result<ResourceId, RenderError> {
        match self.id_of(name) {
            Some(id) if self.get(id).is_some_and(is_expected_kind) => Ok(id),
            _ => Err(RenderError::ResourceNotFound {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::geometry::{
        GeometryDescriptor, IndexBuffer, PrimitiveTopology, ScalarType, VertexAttribute,
        VertexBuffer,
    };
    use crate::graphics::render_object::RenderObjectDescriptor;
    use crate::graphics::shader::{ShaderDescriptor, ShaderSet};
    use crate::graphics::state::StateSetDescriptor;

    fn triangle(name: &str) -> ResourceDescriptor {
        let vertices = VertexBuffer::new()
            .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
            .resize(3);
        GeometryDescriptor::new(
            name,
            PrimitiveTopology::TriangleList,
            vertices,
            IndexBuffer::from(vec![0, 1, 2]),
        )
        .into()
    }

    fn shader(name: &str) -> ResourceDescriptor {
        ShaderDescriptor::new(name)
            .insert(BackendType::OpenGl, ShaderSet::new("v", "p"))
            .into()
    }

    fn object(name: &str, geometry: &str, shader: &str) -> ResourceDescriptor {
        let mut ro = RenderObjectDescriptor::new(name);
        ro.link_geometry(geometry).link_shader(shader);
        ro.into()
    }

    #[test]
    fn duplicate_configure_is_rejected() {
        let mut store = ResourceStore::new();
        store
            .configure(BackendType::OpenGl, triangle("tri"))
            .unwrap();

        let err = store
            .configure(BackendType::OpenGl, triangle("tri"))
            .unwrap_err();
        assert!(matches!(err, ResourceError::Duplicate { name } if name == "tri"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_preserves_identity() {
        let mut store = ResourceStore::new();
        let id = store
            .configure(BackendType::OpenGl, triangle("tri"))
            .unwrap();

        let updated = store.update(BackendType::OpenGl, triangle("tri")).unwrap();
        assert_eq!(id, updated);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_of_unconfigured_name_fails() {
        let mut store = ResourceStore::new();
        let err = store
            .update(BackendType::OpenGl, triangle("tri"))
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
    }

    #[test]
    fn shader_without_family_variant_is_rejected() {
        let mut store = ResourceStore::new();
        let err = store
            .configure(BackendType::D3d11, shader("sh"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingBackendVariant {
                backend: BackendType::D3d11,
                ..
            }
        ));
    }

    #[test]
    fn object_links_resolve_and_cache() {
        let mut store = ResourceStore::new();
        let geo_id = store
            .configure(BackendType::OpenGl, triangle("tri"))
            .unwrap();
        let shader_id = store.configure(BackendType::OpenGl, shader("sh")).unwrap();
        let obj_id = store
            .configure(BackendType::OpenGl, object("obj", "tri", "sh"))
            .unwrap();

        let links = store.resolve_object_links(obj_id).unwrap();
        assert_eq!(links.geometry, geo_id);
        assert_eq!(links.shader, shader_id);

        // Second resolution serves the cache.
        assert_eq!(store.resolve_object_links(obj_id).unwrap(), links);
    }

    #[test]
    fn object_link_to_missing_geometry_fails() {
        let mut store = ResourceStore::new();
        store.configure(BackendType::OpenGl, shader("sh")).unwrap();
        let obj_id = store
            .configure(BackendType::OpenGl, object("obj", "missing", "sh"))
            .unwrap();

        let err = store.resolve_object_links(obj_id).unwrap_err();
        assert!(matches!(err, RenderError::ResourceNotFound { name } if name == "missing"));
    }

    #[test]
    fn object_link_to_wrong_kind_fails() {
        let mut store = ResourceStore::new();
        store
            .configure(
                BackendType::OpenGl,
                StateSetDescriptor::new("states").into(),
            )
            .unwrap();
        store.configure(BackendType::OpenGl, shader("sh")).unwrap();
        let obj_id = store
            .configure(BackendType::OpenGl, object("obj", "states", "sh"))
            .unwrap();

        assert!(store.resolve_object_links(obj_id).is_err());
    }

    #[test]
    fn update_invalidates_object_link_cache() {
        let mut store = ResourceStore::new();
        store
            .configure(BackendType::OpenGl, triangle("tri_a"))
            .unwrap();
        let geo_b = store
            .configure(BackendType::OpenGl, triangle("tri_b"))
            .unwrap();
        store.configure(BackendType::OpenGl, shader("sh")).unwrap();
        let obj_id = store
            .configure(BackendType::OpenGl, object("obj", "tri_a", "sh"))
            .unwrap();
        store.resolve_object_links(obj_id).unwrap();

        store
            .update(BackendType::OpenGl, object("obj", "tri_b", "sh"))
            .unwrap();

        let links = store.resolve_object_links(obj_id).unwrap();
        assert_eq!(links.geometry, geo_b);
    }
}
