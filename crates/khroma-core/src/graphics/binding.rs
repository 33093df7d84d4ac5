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

//! Draw resolution: binds the selected variable set against the shader's
//! declared inputs, fills implicit binding points from the frame's view
//! context, and composes the effective fixed-function state.

use crate::graphics::backend::ViewInfo;
use crate::graphics::descriptor::ResourceDescriptor;
use crate::graphics::error::RenderError;
use crate::graphics::render_object::RenderDetail;
use crate::graphics::shader::BindingPoint;
use crate::graphics::state::{EffectiveStates, StateStack};
use crate::graphics::store::{ResourceId, ResourceStore};
use crate::graphics::variable::VariableValue;
use crate::math::Mat4;

/// One variable bound for a draw: its name, its value, and - for texture
/// references - the resolved image slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBinding {
    /// The shader-global name the value binds to.
    pub name: String,
    /// The bound value.
    pub value: VariableValue,
    /// The image slot a texture reference resolved to.
    pub texture: Option<ResourceId>,
}

/// A fully-resolved, validated draw, ready for a concrete backend to
/// execute without further lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraw {
    /// The render object name the draw was issued against.
    pub object: String,
    /// The resolved geometry slot.
    pub geometry: ResourceId,
    /// The resolved shader slot.
    pub shader: ResourceId,
    /// The first index to draw from.
    pub start: usize,
    /// The number of indices to draw.
    pub count: usize,
    /// The variable-set index the draw selected.
    pub varset: usize,
    /// The bound variables, explicit entries first, implicit ones after.
    pub bindings: Vec<ResolvedBinding>,
    /// The composed fixed-function state for this draw.
    pub states: EffectiveStates,
}

/// Resolves one draw of the render object named `object`.
///
/// Entries whose name the shader does not declare are skipped with a debug
/// log (a shader variant is free to ignore variables); a kind clash or a
/// dangling texture reference aborts the draw. Binding points the variable
/// set does not override are filled from `view`.
///
/// ## Errors
/// * [`RenderError::ResourceNotFound`] - object, links, or a referenced
///   texture are absent from the store.
/// * [`RenderError::VariantOutOfRange`] - `detail.varset` is out of range.
/// * [`RenderError::TypeMismatch`] - a bound kind disagrees with the
///   shader's declaration.
pub fn resolve_draw(
    store: &mut ResourceStore,
    stack: &StateStack,
    view: &ViewInfo,
    object: &str,
    detail: &RenderDetail,
) -> Result<ResolvedDraw, RenderError> {
    let object_id = store
        .id_of(object)
        .ok_or_else(|| RenderError::ResourceNotFound {
            name: object.to_string(),
        })?;
    let links = store.resolve_object_links(object_id)?;

    let Some(ResourceDescriptor::RenderObject(ro)) = store.get(object_id) else {
        return Err(RenderError::ResourceNotFound {
            name: object.to_string(),
        });
    };
    let Some(ResourceDescriptor::Shader(shader)) = store.get(links.shader) else {
        return Err(RenderError::ResourceNotFound {
            name: ro.shader().to_string(),
        });
    };
    let Some(ResourceDescriptor::Geometry(geometry)) = store.get(links.geometry) else {
        return Err(RenderError::ResourceNotFound {
            name: ro.geometry().to_string(),
        });
    };

    let varset = ro
        .variable_set(detail.varset)
        .ok_or_else(|| RenderError::VariantOutOfRange {
            object: object.to_string(),
            varset: detail.varset,
            available: ro.variable_set_count(),
        })?;

    let mut bindings = Vec::with_capacity(varset.len() + shader.bindings().len());

    for (name, value) in varset.iter() {
        let Some(declared) = shader.declared_kind(name) else {
            // A shader variant that ignores this variable still draws.
            log::debug!(
                "Variable '{}' has no declared input in shader '{}', skipped",
                name,
                shader.name
            );
            continue;
        };
        if declared != value.kind() {
            return Err(RenderError::TypeMismatch {
                variable: name.to_string(),
                expected: declared,
                found: value.kind(),
            });
        }

        let texture = match value {
            VariableValue::Texture(tex_name) => {
                let id = store.id_of(tex_name).filter(|&id| {
                    matches!(store.get(id), Some(ResourceDescriptor::Image(_)))
                });
                match id {
                    Some(id) => Some(id),
                    None => {
                        return Err(RenderError::ResourceNotFound {
                            name: tex_name.clone(),
                        })
                    }
                }
            }
            _ => None,
        };

        bindings.push(ResolvedBinding {
            name: name.to_string(),
            value: value.clone(),
            texture,
        });
    }

    // Implicit values for attached binding points; explicit entries win.
    for (point, global) in shader.bindings() {
        if varset.get(global).is_some() {
            continue;
        }
        if let Some(declared) = shader.declared_kind(global) {
            if declared != point.kind() {
                return Err(RenderError::TypeMismatch {
                    variable: global.clone(),
                    expected: declared,
                    found: point.kind(),
                });
            }
        }
        let value = match point {
            BindingPoint::ViewMatrix => VariableValue::Mat4(view.view_matrix),
            BindingPoint::ProjectionMatrix => VariableValue::Mat4(view.projection_matrix),
            BindingPoint::WorldMatrix => VariableValue::Mat4(Mat4::IDENTITY),
            BindingPoint::CameraPosition => VariableValue::Vec3(view.camera_position),
        };
        bindings.push(ResolvedBinding {
            name: global.clone(),
            value,
            texture: None,
        });
    }

    let index_count = geometry.indices.len();
    let available = index_count.saturating_sub(detail.start);
    let count = detail
        .num_elems
        .map(|n| n.min(available))
        .unwrap_or(available);

    let mut states = stack.effective(None);
    for overrides in ro.state_overrides() {
        overrides.apply_to(&mut states);
    }
    if let Some(transient) = &detail.states {
        transient.apply_to(&mut states);
    }

    Ok(ResolvedDraw {
        object: object.to_string(),
        geometry: links.geometry,
        shader: links.shader,
        start: detail.start,
        count,
        varset: detail.varset,
        bindings,
        states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::backend::BackendType;
    use crate::graphics::geometry::{
        GeometryDescriptor, IndexBuffer, PrimitiveTopology, ScalarType, VertexAttribute,
        VertexBuffer,
    };
    use crate::graphics::image::{Image, ImageDescriptor, PixelFormat};
    use crate::graphics::render_object::RenderObjectDescriptor;
    use crate::graphics::shader::{ShaderDescriptor, ShaderSet};
    use crate::graphics::variable::{VariableKind, VariableSet};

    fn store_with_quad(declare_quad: bool) -> ResourceStore {
        let mut store = ResourceStore::new();

        let vertices = VertexBuffer::new()
            .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
            .resize(4);
        store
            .configure(
                BackendType::OpenGl,
                GeometryDescriptor::new(
                    "quad_geo",
                    PrimitiveTopology::TriangleList,
                    vertices,
                    IndexBuffer::from(vec![0, 1, 2, 0, 2, 3]),
                )
                .into(),
            )
            .unwrap();

        store
            .configure(
                BackendType::OpenGl,
                ImageDescriptor::new("image_array", Image::with_dims(2, 2, PixelFormat::Rgba8Unorm))
                    .into(),
            )
            .unwrap();

        let mut shader = ShaderDescriptor::new("quad_shader")
            .insert(BackendType::OpenGl, ShaderSet::new("v", "p"))
            .add_vertex_input_binding(VertexAttribute::Position, "in_pos")
            .add_input_binding(BindingPoint::ViewMatrix, "u_view")
            .add_input_binding(BindingPoint::ProjectionMatrix, "u_proj")
            .declare_input("u_view", VariableKind::Mat4)
            .declare_input("u_proj", VariableKind::Mat4)
            .declare_input("u_tex", VariableKind::Texture);
        if declare_quad {
            shader = shader.declare_input("u_quad", VariableKind::Int);
        }
        store
            .configure(BackendType::OpenGl, shader.into())
            .unwrap();

        let mut ro = RenderObjectDescriptor::new("quad");
        ro.link_geometry("quad_geo").link_shader("quad_shader");
        for quad in 0..2i32 {
            let mut vars = VariableSet::new();
            vars.set("u_tex", VariableValue::texture("image_array"))
                .unwrap();
            vars.set("u_quad", quad).unwrap();
            ro.add_variable_set(vars);
        }
        store.configure(BackendType::OpenGl, ro.into()).unwrap();

        store
    }

    fn bound(draw: &ResolvedDraw, name: &str) -> Option<VariableValue> {
        draw.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.value.clone())
    }

    #[test]
    fn variants_bind_their_own_quad_selector() {
        let mut store = store_with_quad(true);
        let stack = StateStack::new();
        let view = ViewInfo::default();

        for quad in 0..2i32 {
            let draw = resolve_draw(
                &mut store,
                &stack,
                &view,
                "quad",
                &RenderDetail::with_varset(quad as usize),
            )
            .unwrap();
            assert_eq!(bound(&draw, "u_quad"), Some(VariableValue::Int(quad)));
            assert_eq!(draw.count, 6);
        }
    }

    #[test]
    fn undeclared_variable_is_skipped_not_fatal() {
        let mut store = store_with_quad(false);
        let stack = StateStack::new();
        let view = ViewInfo::default();

        let draw = resolve_draw(
            &mut store,
            &stack,
            &view,
            "quad",
            &RenderDetail::with_varset(0),
        )
        .unwrap();

        assert_eq!(bound(&draw, "u_quad"), None);
        assert!(bound(&draw, "u_tex").is_some());
    }

    #[test]
    fn implicit_binding_points_fill_from_view_info() {
        let mut store = store_with_quad(true);
        let stack = StateStack::new();
        let view = ViewInfo::new(
            Mat4::from_translation(crate::math::Vec3::new(0.0, 0.0, -5.0)),
            Mat4::perspective_rh_zo(1.0, 1.0, 0.1, 100.0),
            crate::math::Vec3::new(0.0, 0.0, 5.0),
        );

        let draw = resolve_draw(
            &mut store,
            &stack,
            &view,
            "quad",
            &RenderDetail::with_varset(0),
        )
        .unwrap();

        assert_eq!(
            bound(&draw, "u_view"),
            Some(VariableValue::Mat4(view.view_matrix))
        );
        assert_eq!(
            bound(&draw, "u_proj"),
            Some(VariableValue::Mat4(view.projection_matrix))
        );
    }

    #[test]
    fn explicit_entry_overrides_binding_point() {
        let mut store = store_with_quad(true);

        // Rewrite variant 0 to carry its own view matrix.
        let Some(ResourceDescriptor::RenderObject(ro)) = store.get_by_name("quad") else {
            panic!("render object missing");
        };
        let mut ro = ro.clone();
        ro.for_each_variable_set(|i, vars| {
            if i == 0 {
                vars.set("u_view", Mat4::ZERO).unwrap();
            }
        });
        store
            .update(BackendType::OpenGl, ro.into())
            .unwrap();

        let draw = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "quad",
            &RenderDetail::with_varset(0),
        )
        .unwrap();

        assert_eq!(bound(&draw, "u_view"), Some(VariableValue::Mat4(Mat4::ZERO)));
        // Only one u_view binding may survive.
        assert_eq!(
            draw.bindings.iter().filter(|b| b.name == "u_view").count(),
            1
        );
    }

    #[test]
    fn kind_clash_aborts_the_draw() {
        let mut store = store_with_quad(true);

        let Some(ResourceDescriptor::RenderObject(ro)) = store.get_by_name("quad") else {
            panic!("render object missing");
        };
        let mut ro = ro.clone();
        // A fresh variant whose u_quad is a float disagrees with the
        // shader's Int declaration.
        let mut vars = VariableSet::new();
        vars.set("u_quad", 0.5f32).unwrap();
        ro.add_variable_set(vars);
        store.update(BackendType::OpenGl, ro.into()).unwrap();

        let err = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "quad",
            &RenderDetail::with_varset(2),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RenderError::TypeMismatch {
                expected: VariableKind::Int,
                found: VariableKind::Float,
                ..
            }
        ));
    }

    #[test]
    fn dangling_texture_reference_aborts_the_draw() {
        let mut store = store_with_quad(true);

        let Some(ResourceDescriptor::RenderObject(ro)) = store.get_by_name("quad") else {
            panic!("render object missing");
        };
        let mut ro = ro.clone();
        ro.for_each_variable_set(|_, vars| {
            vars.set("u_tex", VariableValue::texture("never_configured"))
                .unwrap();
        });
        store.update(BackendType::OpenGl, ro.into()).unwrap();

        let err = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "quad",
            &RenderDetail::with_varset(0),
        )
        .unwrap_err();

        assert!(
            matches!(err, RenderError::ResourceNotFound { name } if name == "never_configured")
        );
    }

    #[test]
    fn missing_object_fails_with_resource_not_found() {
        let mut store = ResourceStore::new();
        let err = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "nope",
            &RenderDetail::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::ResourceNotFound { name } if name == "nope"));
    }

    #[test]
    fn varset_out_of_range_is_reported() {
        let mut store = store_with_quad(true);
        let err = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "quad",
            &RenderDetail::with_varset(7),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RenderError::VariantOutOfRange {
                varset: 7,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn start_and_count_clamp_to_index_range() {
        let mut store = store_with_quad(true);
        let detail = RenderDetail {
            start: 3,
            num_elems: Some(100),
            varset: 0,
            states: None,
        };

        let draw = resolve_draw(
            &mut store,
            &StateStack::new(),
            &ViewInfo::default(),
            "quad",
            &detail,
        )
        .unwrap();

        assert_eq!(draw.start, 3);
        assert_eq!(draw.count, 3);
    }
}
