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

//! Integration tests driving the full dispatch pipeline: descriptors
//! broadcast through a fan-out of async views onto headless backends.

use khroma_core::asset::{assemble_array, import_async, ImageImporter};
use khroma_core::graphics::{
    AsyncView, AsyncViews, BackendType, BlendFactor, BlendState, CullMode, DepthState,
    EffectiveStates, GeometryDescriptor, Image, ImageDescriptor, ImportError, IndexBuffer,
    PixelFormat, PolygonState, PrimitiveTopology, RenderDetail, RenderObjectDescriptor,
    RenderStates, ScalarType, ShaderDescriptor, ShaderSet, StateSetDescriptor, TextureKind,
    Toggle, VariableKind, VariableSet, VariableValue, VertexAttribute, VertexBuffer,
};
use khroma_infra::{HeadlessBackend, TraceLog};
use std::sync::Arc;

// --- Test setup: the quad scene from the texture-array demo ---

fn quad_geometry(name: &str) -> GeometryDescriptor {
    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        pos: [f32; 3],
    }

    let mut vertices = VertexBuffer::new()
        .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
        .resize(4);
    vertices
        .write(|verts: &mut [Vertex]| {
            verts[0].pos = [-0.5, -0.5, 0.0];
            verts[1].pos = [-0.5, 0.5, 0.0];
            verts[2].pos = [0.5, 0.5, 0.0];
            verts[3].pos = [0.5, -0.5, 0.0];
        })
        .unwrap();

    let mut indices = IndexBuffer::new().resize(6);
    indices.write(|idx| idx.copy_from_slice(&[0, 1, 2, 0, 2, 3]));

    GeometryDescriptor::new(name, PrimitiveTopology::TriangleList, vertices, indices)
}

fn quad_shader(name: &str, declare_quad: bool) -> ShaderDescriptor {
    let mut shader = ShaderDescriptor::new(name)
        .insert(BackendType::OpenGl, ShaderSet::new("vs gl", "ps gl"))
        .insert(BackendType::D3d11, ShaderSet::new("vs hlsl", "ps hlsl"))
        .add_vertex_input_binding(VertexAttribute::Position, "in_pos")
        .declare_input("u_tex", VariableKind::Texture)
        .declare_input("u_texture", VariableKind::Int);
    if declare_quad {
        shader = shader.declare_input("u_quad", VariableKind::Int);
    }
    shader
}

fn quad_object(name: &str, geometry: &str, shader: &str) -> RenderObjectDescriptor {
    let mut ro = RenderObjectDescriptor::new(name);
    ro.link_geometry(geometry).link_shader(shader);
    for quad in 0..2i32 {
        let mut vars = VariableSet::new();
        vars.set("u_tex", VariableValue::texture("image_array"))
            .unwrap();
        vars.set("u_quad", quad).unwrap();
        vars.set("u_texture", 0i32).unwrap();
        ro.add_variable_set(vars);
    }
    ro
}

fn image_array(name: &str, layers: u32) -> ImageDescriptor {
    let mut image = Image::new();
    for _ in 0..layers {
        image
            .append(Image::with_dims(4, 4, PixelFormat::Rgba8Unorm))
            .unwrap();
    }
    ImageDescriptor::new(name, image).with_kind(TextureKind::D2Array)
}

/// Two headless backends of different families behind one fan-out, the
/// demo's two-window arrangement.
fn fan_out() -> (AsyncViews, TraceLog, TraceLog) {
    let (gl, gl_log) = HeadlessBackend::new(BackendType::OpenGl);
    let (dx, dx_log) = HeadlessBackend::new(BackendType::D3d11);
    let views = AsyncViews::new(vec![
        AsyncView::spawn(Box::new(gl)),
        AsyncView::spawn(Box::new(dx)),
    ]);
    (views, gl_log, dx_log)
}

fn configure_scene(views: &AsyncViews) {
    views.configure(quad_geometry("quad_geo"));
    views.configure(image_array("image_array", 4));
    views.configure(quad_shader("quad_shader", true));
    views.configure(quad_object("quad", "quad_geo", "quad_shader"));
}

fn bound_quad(draws: &[khroma_core::graphics::ResolvedDraw]) -> Vec<i32> {
    draws
        .iter()
        .filter_map(|draw| {
            draw.bindings.iter().find_map(|b| match (&b.name, &b.value) {
                (name, VariableValue::Int(v)) if name == "u_quad" => Some(*v),
                _ => None,
            })
        })
        .collect()
}

// --- Scenarios ---

#[test]
fn broadcast_configure_yields_identical_namespaces() {
    let (views, _, _) = fan_out();
    configure_scene(&views);

    for name in ["quad_geo", "image_array", "quad_shader", "quad"] {
        let answers: Vec<bool> = views.iter().map(|v| v.contains(name)).collect();
        assert_eq!(answers, vec![true, true], "existence of '{name}' diverged");
    }
    let absent: Vec<bool> = views.iter().map(|v| v.contains("never")).collect();
    assert_eq!(absent, vec![false, false]);
}

#[test]
fn out_of_bounds_indices_fail_configuration_everywhere() {
    let (views, gl_log, dx_log) = fan_out();

    let mut broken = quad_geometry("quad_geo");
    broken.indices = IndexBuffer::from(vec![0, 1, 9]);
    views.configure(broken);
    views.wait_idle();

    let answers: Vec<bool> = views.iter().map(|v| v.contains("quad_geo")).collect();
    assert_eq!(answers, vec![false, false]);
    assert!(gl_log.events().is_empty());
    assert!(dx_log.events().is_empty());
}

#[test]
fn both_variants_draw_with_their_quad_selector() {
    let (views, gl_log, dx_log) = fan_out();
    configure_scene(&views);

    views.render("quad", &RenderDetail::with_varset(0));
    views.render("quad", &RenderDetail::with_varset(1));
    views.wait_idle();

    for log in [&gl_log, &dx_log] {
        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(bound_quad(&draws), vec![0, 1]);
        assert!(draws.iter().all(|d| d.count == 6));
    }
}

#[test]
fn shader_without_quad_binding_still_draws() {
    let (views, gl_log, _) = fan_out();
    views.configure(quad_geometry("quad_geo"));
    views.configure(image_array("image_array", 4));
    views.configure(quad_shader("quad_shader", false));
    views.configure(quad_object("quad", "quad_geo", "quad_shader"));

    views.render("quad", &RenderDetail::with_varset(0));
    views.wait_idle();

    let draws = gl_log.draws();
    assert_eq!(draws.len(), 1, "the unbound variable must be skipped");
    assert!(bound_quad(&draws).is_empty());
    assert!(draws[0].bindings.iter().any(|b| b.name == "u_tex"));
}

#[test]
fn update_preserves_identity_and_replaces_content() {
    let (views, gl_log, dx_log) = fan_out();
    configure_scene(&views);

    views.render("quad", &RenderDetail::with_varset(0));

    // Reconcile the geometry down to a single triangle under the same name.
    let mut smaller = quad_geometry("quad_geo");
    smaller.indices = IndexBuffer::from(vec![0, 1, 2]);
    views.update(smaller);
    views.render("quad", &RenderDetail::with_varset(0));
    views.wait_idle();

    for log in [&gl_log, &dx_log] {
        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].count, 6);
        assert_eq!(draws[1].count, 3, "draws must see the updated content");
        assert_eq!(
            draws[0].geometry, draws[1].geometry,
            "update must not mint a second resource"
        );
    }
}

#[test]
fn root_and_override_states_compose() {
    let (views, gl_log, _) = fan_out();
    configure_scene(&views);

    let root = StateSetDescriptor::new("root_render_states").with_states(RenderStates {
        depth: Toggle::change(DepthState {
            test: false,
            write: true,
        }),
        polygon: Toggle::change(PolygonState {
            cull: CullMode::Back,
            ..Default::default()
        }),
        ..Default::default()
    });
    views.configure(root.clone());
    views.use_states(&root, 0);

    let blend_only = RenderStates {
        blend: Toggle::change(BlendState {
            enable: true,
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
        }),
        ..Default::default()
    };
    let detail = RenderDetail {
        states: Some(blend_only),
        ..RenderDetail::with_varset(0)
    };
    views.render("quad", &detail);
    views.wait_idle();

    let draws = gl_log.draws();
    let states = draws[0].states;
    assert!(states.depth.write);
    assert_eq!(states.polygon.cull, CullMode::Back);
    assert!(states.blend.enable);
}

#[test]
fn default_state_restores_pre_override_state() {
    let (views, gl_log, _) = fan_out();
    configure_scene(&views);

    let root = StateSetDescriptor::new("root_render_states").with_states(RenderStates {
        polygon: Toggle::change(PolygonState {
            cull: CullMode::Front,
            ..Default::default()
        }),
        ..Default::default()
    });
    views.use_states(&root, 0);
    views.use_states(
        &StateSetDescriptor::new("per_pass").with_states(RenderStates {
            depth: Toggle::change(DepthState {
                test: true,
                write: false,
            }),
            ..Default::default()
        }),
        5,
    );

    // The demo's end-of-frame restore: the default set at priority 10.
    views.use_states(&StateSetDescriptor::default(), 10);
    views.render("quad", &RenderDetail::with_varset(0));
    views.wait_idle();

    assert_eq!(gl_log.draws()[0].states, EffectiveStates::default());
}

#[test]
fn draw_errors_stay_local_to_one_backend_request() {
    let (views, gl_log, dx_log) = fan_out();
    configure_scene(&views);

    // This draw fails everywhere (no such object), the next succeeds.
    views.render("not_an_object", &RenderDetail::with_varset(0));
    views.render("quad", &RenderDetail::with_varset(1));
    views.wait_idle();

    for log in [&gl_log, &dx_log] {
        let draws = log.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(bound_quad(&draws), vec![1]);
    }
}

#[test]
fn shader_missing_a_family_variant_only_fails_that_backend() {
    let (views, gl_log, dx_log) = fan_out();
    views.configure(quad_geometry("quad_geo"));
    views.configure(image_array("image_array", 4));

    // OpenGL-only shader: the D3D11 backend rejects the configure, the
    // GL backend keeps drawing.
    let gl_only = ShaderDescriptor::new("quad_shader")
        .insert(BackendType::OpenGl, ShaderSet::new("vs gl", "ps gl"))
        .declare_input("u_tex", VariableKind::Texture)
        .declare_input("u_quad", VariableKind::Int)
        .declare_input("u_texture", VariableKind::Int);
    views.configure(gl_only);
    views.configure(quad_object("quad", "quad_geo", "quad_shader"));

    views.render("quad", &RenderDetail::with_varset(0));
    views.wait_idle();

    assert_eq!(gl_log.draws().len(), 1);
    assert!(dx_log.draws().is_empty());

    let answers: Vec<bool> = views.iter().map(|v| v.contains("quad_shader")).collect();
    assert_eq!(answers, vec![true, false]);
}

// --- Array-image import (the 4-slice scenario with one failure) ---

#[derive(Debug)]
struct TaggedImporter;

impl ImageImporter for TaggedImporter {
    fn import(&self, location: &str) -> Result<Image, ImportError> {
        match location.strip_prefix("images.") {
            Some(tag) if !tag.starts_with("missing") => {
                let tag: u8 = tag.as_bytes()[0] - b'0';
                let mut img = Image::with_dims(4, 4, PixelFormat::Rgba8Unorm);
                img.write_layer(0, |px: &mut [[u8; 4]], _, _| px.fill([tag, 0, 0, 255]))
                    .unwrap();
                Ok(img)
            }
            _ => Err(ImportError::NoPayload {
                location: location.to_string(),
            }),
        }
    }
}

#[test]
fn array_image_keeps_surviving_slices_in_request_order() {
    let importer: Arc<dyn ImageImporter> = Arc::new(TaggedImporter);
    let imports = vec![
        import_async(Arc::clone(&importer), "images.1"),
        import_async(Arc::clone(&importer), "images.2"),
        import_async(Arc::clone(&importer), "images.missing"),
        import_async(Arc::clone(&importer), "images.4"),
    ];
    let image = assemble_array(imports);

    assert_eq!(image.layer_count(), 3);
    let layer_bytes = 4 * 4 * 4;
    assert_eq!(image.bytes()[0], 1);
    assert_eq!(image.bytes()[layer_bytes], 2);
    assert_eq!(image.bytes()[2 * layer_bytes], 4);

    // The degraded image still configures and binds as a texture.
    let (views, gl_log, _) = fan_out();
    views.configure(quad_geometry("quad_geo"));
    views.configure(
        ImageDescriptor::new("image_array", image).with_kind(TextureKind::D2Array),
    );
    views.configure(quad_shader("quad_shader", true));
    views.configure(quad_object("quad", "quad_geo", "quad_shader"));
    views.render("quad", &RenderDetail::with_varset(0));
    views.wait_idle();

    assert_eq!(gl_log.draws().len(), 1);
}
