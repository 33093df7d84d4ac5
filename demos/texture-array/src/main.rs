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

// Texture-array demo: a quad drawn twice per frame (left and right) from
// one render object with two variable sets, sampling one slice of an
// array texture. The whole description is fanned out to two backend
// executors, the way the two-window setup runs one GL and one D3D view.

use anyhow::Result;
use khroma_core::asset::{assemble_array, import_async, ImageImporter};
use khroma_core::graphics::{
    AsyncView, AsyncViews, BackendType, BindingPoint, CullMode, DepthState, FillMode, FilterMode,
    FrontFace, GeometryDescriptor, Image, ImageDescriptor, ImportError, IndexBuffer, PixelFormat,
    PolygonState, PrimitiveTopology, RenderDetail, RenderObjectDescriptor, RenderStates,
    ScalarType, ShaderDescriptor, ShaderSet, StateSetDescriptor, TextureKind, Toggle,
    VariableKind, VariableSet, VariableValue, VertexAttribute, VertexBuffer, WrapMode,
};
use khroma_core::math::{degrees_to_radians, Vec3};
use khroma_core::PinholeCamera;
use khroma_infra::{HeadlessBackend, TraceLog};
use std::sync::Arc;

const FRAMES: usize = 4;
const WINDOW_SIZE: (u32, u32) = (800, 800);

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    pos: [f32; 3],
}

/// Stands in for the on-disk import pipeline: produces one solid-colored
/// slice per location, with slice 3 deliberately unavailable so the array
/// image demonstrates graceful degradation.
#[derive(Debug)]
struct ProceduralImporter;

impl ImageImporter for ProceduralImporter {
    fn import(&self, location: &str) -> Result<Image, ImportError> {
        let color: [u8; 4] = match location {
            "images.1_.png" => [255, 64, 64, 255],
            "images.2_.png" => [64, 255, 64, 255],
            "images.4.png" => [64, 64, 255, 255],
            _ => {
                return Err(ImportError::NoPayload {
                    location: location.to_string(),
                })
            }
        };

        let mut img = Image::with_dims(64, 64, PixelFormat::Rgba8Unorm);
        img.write_layer(0, |px: &mut [[u8; 4]], _, _| px.fill(color))
            .map_err(|err| ImportError::Decode {
                location: location.to_string(),
                details: err.to_string(),
            })?;
        Ok(img)
    }
}

fn root_render_states() -> StateSetDescriptor {
    StateSetDescriptor::new("root_render_states").with_states(RenderStates {
        depth: Toggle::change(DepthState {
            test: false,
            write: true,
        }),
        polygon: Toggle::change(PolygonState {
            cull: CullMode::Back,
            front_face: FrontFace::Cw,
            fill: FillMode::Fill,
        }),
        ..Default::default()
    })
}

fn quad_geometry() -> Result<GeometryDescriptor> {
    let mut vertices = VertexBuffer::new()
        .add_element(VertexAttribute::Position, ScalarType::Float32, 3)
        .resize(4);
    vertices.write(|verts: &mut [Vertex]| {
        verts[0].pos = [-0.5, -0.5, 0.0];
        verts[1].pos = [-0.5, 0.5, 0.0];
        verts[2].pos = [0.5, 0.5, 0.0];
        verts[3].pos = [0.5, -0.5, 0.0];
    })?;

    let mut indices = IndexBuffer::new().resize(6);
    indices.write(|idx| idx.copy_from_slice(&[0, 1, 2, 0, 2, 3]));

    Ok(GeometryDescriptor::new(
        "quad",
        PrimitiveTopology::TriangleList,
        vertices,
        indices,
    ))
}

fn array_image() -> ImageDescriptor {
    let importer: Arc<dyn ImageImporter> = Arc::new(ProceduralImporter);
    let imports = vec![
        import_async(Arc::clone(&importer), "images.1_.png"),
        import_async(Arc::clone(&importer), "images.2_.png"),
        import_async(Arc::clone(&importer), "images.3_.png"),
        import_async(Arc::clone(&importer), "images.4.png"),
    ];
    let image = assemble_array(imports);
    log::info!("Array image assembled with {} slices", image.layer_count());

    ImageDescriptor::new("image_array", image)
        .with_kind(TextureKind::D2Array)
        .with_wrap(WrapMode::Repeat, WrapMode::Repeat)
        .with_filter(FilterMode::Nearest, FilterMode::Nearest)
}

fn quad_shader() -> ShaderDescriptor {
    let gl = ShaderSet::new(
        r"
        #version 140
        in vec3 in_pos ;
        out vec2 var_tx ;

        uniform int u_quad ; // in [0,1] left or right quad

        void main()
        {
            vec2 offset[2] = vec2[2]( vec2(-0.5, 0.0), vec2(0.5,0.0) ) ;
            gl_Position = vec4( in_pos.xy * vec2(0.85) + offset[u_quad], 0.0, 1.0 ) ;
            var_tx = sign( in_pos.xy ) * vec2( 0.5 ) + vec2( 0.5 ) ;
        }",
        r"
        #version 140
        in vec2 var_tx ;
        layout(location = 0 ) out vec4 out_color ;

        uniform sampler2DArray u_tex ;
        uniform int u_quad ; // in [0,1] left or right quad
        uniform int u_texture ; // choosing the slice in u_tex

        void main()
        {
            vec2 uv = fract( var_tx * 2.0 ) ;
            int quadrant = int( dot( floor(var_tx*2.0), vec2(1,2) ) ) ;
            int idx = u_quad * u_texture + quadrant * ( 1 - u_quad ) ;
            out_color = texture( u_tex, vec3( uv, float(idx) ) ) ;
        }",
    );

    let hlsl = ShaderSet::new(
        r"
        cbuffer ConstantBuffer : register( b0 )
        {
            int u_quad ;
        }

        struct VS_OUTPUT
        {
            float4 pos : SV_POSITION ;
            float2 tx : TEXCOORD0 ;
        };

        VS_OUTPUT VS( float4 in_pos : POSITION )
        {
            VS_OUTPUT output = (VS_OUTPUT)0 ;
            float2 offset[2] = { float2(-0.5, 0.0), float2(0.5,0.0) };
            output.pos = float4( in_pos.xy * float2(0.85, 0.85) + offset[u_quad], 0.0, 1.0 ) ;
            output.tx = sign( in_pos.xy ) * float2(0.5,0.5) + float2(0.5,0.5);
            return output;
        }",
        r"
        Texture2DArray u_tex : register( t0 ) ;
        SamplerState smp_u_tex : register( s0 ) ;

        cbuffer ConstantBuffer : register( b0 )
        {
            int u_quad ;
            int u_texture ;
        }

        float4 PS( float4 pos : SV_POSITION, float2 tx : TEXCOORD0 ) : SV_Target0
        {
            float2 uv = frac( tx * 2.0 ) ;
            int quadrant = int( dot( floor(tx*float2(2,2)), float2(1,2) ) ) ;
            int idx = u_quad * u_texture + quadrant * (1-u_quad) ;
            return u_tex.Sample( smp_u_tex, float3( uv, float(idx)) ) ;
        }",
    );

    ShaderDescriptor::new("test_variable_array")
        .insert(BackendType::OpenGl, gl)
        .insert(BackendType::D3d11, hlsl)
        .add_vertex_input_binding(VertexAttribute::Position, "in_pos")
        .add_input_binding(BindingPoint::ViewMatrix, "u_view")
        .add_input_binding(BindingPoint::ProjectionMatrix, "u_proj")
        .declare_input("u_tex", VariableKind::Texture)
        .declare_input("u_quad", VariableKind::Int)
        .declare_input("u_texture", VariableKind::Int)
        .declare_input("u_view", VariableKind::Mat4)
        .declare_input("u_proj", VariableKind::Mat4)
}

fn quad_object() -> Result<RenderObjectDescriptor> {
    let mut ro = RenderObjectDescriptor::new("quad");
    ro.link_geometry("quad").link_shader("test_variable_array");

    for quad in 0..2i32 {
        let mut vars = VariableSet::new();
        vars.set("u_tex", VariableValue::texture("image_array"))?;
        vars.set("u_quad", quad)?;
        vars.set("u_texture", 0i32)?;
        ro.add_variable_set(vars);
    }
    Ok(ro)
}

fn report(tag: &str, log: &TraceLog) {
    let draws = log.draws();
    let quads: Vec<i32> = draws
        .iter()
        .filter_map(|draw| {
            draw.bindings.iter().find_map(|b| match (&b.name, &b.value) {
                (name, VariableValue::Int(v)) if name == "u_quad" => Some(*v),
                _ => None,
            })
        })
        .collect();
    log::info!(
        "{tag}: {} draws over {FRAMES} frames, u_quad sequence {:?}",
        draws.len(),
        quads
    );
}

fn main() -> Result<()> {
    khroma_infra::logging::init();

    // One executor per window, one GL and one D3D, behind a single fan-out.
    let (gl_backend, gl_log) = HeadlessBackend::new(BackendType::OpenGl);
    let (dx_backend, dx_log) = HeadlessBackend::new(BackendType::D3d11);
    let graphics = AsyncViews::new(vec![
        AsyncView::spawn(Box::new(gl_backend)),
        AsyncView::spawn(Box::new(dx_backend)),
    ]);

    let mut camera = PinholeCamera::new();
    camera.look_at(
        Vec3::new(2500.0, 1000.0, 1000.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
    );
    // The resize handler would do the same with the live window size.
    camera.perspective_fov(
        degrees_to_radians(90.0),
        WINDOW_SIZE.0 as f32 / WINDOW_SIZE.1 as f32,
        1.0,
        10_000.0,
    );

    let root_states = root_render_states();
    graphics.configure(root_states.clone());
    graphics.configure(quad_geometry()?);

    let image = array_image();
    let max_textures = image.image.layer_count().saturating_sub(1) as i32;
    graphics.configure(image);

    graphics.configure(quad_shader());

    let mut ro = quad_object()?;
    graphics.configure(ro.clone());

    for frame in 0..FRAMES {
        // The tool overlay would drive this slider; here it cycles one
        // slice per frame within the imported range.
        let used_texture = frame as i32 % (max_textures + 1);

        ro.for_each_variable_set(|_, vars| {
            if let Err(err) = vars.set("u_texture", used_texture) {
                log::warn!("u_texture write rejected: {err}");
            }
        });
        graphics.update(ro.clone());

        graphics.prepare_frame(camera.view_info());
        graphics.use_states(&root_states, 0);

        // Left quad, then right quad.
        graphics.render("quad", &RenderDetail::with_varset(0));
        graphics.render("quad", &RenderDetail::with_varset(1));

        // Restore window defaults for whatever renders after us.
        graphics.use_states(&StateSetDescriptor::default(), 10);
    }

    graphics.wait_idle();
    report("gl view", &gl_log);
    report("d3d11 view", &dx_log);

    Ok(())
}
