use std::collections::BTreeSet;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Vec2, Viewport};
use crate::shader::{ShaderError, ShaderProgram};
use crate::texture::GpuTexture;

use super::{RenderCtx, RenderTarget};

/// One textured rectangle in canvas pixels.
///
/// The whole bound texture is stretched over `rect`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Sprite {
    pub rect: Rect,
}

impl Sprite {
    #[inline]
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// A sprite with its top-left corner at `pos`.
    #[inline]
    pub const fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(Rect::from_origin_size(pos, size))
    }
}

/// Draws sprites sampling a single texture.
///
/// Geometry is a shared unit quad; each sprite is one instance carrying its
/// origin and size. Canvas pixels are mapped to NDC in the vertex shader, so
/// the canvas always covers the full render target.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    canvas_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    canvas: Viewport,
}

impl SpriteRenderer {
    pub fn new(
        ctx: &RenderCtx<'_>,
        program: &ShaderProgram,
        texture: &GpuTexture,
        canvas: Viewport,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            canvas.is_valid(),
            "invalid canvas size {}x{}",
            canvas.width,
            canvas.height
        );
        check_interface(program.vertex_inputs(), program.resource_bindings())?;

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scroll sprite bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<CanvasUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scroll sprite pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("scroll sprite pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: program.vertex_module(),
                    entry_point: Some(program.vertex_entry()),
                    compilation_options: Default::default(),
                    buffers: &[SpriteVertex::layout(), SpriteInstance::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: program.fragment_module(),
                    entry_point: Some(program.fragment_entry()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });
        if let Some(err) = pollster::block_on(scope.pop()) {
            anyhow::bail!("failed to create sprite pipeline: {err}");
        }

        let canvas_ubo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scroll sprite canvas ubo"),
                contents: bytemuck::bytes_of(&CanvasUniform::new(canvas)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scroll sprite bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: canvas_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        let quad_vbo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scroll sprite quad vbo"),
                contents: bytemuck::cast_slice(&SPRITE_QUAD),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let quad_ibo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scroll sprite quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "sprite renderer ready: {:?}, canvas {}x{}",
            ctx.surface_format,
            canvas.width,
            canvas.height
        );

        Ok(Self {
            pipeline,
            bind_group,
            canvas_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
            canvas,
        })
    }

    #[inline]
    pub fn canvas(&self) -> Viewport {
        self.canvas
    }

    /// Changes the virtual resolution sprites are positioned in.
    pub fn set_canvas(&mut self, canvas: Viewport) {
        if !canvas.is_valid() {
            log::debug!(
                "SpriteRenderer: ignoring invalid canvas {}x{}",
                canvas.width,
                canvas.height
            );
            return;
        }
        self.canvas = canvas;
    }

    /// Draws `sprites` over whatever `target` already holds.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, sprites: &[Sprite]) {
        let instances = build_instances(sprites);
        if instances.is_empty() {
            return;
        }

        ctx.queue
            .write_buffer(&self.canvas_ubo, 0, bytemuck::bytes_of(&CanvasUniform::new(self.canvas)));
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scroll sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instances.len() as u32);
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = instance_capacity_for(required_instances);
        let new_size = (new_cap * std::mem::size_of::<SpriteInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scroll sprite instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Vertex `@location`s fed by [`SpriteVertex`] and `SpriteInstance`.
const SPRITE_LOCATIONS: [u32; 4] = [0, 1, 2, 3];

/// `(group, binding)` of the canvas uniform, texture and sampler.
const SPRITE_BINDINGS: [(u32, u32); 3] = [(0, 0), (0, 1), (0, 2)];

/// Rejects programs that read inputs or resources the sprite pipeline does
/// not provide.
fn check_interface(
    vertex_inputs: &BTreeSet<u32>,
    resource_bindings: &BTreeSet<(u32, u32)>,
) -> Result<(), ShaderError> {
    let mut problems = Vec::new();

    for loc in vertex_inputs.iter().filter(|l| !SPRITE_LOCATIONS.contains(l)) {
        problems.push(format!(
            "vertex input @location({loc}) is not provided by the sprite buffers (0..=3)"
        ));
    }
    for (group, binding) in resource_bindings
        .iter()
        .filter(|b| !SPRITE_BINDINGS.contains(b))
    {
        problems.push(format!(
            "@group({group}) @binding({binding}) is not in the sprite bind group"
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ShaderError::Link {
            log: problems.join("\n"),
        })
    }
}

fn instance_capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(64)
}

/// Converts sprites to GPU instances in draw order.
///
/// Rects are normalized first; empty or non-finite ones are dropped.
fn build_instances(sprites: &[Sprite]) -> Vec<SpriteInstance> {
    sprites
        .iter()
        .map(|s| s.rect.normalized())
        .filter(|r| r.is_finite() && !r.is_empty())
        .map(|r| SpriteInstance {
            origin: r.origin.to_array(),
            size: r.size.to_array(),
        })
        .collect()
}

/// Unit-quad vertex: position and texture coordinate, interleaved.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Top-left, top-right, bottom-right, bottom-left. `uv == pos`, so image row 0
/// lands at the top of the sprite.
pub const SPRITE_QUAD: [SpriteVertex; 4] = [
    SpriteVertex { pos: [0.0, 0.0], uv: [0.0, 0.0] },
    SpriteVertex { pos: [1.0, 0.0], uv: [1.0, 0.0] },
    SpriteVertex { pos: [1.0, 1.0], uv: [1.0, 1.0] },
    SpriteVertex { pos: [0.0, 1.0], uv: [0.0, 1.0] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SpriteInstance {
    origin: [f32; 2],
    size: [f32; 2],
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        2 => Float32x2, // origin
        3 => Float32x2  // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Matches `Canvas` in `sprite.vert.wgsl`; padded to 16 bytes for uniform layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CanvasUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

impl CanvasUniform {
    fn new(canvas: Viewport) -> Self {
        Self {
            size: [canvas.width.max(1.0), canvas.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{compile_stage, ShaderSource, ShaderStage};

    #[test]
    fn vertex_layout_is_two_plus_two() {
        let layout = SpriteVertex::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8]);
    }

    #[test]
    fn instance_layout_follows_vertex_locations() {
        let layout = SpriteInstance::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let locs: Vec<_> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locs, vec![2, 3]);
    }

    #[test]
    fn canvas_uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<CanvasUniform>(), 16);
        let u = CanvasUniform::new(Viewport::new(256.0, 240.0));
        assert_eq!(u.size, [256.0, 240.0]);
    }

    #[test]
    fn quad_covers_unit_square_in_two_triangles() {
        for v in SPRITE_QUAD {
            assert_eq!(v.pos, v.uv);
        }
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < SPRITE_QUAD.len()));
    }

    #[test]
    fn instances_skip_degenerate_sprites() {
        let sprites = [
            Sprite::at(Vec2::new(100.0, 100.0), Vec2::new(16.0, 16.0)),
            Sprite::new(Rect::new(0.0, 0.0, 0.0, 16.0)),
            Sprite::new(Rect::new(f32::NAN, 0.0, 4.0, 4.0)),
            Sprite::new(Rect::new(10.0, 10.0, -4.0, 2.0)),
        ];

        let inst = build_instances(&sprites);
        assert_eq!(
            inst,
            vec![
                SpriteInstance { origin: [100.0, 100.0], size: [16.0, 16.0] },
                SpriteInstance { origin: [6.0, 10.0], size: [4.0, 2.0] },
            ]
        );
    }

    fn vertex_stage(code: &str) -> crate::shader::CompiledStage {
        let src = ShaderSource::new(ShaderStage::Vertex, "test.vert", code);
        compile_stage(&src).unwrap()
    }

    #[test]
    fn builtin_program_fits_sprite_pipeline() {
        let v = compile_stage(&ShaderSource::builtin(ShaderStage::Vertex)).unwrap();
        let f = compile_stage(&ShaderSource::builtin(ShaderStage::Fragment)).unwrap();
        let bindings = v
            .resource_bindings()
            .union(&f.resource_bindings())
            .copied()
            .collect();

        assert!(check_interface(&v.input_locations(), &bindings).is_ok());
    }

    #[test]
    fn unprovided_vertex_input_rejected() {
        let v = vertex_stage(
            r#"
            @vertex
            fn main(@location(7) p: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(p, 0.0, 1.0);
            }
        "#,
        );

        match check_interface(&v.input_locations(), &v.resource_bindings()).unwrap_err() {
            ShaderError::Link { log } => assert!(log.contains("@location(7)"), "{log}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn foreign_binding_rejected() {
        let v = vertex_stage(
            r#"
            @group(1) @binding(0) var<uniform> offset: vec4<f32>;

            @vertex
            fn main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(p, 0.0, 1.0) + offset;
            }
        "#,
        );

        match check_interface(&v.input_locations(), &v.resource_bindings()).unwrap_err() {
            ShaderError::Link { log } => assert!(log.contains("@group(1) @binding(0)"), "{log}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn capacity_grows_in_powers_of_two() {
        assert_eq!(instance_capacity_for(1), 64);
        assert_eq!(instance_capacity_for(64), 64);
        assert_eq!(instance_capacity_for(65), 128);
        assert_eq!(instance_capacity_for(300), 512);
    }
}
