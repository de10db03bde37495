use std::ops::Range;

use anyhow::{Context, Result};

use crate::render::{RenderCtx, RenderTarget};

use super::backend::{BatchBackend, Program, UniformMapping};
use super::renderer::BatchConfig;
use super::texture::Texture;
use super::uniforms::{UniformBlock, UniformLocation, UniformValue};
use super::vertex::{LineVertex, Vertex};

/// Draws per program between queue submissions. Each draw snapshots its
/// uniforms into its own slot of the program's uniform buffer.
const UNIFORM_SLOTS: u32 = 256;

/// GPU side of the batch renderer: both pipelines, their uniform buffers and
/// fixed-size vertex buffers, and the texture bound to the fill program.
///
/// Shader compilation happens in [`GpuPrograms::new`]. wgpu reports WGSL or
/// pipeline validation failures through the device's uncaptured-error handler,
/// which aborts the process with the diagnostic; there is no recovery path.
pub struct GpuPrograms {
    fill: ProgramResources,
    line: ProgramResources,

    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
}

struct ProgramResources {
    pipeline: wgpu::RenderPipeline,
    uniform_bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    uniform_stride: u64,
    vertex_buffer: wgpu::Buffer,
    vertex_stride: u64,
    vertex_capacity: u32,
}

impl GpuPrograms {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: BatchConfig,
    ) -> Result<Self> {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("isotile uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UniformBlock::SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("isotile texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fill_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "isotile fill",
                source: include_str!("shaders/fill.wgsl"),
                layouts: &[&uniform_layout, &texture_layout],
                vertex_layout: Vertex::layout(),
                topology: Program::Fill.topology(),
                format: surface_format,
            },
        );

        let line_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "isotile line",
                source: include_str!("shaders/line.wgsl"),
                layouts: &[&uniform_layout],
                vertex_layout: LineVertex::layout(),
                topology: Program::Line.topology(),
                format: surface_format,
            },
        );

        let fill = ProgramResources::new(
            device,
            "isotile fill",
            fill_pipeline,
            &uniform_layout,
            std::mem::size_of::<Vertex>() as u64,
            config.vertex_capacity,
        )?;
        let line = ProgramResources::new(
            device,
            "isotile line",
            line_pipeline,
            &uniform_layout,
            std::mem::size_of::<LineVertex>() as u64,
            config.line_vertex_capacity,
        )?;

        let white = Texture::white(device, queue)?;
        let texture_bind_group = create_texture_bind_group(device, &texture_layout, &white);

        log::info!("shader programs ready (surface format {surface_format:?})");

        Ok(Self {
            fill,
            line,
            texture_layout,
            texture_bind_group,
        })
    }

    /// Samples `texture` in subsequent fill draws.
    pub fn bind_texture(&mut self, device: &wgpu::Device, texture: &Texture) {
        self.texture_bind_group = create_texture_bind_group(device, &self.texture_layout, texture);
    }

    /// Per-frame backend that records into `target`.
    pub fn pass<'p, 't>(
        &'p self,
        ctx: &'p RenderCtx<'p>,
        target: &'p mut RenderTarget<'t>,
    ) -> GpuPass<'p, 't> {
        GpuPass {
            programs: self,
            ctx,
            target,
            fill: ProgramPass::new(self.fill.vertex_capacity, UNIFORM_SLOTS),
            line: ProgramPass::new(self.line.vertex_capacity, UNIFORM_SLOTS),
        }
    }

    fn resources(&self, program: Program) -> &ProgramResources {
        match program {
            Program::Fill => &self.fill,
            Program::Line => &self.line,
        }
    }
}

impl UniformMapping for GpuPrograms {
    fn uniform_location(&self, _program: Program, name: &str) -> Option<UniformLocation> {
        // Both shaders declare the same `Uniforms` struct.
        UniformBlock::offset_of(name).map(UniformLocation)
    }
}

impl ProgramResources {
    fn new(
        device: &wgpu::Device,
        label: &str,
        pipeline: wgpu::RenderPipeline,
        uniform_layout: &wgpu::BindGroupLayout,
        vertex_stride: u64,
        capacity: usize,
    ) -> Result<Self> {
        let vertex_capacity = u32::try_from(capacity)
            .with_context(|| format!("{label}: {capacity} vertices do not fit in u32"))?;
        let size = vertex_stride * capacity as u64;
        let limits = device.limits();
        let max = limits.max_buffer_size;
        anyhow::ensure!(
            size <= max,
            "{label}: vertex buffer of {size} bytes exceeds the device limit of {max}"
        );

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} vbo")),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_stride =
            UniformBlock::SIZE.next_multiple_of(limits.min_uniform_buffer_offset_alignment as u64);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} ubo")),
            size: uniform_stride * UNIFORM_SLOTS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} uniforms")),
            layout: uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UniformBlock::SIZE),
                }),
            }],
        });

        log::debug!("{label}: {capacity} vertices, {size} byte vertex buffer");

        Ok(Self {
            pipeline,
            uniform_bind_group,
            uniform_buffer,
            uniform_stride,
            vertex_buffer,
            vertex_stride,
            vertex_capacity,
        })
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    source: &'static str,
    layouts: &'a [&'a wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[desc.vertex_layout],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
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
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("isotile texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(texture.sampler()),
            },
        ],
    })
}

/// wgpu implementation of [`BatchBackend`] for one frame.
///
/// Buffer writes go through the queue and land before the next submission,
/// so uploads and uniform snapshots are placed one after another in their
/// buffers. When a program's buffers are full, the commands recorded so far
/// are submitted and that program starts over at the front. Each draw opens
/// its own render pass that loads (not clears) the target.
pub struct GpuPass<'p, 't> {
    programs: &'p GpuPrograms,
    ctx: &'p RenderCtx<'p>,
    target: &'p mut RenderTarget<'t>,

    fill: ProgramPass,
    line: ProgramPass,
}

impl GpuPass<'_, '_> {
    fn state(&mut self, program: Program) -> &mut ProgramPass {
        match program {
            Program::Fill => &mut self.fill,
            Program::Line => &mut self.line,
        }
    }

    /// Submits everything recorded so far and rewinds `program`'s buffers.
    fn submit_recorded(&mut self, program: Program) {
        let fresh = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("isotile frame encoder"),
        });
        let recorded = std::mem::replace(&mut *self.target.encoder, fresh);
        self.ctx.queue.submit(std::iter::once(recorded.finish()));
        self.state(program).rewind();

        log::debug!("{program:?}: GPU buffers full, submitted recorded draws");
    }
}

impl BatchBackend for GpuPass<'_, '_> {
    fn write_uniform(&mut self, program: Program, location: UniformLocation, value: UniformValue) {
        if !self.state(program).uniforms.set(location, value) {
            log::warn!(
                "{program:?}: uniform at byte {} is outside the {}-byte block",
                location.0,
                UniformBlock::SIZE
            );
        }
    }

    fn upload(&mut self, program: Program, bytes: &[u8]) {
        let programs = self.programs;
        let res = programs.resources(program);
        let len = (bytes.len() as u64 / res.vertex_stride) as u32;

        let reserved = match self.state(program).reserve(len) {
            Some(pending) => Some(pending),
            None => {
                self.submit_recorded(program);
                self.state(program).reserve(len)
            }
        };
        let Some(pending) = reserved else {
            log::error!(
                "{program:?}: {len} vertices exceed the {}-vertex GPU buffer, upload dropped",
                res.vertex_capacity
            );
            return;
        };

        let offset = pending.vertices.start as u64 * res.vertex_stride;
        self.ctx.queue.write_buffer(&res.vertex_buffer, offset, bytes);
        self.state(program).pending = Some(pending);
    }

    fn draw(&mut self, program: Program, count: u32) {
        let programs = self.programs;
        let res = programs.resources(program);
        let state = self.state(program);
        let (pending, uniforms) = (state.pending.take(), state.uniforms);

        if count == 0 {
            log::trace!("{program:?}: empty batch, draw skipped");
            return;
        }
        let Some(pending) = pending else {
            log::warn!("{program:?}: draw of {count} vertices without an upload, skipped");
            return;
        };

        let uniform_offset = pending.uniform_slot as u64 * res.uniform_stride;
        self.ctx
            .queue
            .write_buffer(&res.uniform_buffer, uniform_offset, uniforms.as_bytes());

        let first = pending.vertices.start;
        let vertices = first..first + count.min(pending.vertices.end - first);

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("isotile batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
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

        rpass.set_pipeline(&res.pipeline);
        rpass.set_bind_group(0, &res.uniform_bind_group, &[uniform_offset as u32]);
        if program == Program::Fill {
            rpass.set_bind_group(1, &programs.texture_bind_group, &[]);
        }
        rpass.set_vertex_buffer(0, res.vertex_buffer.slice(..));

        log::trace!("{program:?}: drawing vertices {vertices:?}");
        rpass.draw(vertices, 0..1);
    }
}

/// One program's share of a [`GpuPass`].
#[derive(Debug)]
struct ProgramPass {
    vertices: FrameCursor,
    uniform_slots: FrameCursor,
    uniforms: UniformSnapshot,
    pending: Option<PendingDraw>,
}

/// Where the last upload landed and the uniform slot its draw will use.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingDraw {
    vertices: Range<u32>,
    uniform_slot: u32,
}

impl ProgramPass {
    fn new(vertex_capacity: u32, uniform_slots: u32) -> Self {
        Self {
            vertices: FrameCursor::new(vertex_capacity),
            uniform_slots: FrameCursor::new(uniform_slots),
            uniforms: UniformSnapshot::default(),
            pending: None,
        }
    }

    /// Room for `len` vertices and one draw, or `None` until the buffers are
    /// rewound.
    fn reserve(&mut self, len: u32) -> Option<PendingDraw> {
        let vertices = self.vertices.claim(len)?;
        let slot = self.uniform_slots.claim(1)?;
        Some(PendingDraw {
            vertices,
            uniform_slot: slot.start,
        })
    }

    fn rewind(&mut self) {
        self.vertices.rewind();
        self.uniform_slots.rewind();
        self.pending = None;
    }
}

/// Forward-only allocator over `capacity` units of a GPU buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameCursor {
    capacity: u32,
    offset: u32,
}

impl FrameCursor {
    fn new(capacity: u32) -> Self {
        Self { capacity, offset: 0 }
    }

    fn claim(&mut self, len: u32) -> Option<Range<u32>> {
        let end = self.offset.checked_add(len).filter(|&end| end <= self.capacity)?;
        let range = self.offset..end;
        self.offset = end;
        Some(range)
    }

    fn rewind(&mut self) {
        self.offset = 0;
    }
}

/// CPU copy of a program's uniform block.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct UniformSnapshot([u8; UniformBlock::SIZE as usize]);

impl UniformSnapshot {
    /// Returns `false` if `value` does not fit at `location`.
    fn set(&mut self, location: UniformLocation, value: UniformValue) -> bool {
        let bytes = value.to_bytes();
        let start = location.0 as usize;
        match self.0.get_mut(start..start + bytes.len()) {
            Some(dst) => {
                dst.copy_from_slice(&bytes);
                true
            }
            None => false,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn location(name: &str) -> UniformLocation {
        UniformLocation(UniformBlock::offset_of(name).unwrap())
    }

    fn float_at(u: &UniformSnapshot, offset: usize) -> f32 {
        f32::from_ne_bytes(u.as_bytes()[offset..offset + 4].try_into().unwrap())
    }

    // ── cursors ───────────────────────────────────────────────────────────

    #[test]
    fn cursor_claims_back_to_back() {
        let mut c = FrameCursor::new(10);
        assert_eq!(c.claim(6), Some(0..6));
        assert_eq!(c.claim(4), Some(6..10));
        assert_eq!(c.claim(0), Some(10..10));
        assert_eq!(c.claim(1), None);
    }

    #[test]
    fn oversized_claim_leaves_cursor_alone() {
        let mut c = FrameCursor::new(10);
        c.claim(6);
        assert_eq!(c.claim(6), None);
        assert_eq!(c.claim(4), Some(6..10));
    }

    #[test]
    fn repeated_uploads_fit_after_rewind() {
        let mut pass = ProgramPass::new(10, UNIFORM_SLOTS);
        let first = pass.reserve(6).unwrap();
        assert_eq!(first.vertices, 0..6);
        assert!(pass.reserve(6).is_none());

        pass.rewind();
        let again = pass.reserve(6).unwrap();
        assert_eq!(again.vertices, 0..6);
        assert_eq!(again.uniform_slot, 0);
    }

    #[test]
    fn every_draw_gets_its_own_uniform_slot() {
        let mut pass = ProgramPass::new(100, 2);
        assert_eq!(pass.reserve(3).unwrap().uniform_slot, 0);
        assert_eq!(pass.reserve(3).unwrap().uniform_slot, 1);
        // out of slots even though vertices remain
        assert!(pass.reserve(3).is_none());
    }

    // ── uniform snapshots ─────────────────────────────────────────────────

    #[test]
    fn snapshot_keeps_each_member_at_its_offset() {
        let mut u = UniformSnapshot::default();
        assert!(u.set(location("resolution"), Vec2::new(800.0, 600.0).into()));
        assert!(u.set(location("camera_zoom"), 2.0f32.into()));

        assert_eq!(float_at(&u, 0), 800.0);
        assert_eq!(float_at(&u, 4), 600.0);
        assert_eq!(float_at(&u, 16), 2.0);
    }

    #[test]
    fn snapshots_taken_between_writes_differ() {
        let mut u = UniformSnapshot::default();
        u.set(location("camera_zoom"), 1.0f32.into());
        let first = u;
        u.set(location("camera_zoom"), 3.0f32.into());

        assert_eq!(float_at(&first, 16), 1.0);
        assert_eq!(float_at(&u, 16), 3.0);
    }

    #[test]
    fn snapshot_rejects_out_of_block_location() {
        let mut u = UniformSnapshot::default();
        assert!(!u.set(UniformLocation(UniformBlock::SIZE - 4), Vec2::ZERO.into()));
        assert_eq!(u, UniformSnapshot::default());
    }
}
