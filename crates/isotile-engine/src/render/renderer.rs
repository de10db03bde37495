use anyhow::Result;
use bytemuck::Pod;

use crate::coords::{Color, Rect, Vec2};

use super::backend::{BatchBackend, Program, UniformMapping};
use super::batch::VertexBatch;
use super::uniforms::{UniformSlot, UniformTable, UniformValue};
use super::vertex::{LineVertex, Vertex, UNTEXTURED_UV};

/// Vertex capacities of the two batches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Fill vertices per frame (a multiple of 3 keeps whole triangles).
    pub vertex_capacity: usize,
    /// Line vertices per frame (a multiple of 2 keeps whole segments).
    pub line_vertex_capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 3 * 600 * 1024,
            line_vertex_capacity: 2 * 600 * 1024,
        }
    }
}

/// Immediate-mode 2D batch renderer.
///
/// Primitive calls append vertices on the CPU. `flush` uploads the batch,
/// issues one draw call and empties it. The fill and line pipelines are
/// independent: each has its own batch, uniform table and flush.
///
/// Per frame:
/// 1. `use_fill` then `set_uniform` for every [`UniformSlot`]
/// 2. primitive calls, then `flush`
/// 3. same with `use_lines` / `line` / `line_flush`
///
/// Flushing any number of times per frame is fine; the backend places each
/// upload.
///
/// Uniform values are not cached; set all three after activating a program.
pub struct BatchRenderer {
    fill: VertexBatch<Vertex>,
    lines: VertexBatch<LineVertex>,

    fill_uniforms: UniformTable,
    line_uniforms: UniformTable,
    active: Program,

    // Vertex count of the last upload not yet drawn.
    fill_synced: Option<u32>,
    line_synced: Option<u32>,
}

impl BatchRenderer {
    /// Resolves the uniform locations of both programs and allocates the
    /// vertex batches.
    pub fn init(mapping: &impl UniformMapping, config: BatchConfig) -> Result<Self> {
        anyhow::ensure!(
            u32::try_from(config.vertex_capacity).is_ok()
                && u32::try_from(config.line_vertex_capacity).is_ok(),
            "vertex capacities must fit in u32: {config:?}"
        );

        let fill_uniforms = UniformTable::resolve(mapping, Program::Fill)?;
        let line_uniforms = UniformTable::resolve(mapping, Program::Line)?;

        log::info!(
            "batch renderer: {} fill / {} line vertices per frame",
            config.vertex_capacity,
            config.line_vertex_capacity
        );

        Ok(Self {
            fill: VertexBatch::with_capacity(config.vertex_capacity),
            lines: VertexBatch::with_capacity(config.line_vertex_capacity),
            fill_uniforms,
            line_uniforms,
            active: Program::Fill,
            fill_synced: None,
            line_synced: None,
        })
    }

    // ── activation + uniforms ─────────────────────────────────────────────

    /// Makes the fill program current for `set_uniform`.
    pub fn use_fill(&mut self) {
        self.active = Program::Fill;
    }

    /// Makes the line program current for `set_uniform`.
    pub fn use_lines(&mut self) {
        self.active = Program::Line;
    }

    pub fn active_program(&self) -> Program {
        self.active
    }

    /// Writes `value` to `slot` of the current program.
    ///
    /// Each draw uses the values set before it, so a program can be drawn
    /// several times per frame with different uniforms.
    pub fn set_uniform(
        &mut self,
        backend: &mut impl BatchBackend,
        slot: UniformSlot,
        value: impl Into<UniformValue>,
    ) {
        let value = value.into();
        UniformTable::check(slot, value);

        let table = match self.active {
            Program::Fill => &self.fill_uniforms,
            Program::Line => &self.line_uniforms,
        };
        backend.write_uniform(self.active, table.location(slot), value);
    }

    // ── fill primitives ───────────────────────────────────────────────────

    /// Appends one fill vertex.
    ///
    /// # Panics
    /// If the fill batch is full.
    #[inline]
    pub fn vertex(&mut self, pos: Vec2, uv: Vec2, color: Color) {
        self.fill.push(Vertex::new(pos, uv, color));
    }

    /// Appends one triangle in the given winding order.
    pub fn triangle(&mut self, p: [Vec2; 3], uv: [Vec2; 3], c: [Color; 3]) {
        for i in 0..3 {
            self.vertex(p[i], uv[i], c[i]);
        }
    }

    /// Appends a quad as triangles `{p0, p1, p2}` and `{p1, p3, p2}`.
    ///
    /// Corners are top-left, top-right, bottom-left, bottom-right. Convexity
    /// and winding are not checked.
    pub fn quad(&mut self, p: [Vec2; 4], uv: [Vec2; 4], c: [Color; 4]) {
        self.triangle([p[0], p[1], p[2]], [uv[0], uv[1], uv[2]], [c[0], c[1], c[2]]);
        self.triangle([p[1], p[3], p[2]], [uv[1], uv[3], uv[2]], [c[1], c[3], c[2]]);
    }

    /// Solid, untextured axis-aligned rectangle.
    pub fn rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let corners = Rect::from_origin_size(origin, size).corners();
        self.quad(corners, [UNTEXTURED_UV; 4], [color; 4]);
    }

    /// Rectangle sampling the sub-rectangle `uv_origin .. uv_origin + uv_size`
    /// of the bound texture, modulated by `color`.
    pub fn textured_rect(
        &mut self,
        origin: Vec2,
        size: Vec2,
        uv_origin: Vec2,
        uv_size: Vec2,
        color: Color,
    ) {
        let corners = Rect::from_origin_size(origin, size).corners();
        let uvs = Rect::from_origin_size(uv_origin, uv_size).corners();
        self.quad(corners, uvs, [color; 4]);
    }

    /// Solid rectangle centered on `center`.
    pub fn rect_centered(&mut self, center: Vec2, size: Vec2, color: Color) {
        let r = Rect::centered(center, size);
        self.rect(r.origin, r.size, color);
    }

    // ── line primitives ───────────────────────────────────────────────────

    /// Appends one line vertex.
    ///
    /// # Panics
    /// If the line batch is full.
    #[inline]
    pub fn line_vertex(&mut self, pos: Vec2, color: Color) {
        self.lines.push(LineVertex::new(pos, color));
    }

    /// Appends one segment from `p0` to `p1`, colors interpolated.
    pub fn line(&mut self, p0: Vec2, p1: Vec2, c0: Color, c1: Color) {
        self.line_vertex(p0, c0);
        self.line_vertex(p1, c1);
    }

    // ── fill sync / draw / flush ──────────────────────────────────────────

    /// Uploads the pending fill vertices `[0, len)`.
    pub fn sync(&mut self, backend: &mut impl BatchBackend) {
        sync_batch(&self.fill, &mut self.fill_synced, Program::Fill, backend);
    }

    /// Draws the last synced fill vertices. Returns the vertex count drawn.
    pub fn draw(&mut self, backend: &mut impl BatchBackend) -> u32 {
        draw_synced(&mut self.fill_synced, Program::Fill, backend)
    }

    /// `sync` + `draw`, then empties the fill batch.
    pub fn flush(&mut self, backend: &mut impl BatchBackend) -> u32 {
        self.sync(backend);
        let drawn = self.draw(backend);
        self.fill.clear();
        drawn
    }

    // ── line sync / draw / flush ──────────────────────────────────────────

    pub fn line_sync(&mut self, backend: &mut impl BatchBackend) {
        sync_batch(&self.lines, &mut self.line_synced, Program::Line, backend);
    }

    pub fn line_draw(&mut self, backend: &mut impl BatchBackend) -> u32 {
        draw_synced(&mut self.line_synced, Program::Line, backend)
    }

    pub fn line_flush(&mut self, backend: &mut impl BatchBackend) -> u32 {
        self.line_sync(backend);
        let drawn = self.line_draw(backend);
        self.lines.clear();
        drawn
    }

    // ── inspection ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.fill.len()
    }

    pub fn line_vertex_count(&self) -> usize {
        self.lines.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.fill.as_slice()
    }

    pub fn line_vertices(&self) -> &[LineVertex] {
        self.lines.as_slice()
    }
}

fn sync_batch<V: Pod>(
    batch: &VertexBatch<V>,
    synced: &mut Option<u32>,
    program: Program,
    backend: &mut impl BatchBackend,
) {
    if !batch.is_empty() {
        backend.upload(program, batch.as_bytes());
    }
    *synced = Some(batch.len() as u32);
}

fn draw_synced(synced: &mut Option<u32>, program: Program, backend: &mut impl BatchBackend) -> u32 {
    debug_assert!(synced.is_some(), "{program:?} draw without a preceding sync");
    let count = synced.take().unwrap_or(0);
    backend.draw(program, count);
    count
}
