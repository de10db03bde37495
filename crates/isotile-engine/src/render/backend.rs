use super::uniforms::{UniformLocation, UniformValue};

/// The two shader programs the batch renderer drives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Program {
    /// Triangle list: rects, quads, triangles.
    Fill,
    /// Line list: independent segments.
    Line,
}

impl Program {
    /// Primitive assembly of the program's pipeline. Line vertices are never
    /// triangulated.
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Program::Fill => wgpu::PrimitiveTopology::TriangleList,
            Program::Line => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// Resolves uniform names to GPU-side locations.
///
/// Queried once per program when the renderer is created.
pub trait UniformMapping {
    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation>;
}

/// GPU operations the batch renderer issues.
///
/// Implemented by [`GpuPass`](super::GpuPass) for wgpu; tests substitute a
/// recording implementation. The backend decides where in its buffers each
/// upload lands.
pub trait BatchBackend {
    /// Sets one uniform of `program` for the draws that follow.
    fn write_uniform(&mut self, program: Program, location: UniformLocation, value: UniformValue);

    /// Uploads the vertex bytes of `program`'s pending batch, replacing the
    /// previous upload as the source of the next draw.
    fn upload(&mut self, program: Program, bytes: &[u8]);

    /// Issues one non-indexed draw over the first `count` vertices of the
    /// last upload, with [`Program::topology`].
    fn draw(&mut self, program: Program, count: u32);
}
