//! Immediate-mode batch rendering.
//!
//! Draw calls append vertices to a CPU batch; `flush` uploads the batch and
//! issues one GPU draw for the whole thing. Two programs exist: a textured
//! triangle program (`Fill`) and a flat-colored line program (`Line`).
//!
//! Convention:
//! - Geometry is in world units; the vertex shader applies the camera
//!   (`camera_pos` at screen center, scaled by `camera_zoom`) and converts
//!   logical pixels to NDC using `resolution`.
//! - Screen space is top-left origin, +Y down.

mod backend;
mod batch;
mod ctx;
mod programs;
mod renderer;
mod texture;
mod uniforms;
mod vertex;

pub use backend::{BatchBackend, Program, UniformMapping};
pub use batch::VertexBatch;
pub use ctx::{RenderCtx, RenderTarget};
pub use programs::{GpuPass, GpuPrograms};
pub use renderer::{BatchConfig, BatchRenderer};
pub use texture::{Texture, TextureOptions};
pub use uniforms::{UniformLocation, UniformSlot, UniformTable, UniformValue};
pub use vertex::{LineVertex, Vertex, UNTEXTURED_UV};
