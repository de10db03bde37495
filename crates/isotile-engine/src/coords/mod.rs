//! Geometry types shared by the renderer, camera and demo code.
//!
//! World space:
//! - origin top-left of the world, +X right, +Y down
//! - the camera maps world units to logical pixels in the vertex shader

mod rect;
mod vec2;
mod vec4;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use vec4::{Color, Vec4};
pub use viewport::Viewport;
