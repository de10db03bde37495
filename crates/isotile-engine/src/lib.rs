//! isotile engine crate.
//!
//! Platform + GPU runtime and the immediate-mode batch renderer used by the
//! isometric tile demo.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod camera;
