//! Frame timing.
//!
//! - `FrameClock`: clamped delta time, one tick per presented frame
//! - `FramePacer`: fixed target frame duration for the event loop

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::FramePacer;
