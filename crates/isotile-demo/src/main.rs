//! Isometric tile demo.
//!
//! Expects `tiles.png` (11x10 tile sheet) in the working directory. Pan with
//! W/A/S/D or the arrow keys, zoom with the mouse wheel, quit with Escape.

mod app;
mod config;
mod tiles;

use anyhow::Result;

use isotile_engine::device::GpuInit;
use isotile_engine::logging::{init_logging, LoggingConfig};
use isotile_engine::window::{Runtime, RuntimeConfig};

use crate::app::TileDemo;
use crate::config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig::default();
    log::info!(
        "starting {} ({}x{} @ {} fps)",
        runtime.title,
        runtime.initial_size.width,
        runtime.initial_size.height,
        runtime.target_fps
    );

    Runtime::run(runtime, GpuInit::default(), TileDemo::new(DemoConfig::default()))
}
