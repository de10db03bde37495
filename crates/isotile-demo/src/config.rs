use std::path::PathBuf;

use isotile_engine::coords::Color;
use isotile_engine::render::{BatchConfig, TextureOptions};

/// Everything the demo needs to know up front.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Tile sheet image, relative to the working directory.
    pub texture_path: PathBuf,
    pub texture: TextureOptions,

    /// Sheet layout: tiles per row and per column.
    pub sheet_columns: u32,
    pub sheet_rows: u32,

    /// Map size in tiles.
    pub map_columns: u32,
    pub map_rows: u32,

    /// Sheet indices the map generator picks from.
    pub ground_tiles: Vec<u32>,
    pub map_seed: u64,

    /// World units per sheet pixel.
    pub tile_scale: f32,

    pub batch: BatchConfig,

    pub clear_color: Color,
    pub map_outline_color: Color,
    pub hover_color: Color,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            texture_path: PathBuf::from("tiles.png"),
            texture: TextureOptions {
                filter: wgpu::FilterMode::Nearest,
                ..TextureOptions::default()
            },
            sheet_columns: 11,
            sheet_rows: 10,
            map_columns: 24,
            map_rows: 24,
            ground_tiles: vec![0, 1, 2, 3],
            map_seed: 0x1507_11e5,
            tile_scale: 4.0,
            batch: BatchConfig::default(),
            clear_color: Color::rgba(0.0, 0.15, 0.3, 1.0),
            map_outline_color: Color::rgba(1.0, 1.0, 1.0, 0.35),
            hover_color: Color::rgba(1.0, 0.85, 0.2, 1.0),
        }
    }
}
