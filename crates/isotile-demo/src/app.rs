use anyhow::{Context, Result};

use isotile_engine::camera::Camera;
use isotile_engine::coords::{Color, Vec2};
use isotile_engine::core::{App, AppControl, FrameCtx};
use isotile_engine::device::Gpu;
use isotile_engine::input::Key;
use isotile_engine::render::{BatchBackend, BatchRenderer, GpuPrograms, Texture, UniformSlot};

use crate::config::DemoConfig;
use crate::tiles::{IsoGrid, TileMap, TileSheet};

/// The isometric tile demo.
///
/// Each frame draws the map back to front as textured tiles, then outlines
/// the map and the tile under the pointer with lines.
pub struct TileDemo {
    config: DemoConfig,
    camera: Camera,
    sheet: TileSheet,
    map: TileMap,
    grid: IsoGrid,

    gfx: Option<Graphics>,
}

struct Graphics {
    programs: GpuPrograms,
    renderer: BatchRenderer,
}

impl TileDemo {
    pub fn new(config: DemoConfig) -> Self {
        let sheet = TileSheet::new(config.sheet_columns, config.sheet_rows);
        let map = TileMap::generate(
            config.map_columns,
            config.map_rows,
            &config.ground_tiles,
            config.map_seed,
        );

        Self {
            config,
            camera: Camera::default(),
            sheet,
            map,
            grid: IsoGrid::new(Vec2::ONE),
            gfx: None,
        }
    }

    fn hovered_tile(&self, pointer: Option<Vec2>, ctx: &FrameCtx<'_, '_>) -> Option<(i32, i32)> {
        let world = self.camera.screen_to_world(pointer?, ctx.window.viewport());
        let (col, row) = self.grid.from_world(world);
        self.map.contains(col, row).then_some((col, row))
    }
}

impl App for TileDemo {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let (device, queue) = (gpu.device(), gpu.queue());

        let texture = Texture::from_path(device, queue, &self.config.texture_path, self.config.texture)
            .context("failed to load the tile sheet")?;

        let tile_px = self.sheet.tile_pixels(texture.width(), texture.height());
        anyhow::ensure!(
            tile_px.x > 0.0 && tile_px.y > 0.0,
            "{}x{} sheet is too small for {}x{} tiles",
            texture.width(),
            texture.height(),
            self.config.sheet_columns,
            self.config.sheet_rows
        );
        self.grid = IsoGrid::new(tile_px * self.config.tile_scale);
        self.camera.position = self.map.center(&self.grid);

        let mut programs = GpuPrograms::new(device, queue, gpu.surface_format(), self.config.batch)?;
        programs.bind_texture(device, &texture);
        let renderer = BatchRenderer::init(&programs, self.config.batch)?;

        log::info!(
            "tile demo ready: {}x{} map, {}x{} px tiles",
            self.map.columns(),
            self.map.rows(),
            tile_px.x,
            tile_px.y
        );

        self.gfx = Some(Graphics { programs, renderer });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time.dt);
        let hovered = self.hovered_tile(ctx.input.pointer_pos, ctx);

        let Some(gfx) = self.gfx.as_mut() else {
            return AppControl::Continue;
        };

        let camera = &self.camera;
        let (grid, map, sheet) = (&self.grid, &self.map, &self.sheet);
        let config = &self.config;

        ctx.render(config.clear_color, |rctx, target| {
            let Graphics { programs, renderer, .. } = gfx;
            let mut pass = programs.pass(rctx, target);
            let resolution = rctx.resolution();

            renderer.use_fill();
            set_frame_uniforms(renderer, &mut pass, resolution, camera);
            for (col, row, tile) in map.back_to_front() {
                let (uv, uv_size) = sheet.uv(tile);
                renderer.textured_rect(
                    grid.sprite_origin(col, row),
                    grid.tile_size(),
                    uv,
                    uv_size,
                    Color::white(),
                );
            }
            let tiles_drawn = renderer.flush(&mut pass);

            renderer.use_lines();
            set_frame_uniforms(renderer, &mut pass, resolution, camera);
            outline(renderer, map.outline(grid), config.map_outline_color);
            if let Some((col, row)) = hovered {
                outline(renderer, grid.diamond(col, row), config.hover_color);
            }
            let lines_drawn = renderer.line_flush(&mut pass);

            log::trace!("frame: {tiles_drawn} tile vertices, {lines_drawn} line vertices");
        })
    }
}

fn set_frame_uniforms(
    renderer: &mut BatchRenderer,
    backend: &mut impl BatchBackend,
    resolution: Vec2,
    camera: &Camera,
) {
    renderer.set_uniform(backend, UniformSlot::Resolution, resolution);
    renderer.set_uniform(backend, UniformSlot::CameraPos, camera.position);
    renderer.set_uniform(backend, UniformSlot::CameraZoom, camera.zoom());
}

/// Closed polygon through `points`.
fn outline(renderer: &mut BatchRenderer, points: [Vec2; 4], color: Color) {
    for i in 0..points.len() {
        let next = points[(i + 1) % points.len()];
        renderer.line(points[i], next, color, color);
    }
}
