//! Tile sheet slicing, isometric grid math and the demo map.

use isotile_engine::coords::Vec2;

/// A sprite sheet of equally sized tiles, indexed row-major from the top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileSheet {
    columns: u32,
    rows: u32,
}

impl TileSheet {
    pub fn new(columns: u32, rows: u32) -> Self {
        assert!(columns > 0 && rows > 0, "tile sheet needs at least one tile");
        Self { columns, rows }
    }

    pub fn count(&self) -> u32 {
        self.columns * self.rows
    }

    /// UV extent of one tile.
    pub fn uv_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.columns as f32, 1.0 / self.rows as f32)
    }

    /// UV origin and size of tile `index`. Indices past the end wrap.
    pub fn uv(&self, index: u32) -> (Vec2, Vec2) {
        let index = index % self.count();
        let size = self.uv_size();
        let col = index % self.columns;
        let row = index / self.columns;
        (Vec2::new(col as f32 * size.x, row as f32 * size.y), size)
    }

    /// Pixel size of one tile in a sheet of `width` x `height` pixels.
    pub fn tile_pixels(&self, width: u32, height: u32) -> Vec2 {
        Vec2::new(
            (width / self.columns) as f32,
            (height / self.rows) as f32,
        )
    }
}

/// Isometric (2:1 diamond) placement of tiles in world space.
///
/// Column `c` runs down-right, row `r` runs down-left. The top face of a tile
/// is a diamond `tile_size.x` wide and `tile_size.y / 2` tall whose top vertex
/// sits at `to_world(c, r)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IsoGrid {
    tile_size: Vec2,
}

impl IsoGrid {
    pub fn new(tile_size: Vec2) -> Self {
        Self { tile_size }
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    fn step(&self) -> Vec2 {
        Vec2::new(self.tile_size.x / 2.0, self.tile_size.y / 4.0)
    }

    /// Top vertex of the diamond of tile `(col, row)`.
    pub fn to_world(&self, col: i32, row: i32) -> Vec2 {
        let step = self.step();
        Vec2::new((col - row) as f32 * step.x, (col + row) as f32 * step.y)
    }

    /// Top-left corner of the sprite drawn for tile `(col, row)`.
    pub fn sprite_origin(&self, col: i32, row: i32) -> Vec2 {
        self.to_world(col, row) - Vec2::new(self.tile_size.x / 2.0, 0.0)
    }

    /// Tile whose diamond contains `world`.
    pub fn from_world(&self, world: Vec2) -> (i32, i32) {
        let step = self.step();
        let u = world.x / step.x;
        let v = world.y / step.y;
        let col = ((u + v) / 2.0).floor() as i32;
        let row = ((v - u) / 2.0).floor() as i32;
        (col, row)
    }

    /// Diamond vertices of tile `(col, row)`: top, right, bottom, left.
    pub fn diamond(&self, col: i32, row: i32) -> [Vec2; 4] {
        let top = self.to_world(col, row);
        let step = self.step();
        [
            top,
            top + Vec2::new(step.x, step.y),
            top + Vec2::new(0.0, 2.0 * step.y),
            top + Vec2::new(-step.x, step.y),
        ]
    }
}

/// Rectangular map of sheet indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<u32>,
}

impl TileMap {
    /// Fills the map from `palette` with a deterministic pseudo-random pattern.
    pub fn generate(columns: u32, rows: u32, palette: &[u32], seed: u64) -> Self {
        let palette = if palette.is_empty() { &[0][..] } else { palette };
        let mut state = seed | 1;
        let tiles = (0..columns * rows)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                palette[(state % palette.len() as u64) as usize]
            })
            .collect();

        Self { columns, rows, tiles }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        (0..self.columns as i32).contains(&col) && (0..self.rows as i32).contains(&row)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<u32> {
        self.contains(col, row)
            .then(|| self.tiles[(row as u32 * self.columns + col as u32) as usize])
    }

    /// `(col, row, tile)` in painter's order: tiles further back (smaller
    /// `col + row`) first, so nearer sprites overlap them.
    pub fn back_to_front(&self) -> impl Iterator<Item = (i32, i32, u32)> + '_ {
        let (cols, rows) = (self.columns as i32, self.rows as i32);
        (0..(cols + rows - 1).max(0)).flat_map(move |depth| {
            let first = (depth - rows + 1).max(0);
            let last = depth.min(cols - 1);
            (first..=last).filter_map(move |col| {
                let row = depth - col;
                self.get(col, row).map(|tile| (col, row, tile))
            })
        })
    }

    /// World-space outline of the whole map: top, right, bottom, left.
    pub fn outline(&self, grid: &IsoGrid) -> [Vec2; 4] {
        let (last_col, last_row) = (self.columns as i32 - 1, self.rows as i32 - 1);
        [
            grid.diamond(0, 0)[0],
            grid.diamond(last_col, 0)[1],
            grid.diamond(last_col, last_row)[2],
            grid.diamond(0, last_row)[3],
        ]
    }

    /// World point at the middle of the map.
    pub fn center(&self, grid: &IsoGrid) -> Vec2 {
        let [top, _, bottom, _] = self.outline(grid);
        (top + bottom) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sheet ─────────────────────────────────────────────────────────────

    #[test]
    fn sheet_uv_is_row_major() {
        let sheet = TileSheet::new(11, 10);
        let (origin, size) = sheet.uv(12);
        assert_eq!(size, Vec2::new(1.0 / 11.0, 0.1));
        assert_eq!(origin, Vec2::new(1.0 / 11.0, 0.1));
        assert_eq!(sheet.uv(0).0, Vec2::ZERO);
    }

    #[test]
    fn sheet_index_wraps() {
        let sheet = TileSheet::new(11, 10);
        assert_eq!(sheet.uv(110), sheet.uv(0));
    }

    #[test]
    fn sheet_tile_pixels() {
        let sheet = TileSheet::new(11, 10);
        assert_eq!(sheet.tile_pixels(176, 170), Vec2::new(16.0, 17.0));
    }

    // ── grid ──────────────────────────────────────────────────────────────

    #[test]
    fn grid_places_diamonds() {
        let grid = IsoGrid::new(Vec2::new(64.0, 64.0));
        assert_eq!(grid.to_world(0, 0), Vec2::ZERO);
        assert_eq!(grid.to_world(1, 0), Vec2::new(32.0, 16.0));
        assert_eq!(grid.to_world(0, 1), Vec2::new(-32.0, 16.0));
        assert_eq!(grid.to_world(2, 2), Vec2::new(0.0, 64.0));
    }

    #[test]
    fn diamond_center_maps_back_to_its_tile() {
        let grid = IsoGrid::new(Vec2::new(64.0, 68.0));
        for (c, r) in [(0, 0), (3, 1), (1, 5), (-2, 4), (7, 7)] {
            let [top, _, bottom, _] = grid.diamond(c, r);
            let center = (top + bottom) / 2.0;
            assert_eq!(grid.from_world(center), (c, r), "tile ({c}, {r})");
        }
    }

    #[test]
    fn sprite_origin_is_left_of_top_vertex() {
        let grid = IsoGrid::new(Vec2::new(64.0, 68.0));
        assert_eq!(grid.sprite_origin(0, 0), Vec2::new(-32.0, 0.0));
    }

    // ── map ───────────────────────────────────────────────────────────────

    #[test]
    fn generate_is_deterministic_and_uses_palette() {
        let a = TileMap::generate(8, 6, &[4, 5, 6], 42);
        let b = TileMap::generate(8, 6, &[4, 5, 6], 42);
        assert_eq!(a, b);
        assert!(a.tiles.iter().all(|t| (4..=6).contains(t)));
    }

    #[test]
    fn back_to_front_visits_every_tile_once_by_depth() {
        let map = TileMap::generate(4, 3, &[0], 1);
        let order: Vec<(i32, i32)> = map.back_to_front().map(|(c, r, _)| (c, r)).collect();
        assert_eq!(order.len(), 12);
        assert!(order.windows(2).all(|w| w[0].0 + w[0].1 <= w[1].0 + w[1].1));

        let mut sorted = order.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
    }

    #[test]
    fn bounds() {
        let map = TileMap::generate(4, 3, &[7], 1);
        assert!(map.contains(3, 2));
        assert!(!map.contains(4, 0));
        assert!(!map.contains(0, -1));
        assert_eq!(map.get(1, 1), Some(7));
        assert_eq!(map.get(9, 9), None);
    }

    #[test]
    fn outline_spans_corner_tiles() {
        let grid = IsoGrid::new(Vec2::new(64.0, 64.0));
        let map = TileMap::generate(2, 2, &[0], 1);
        let [top, right, bottom, left] = map.outline(&grid);
        assert_eq!(top, Vec2::ZERO);
        assert_eq!(right, Vec2::new(64.0, 32.0));
        assert_eq!(bottom, Vec2::new(0.0, 64.0));
        assert_eq!(left, Vec2::new(-64.0, 32.0));
        assert_eq!(map.center(&grid), Vec2::new(0.0, 32.0));
    }
}
