use super::Vec2;

/// Axis-aligned rectangle (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` whose center is `center`.
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    /// Corners in quad order: top-left, top-right, bottom-left, bottom-right.
    ///
    /// No normalization happens; a negative size mirrors the corners.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let Vec2 { x, y } = self.origin;
        let Vec2 { x: w, y: h } = self.size;
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x, y + h),
            Vec2::new(x + w, y + h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_origin_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    // ── corners ───────────────────────────────────────────────────────────

    #[test]
    fn corners_are_tl_tr_bl_br() {
        let [tl, tr, bl, br] = r(1.0, 2.0, 10.0, 20.0).corners();
        assert_eq!(tl, Vec2::new(1.0, 2.0));
        assert_eq!(tr, Vec2::new(11.0, 2.0));
        assert_eq!(bl, Vec2::new(1.0, 22.0));
        assert_eq!(br, Vec2::new(11.0, 22.0));
    }

    #[test]
    fn centered_matches_explicit_origin() {
        let c = Rect::centered(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0));
        assert_eq!(c, r(40.0, 40.0, 20.0, 20.0));
        assert_eq!(c.corners(), r(40.0, 40.0, 20.0, 20.0).corners());
    }
}
