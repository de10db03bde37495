//! 2D camera: world position at the screen center plus a zoom factor.

use crate::coords::{Vec2, Viewport};
use crate::input::{InputFrame, InputState, Key};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// World point shown at the center of the window.
    pub position: Vec2,

    /// Logical pixels per world unit. Always within `[MIN_ZOOM, MAX_ZOOM]`.
    zoom: f32,

    /// Pan speed in logical pixels per second (independent of zoom).
    pub pan_speed: f32,

    /// Zoom change per wheel notch.
    pub zoom_step: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            pan_speed: 400.0,
            zoom_step: 1.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec2, zoom: f32) -> Self {
        Self {
            position,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..Self::default()
        }
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Applies wheel notches (positive zooms in).
    pub fn apply_wheel(&mut self, notches: f32) {
        self.set_zoom(self.zoom + notches * self.zoom_step);
    }

    /// Moves along `direction` for `dt` seconds. Screen-space speed stays
    /// constant regardless of zoom.
    pub fn pan(&mut self, direction: Vec2, dt: f32) {
        self.position += direction.normalize_or_zero() * (self.pan_speed * dt / self.zoom);
    }

    /// Reads W/A/S/D (and arrows) for panning and the wheel for zoom.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        let mut dir = Vec2::ZERO;
        if input.key_down(Key::W) || input.key_down(Key::ArrowUp) {
            dir.y -= 1.0;
        }
        if input.key_down(Key::S) || input.key_down(Key::ArrowDown) {
            dir.y += 1.0;
        }
        if input.key_down(Key::A) || input.key_down(Key::ArrowLeft) {
            dir.x -= 1.0;
        }
        if input.key_down(Key::D) || input.key_down(Key::ArrowRight) {
            dir.x += 1.0;
        }

        if dir != Vec2::ZERO {
            self.pan(dir, dt);
        }
        if frame.wheel.y != 0.0 {
            self.apply_wheel(frame.wheel.y);
            log::trace!("camera zoom {:.2}", self.zoom);
        }
    }

    /// Maps a window position (logical pixels) to world units.
    ///
    /// Inverse of the vertex shader transform.
    pub fn screen_to_world(&self, screen: Vec2, viewport: Viewport) -> Vec2 {
        (screen - viewport.size() / 2.0) / self.zoom + self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState};

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn wheel_zoom_is_clamped_high() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.apply_wheel(1.0);
        }
        assert_eq!(cam.zoom(), MAX_ZOOM);
    }

    #[test]
    fn wheel_zoom_is_clamped_low() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.apply_wheel(-1.0);
        }
        assert_eq!(cam.zoom(), MIN_ZOOM);
    }

    #[test]
    fn constructor_clamps_zoom() {
        assert_eq!(Camera::new(Vec2::ZERO, 50.0).zoom(), MAX_ZOOM);
        assert_eq!(Camera::new(Vec2::ZERO, 0.0).zoom(), MIN_ZOOM);
    }

    // ── panning ───────────────────────────────────────────────────────────

    #[test]
    fn pan_speed_is_divided_by_zoom() {
        let mut cam = Camera::new(Vec2::ZERO, 2.0);
        cam.pan_speed = 100.0;
        cam.pan(Vec2::new(1.0, 0.0), 1.0);
        assert_eq!(cam.position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn update_reads_wasd_and_wheel() {
        let mut cam = Camera::default();
        cam.pan_speed = 10.0;

        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::S, state: KeyState::Pressed, repeat: false },
        );
        frame.wheel = Vec2::new(0.0, 2.0);

        cam.update(&state, &frame, 1.0);
        assert_eq!(cam.zoom(), 3.0);
        assert_eq!(cam.position, Vec2::new(0.0, 10.0));
    }

    // ── screen mapping ────────────────────────────────────────────────────

    #[test]
    fn window_center_maps_to_camera_position() {
        let cam = Camera::new(Vec2::new(100.0, -20.0), 4.0);
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(cam.screen_to_world(Vec2::new(400.0, 300.0), vp), cam.position);
    }

    #[test]
    fn screen_offsets_shrink_with_zoom() {
        let cam = Camera::new(Vec2::new(12.0, 7.0), 2.0);
        let vp = Viewport::new(640.0, 480.0);
        assert_eq!(cam.screen_to_world(Vec2::new(356.0, 216.0), vp), Vec2::new(30.0, -5.0));
    }
}
