use std::fmt;

use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Only the keys the engine and demo react to are named; everything else maps
/// to `Key::Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    W,
    A,
    S,
    D,

    /// Platform key not represented above.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` is notch-based input; `Pixel` comes from touchpads and is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Pixels treated as one wheel notch when converting touchpad scrolling.
pub const PIXELS_PER_LINE: f32 = 40.0;

impl MouseWheelDelta {
    /// Delta in wheel notches. Positive `y` scrolls up / away from the user.
    pub fn lines(self) -> Vec2 {
        match self {
            MouseWheelDelta::Line { x, y } => Vec2::new(x, y),
            MouseWheelDelta::Pixel { x, y } => Vec2::new(x, y) / PIXELS_PER_LINE,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when the event is an OS key-repeat.
        repeat: bool,
    },

    MouseWheel(MouseWheelDelta),

    /// Pointer position in logical pixels.
    PointerMoved(Vec2),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
