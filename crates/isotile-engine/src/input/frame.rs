use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key};

/// Per-frame input deltas.
///
/// `InputState` answers "what is held right now"; `InputFrame` answers "what
/// happened since the last frame". The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame (repeats excluded).
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Accumulated wheel delta this frame, in notches.
    pub wheel: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.wheel = Vec2::ZERO;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
