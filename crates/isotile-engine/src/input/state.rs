use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    /// Currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events for keys held during focus loss never arrive.
                    self.keys_down.clear();
                }
            }

            InputEvent::PointerMoved(p) => {
                self.pointer_pos = Some(*p);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::MouseWheel(delta) => {
                frame.wheel += delta.lines();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_is_reported_once_per_hold() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, false));
        assert!(state.key_down(Key::W));
        assert!(frame.key_pressed(Key::W));

        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, true));
        assert!(state.key_down(Key::W));
        assert!(!frame.key_pressed(Key::W));

        state.apply_event(&mut frame, key(Key::W, KeyState::Released, false));
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn wheel_accumulates_in_lines() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }));
        state.apply_event(
            &mut frame,
            InputEvent::MouseWheel(MouseWheelDelta::Pixel { x: 0.0, y: 80.0 }),
        );
        assert_eq!(frame.wheel, Vec2::new(0.0, 3.0));

        frame.clear();
        assert_eq!(frame.wheel, Vec2::ZERO);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(Vec2::new(3.0, 4.0)));
        assert_eq!(state.pointer_pos, Some(Vec2::new(3.0, 4.0)));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }
}
