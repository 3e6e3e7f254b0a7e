use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Z,
    Space,
    ShiftLeft,
    ShiftRight,
    R,
    Escape,
}

pub const JUMP_KEYS: &[Key] = &[Key::Z, Key::Space];
pub const RUN_KEYS: &[Key] = &[Key::ShiftLeft, Key::ShiftRight];

/// Read-only view of the keyboard for one simulation step.
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;
    fn was_pressed_this_frame(&self, key: Key) -> bool;

    fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.is_pressed(k))
    }

    fn any_pressed_this_frame(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.was_pressed_this_frame(k))
    }
}

/// Input that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn is_pressed(&self, _key: Key) -> bool {
        false
    }

    fn was_pressed_this_frame(&self, _key: Key) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Moves the held set to exactly `keys`, producing press/release edges for
    /// whatever changed. Used when driving input from a recorded sequence.
    pub fn set_held(&mut self, keys: &HashSet<Key>) {
        let released: Vec<Key> = self.held.difference(keys).copied().collect();
        for key in released {
            self.key_up(key);
        }
        for &key in keys {
            self.key_down(key);
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl InputSource for InputState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn was_pressed_this_frame(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Z);
        assert!(input.is_pressed(Key::Z));
        assert!(input.was_pressed_this_frame(Key::Z));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_up(Key::Left);
        assert!(!input.is_pressed(Key::Left));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // OS key repeat sends another down while already held.
        input.key_down(Key::Space);
        assert!(input.is_pressed(Key::Space));
        assert!(!input.was_pressed_this_frame(Key::Space));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Right);
        assert!(!input.is_pressed(Key::Right));
        assert!(!input.was_pressed_this_frame(Key::Right));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Space);
        input.end_frame();
        assert!(!input.was_pressed_this_frame(Key::Left));
        assert!(!input.was_pressed_this_frame(Key::Space));
        assert!(input.is_pressed(Key::Left));
        assert!(input.is_pressed(Key::Space));
    }

    #[test]
    fn test_set_held_produces_edges() {
        let mut input = InputState::new();
        input.set_held(&[Key::Right, Key::Z].into_iter().collect());
        assert!(input.was_pressed_this_frame(Key::Right));
        assert!(input.was_pressed_this_frame(Key::Z));
        input.end_frame();

        input.set_held(&[Key::Right].into_iter().collect());
        assert!(input.is_pressed(Key::Right));
        assert!(!input.was_pressed_this_frame(Key::Right));
        assert!(!input.is_pressed(Key::Z));
        input.end_frame();

        // Releasing and pressing again is a fresh edge.
        input.set_held(&[Key::Right, Key::Z].into_iter().collect());
        assert!(input.was_pressed_this_frame(Key::Z));
    }

    #[test]
    fn test_any_helpers() {
        let mut input = InputState::new();
        input.key_down(Key::ShiftRight);
        assert!(input.any_pressed(RUN_KEYS));
        assert!(input.any_pressed_this_frame(RUN_KEYS));
        assert!(!input.any_pressed(JUMP_KEYS));
    }

    #[test]
    fn test_null_input_reports_nothing() {
        let input = NullInput;
        assert!(!input.is_pressed(Key::Left));
        assert!(!input.was_pressed_this_frame(Key::Z));
        assert!(!input.any_pressed(JUMP_KEYS));
    }
}
