//! Keyboard input latch
//!
//! Raw key-down/up events are level-triggered and auto-repeat. The latch
//! keeps the set of held keys and, once per display frame, diffs it against
//! the previous frame to produce just-pressed and just-released sets.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Confirm,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` (or `key` for space) to a game key
    ///
    /// Anything outside the allow-list is `None` and must be ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" | " " => Some(Key::Fire),
            "Escape" | "KeyP" => Some(Key::Pause),
            "Enter" | "NumpadEnter" => Some(Key::Confirm),
            _ => None,
        }
    }
}

/// Held / just-pressed / just-released keyboard state
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    held: HashSet<Key>,
    previous: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down; returns whether the key is recognized
    pub fn key_down(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.held.insert(key);
                true
            }
            None => false,
        }
    }

    /// Record a key-up; returns whether the key is recognized
    pub fn key_up(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.held.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Recompute edges against the previous frame (call once per frame)
    pub fn update(&mut self) {
        self.pressed = self.held.difference(&self.previous).copied().collect();
        self.released = self.previous.difference(&self.held).copied().collect();
        self.previous.clone_from(&self.held);
    }

    /// Forget all key state (focus left the page)
    pub fn clear(&mut self) {
        self.held.clear();
        self.previous.clear();
        self.pressed.clear();
        self.released.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn just_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Number of keys currently held
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Snapshot for the simulation
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            fire: self.just_pressed(Key::Fire),
            pause: self.just_pressed(Key::Pause),
            confirm: self.just_pressed(Key::Confirm),
        }
    }
}
