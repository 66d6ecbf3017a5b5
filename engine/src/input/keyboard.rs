//! Keyboard Input Module
//!
//! Tracks which keys are held. Decoupled from any windowing system: the host
//! translates its own key events into [`KeyCode`] and forwards them here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Generic key codes, independent of windowing system.
///
/// Only keys with a default binding are named; everything else maps to
/// [`KeyCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Actions
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    C,
    E,
    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Keyboard state: the set of keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if the held state of the key changed. OS key repeat
    /// sends repeated presses which are reported as unchanged.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if key == KeyCode::Unknown {
            return false;
        }
        if pressed {
            self.held.insert(key)
        } else {
            self.held.remove(&key)
        }
    }

    /// Whether `key` is currently held.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Every key currently held.
    pub fn held_keys(&self) -> &HashSet<KeyCode> {
        &self.held
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
