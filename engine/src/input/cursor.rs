//! Cursor Lock Module
//!
//! Tracks whether the cursor is locked for camera control. Orbit input is only
//! honored while locked; the Escape action toggles the lock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use escape_run_engine::input::CursorLock;
//!
//! let mut cursor = CursorLock::new(true);
//!
//! // Escape pressed: release
//! cursor.handle_escape();
//! assert!(!cursor.is_locked());
//!
//! // Escape again: lock
//! cursor.handle_escape();
//! ```

use tracing::info;

/// Cursor lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLock {
    locked: bool,
    /// Set whenever the lock changes, cleared by the host once applied
    dirty: bool,
}

impl Default for CursorLock {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CursorLock {
    /// Create with an initial lock state. The state starts dirty so the host
    /// applies it on the first frame.
    pub fn new(locked: bool) -> Self {
        Self {
            locked,
            dirty: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the host still needs to apply the current state.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn lock(&mut self) {
        self.set_locked(true);
    }

    pub fn release(&mut self) {
        self.set_locked(false);
    }

    /// Escape toggles between locked and released.
    pub fn handle_escape(&mut self) {
        self.set_locked(!self.locked);
    }

    fn set_locked(&mut self, locked: bool) {
        if self.locked == locked {
            return;
        }
        self.locked = locked;
        self.dirty = true;
        info!(target: "input", locked, "cursor lock changed");
    }
}
