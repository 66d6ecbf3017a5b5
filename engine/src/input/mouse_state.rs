//! Pointer State Tracker
//!
//! Accumulates raw pointer motion and scroll between frames so the frame loop
//! can consume them atomically, no matter how many device events arrived.

use glam::Vec2;

/// Pointer motion and scroll accumulated since the last frame.
///
/// # Example
///
/// ```rust,ignore
/// use escape_run_engine::input::PointerState;
///
/// let mut pointer = PointerState::new();
///
/// // In event loop: accumulate raw motion
/// pointer.accumulate_delta(10.0, -5.0);
/// pointer.accumulate_delta(3.0, 2.0);
/// pointer.accumulate_scroll(1.0);
///
/// // Once per frame
/// let (delta, scroll) = pointer.consume();
/// // delta = (13, -3), scroll = 1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    delta: Vec2,
    scroll: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate raw pointer motion.
    ///
    /// `dy` is positive when the pointer moves up, matching the look
    /// convention where pushing the mouse forward raises the view.
    #[inline]
    pub fn accumulate_delta(&mut self, dx: f32, dy: f32) {
        self.delta += Vec2::new(dx, dy);
    }

    /// Accumulate scroll wheel notches; positive scrolls forward.
    #[inline]
    pub fn accumulate_scroll(&mut self, notches: f32) {
        self.scroll += notches;
    }

    /// Return everything accumulated since the last call and reset to zero.
    #[inline]
    pub fn consume(&mut self) -> (Vec2, f32) {
        let out = (self.delta, self.scroll);
        *self = Self::default();
        out
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let mut state = PointerState::new();
        assert_eq!(state.consume(), (Vec2::ZERO, 0.0));
    }

    #[test]
    fn test_accumulate() {
        let mut state = PointerState::new();
        state.accumulate_delta(10.0, 5.0);
        state.accumulate_delta(3.0, -2.0);
        state.accumulate_scroll(1.0);
        state.accumulate_scroll(-0.5);
        assert_eq!(state.consume(), (Vec2::new(13.0, 3.0), 0.5));
    }

    #[test]
    fn test_consume_resets() {
        let mut state = PointerState::new();
        state.accumulate_delta(10.0, 5.0);
        state.accumulate_scroll(2.0);

        assert_eq!(state.consume(), (Vec2::new(10.0, 5.0), 2.0));
        assert_eq!(state.consume(), (Vec2::ZERO, 0.0));
    }
}
