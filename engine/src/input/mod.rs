//! Input Module
//!
//! Platform-agnostic input handling. The host forwards device events into a
//! [`DeviceInput`]; once per frame the frame loop polls an [`InputSource`] for
//! a [`FrameInput`] snapshot. Tests and the headless harness use
//! [`ScriptedInput`] instead of a device.
//!
//! # Example
//!
//! ```rust,ignore
//! use escape_run_engine::input::{DeviceInput, InputSource, KeyCode};
//!
//! let mut device = DeviceInput::new();
//!
//! // Event loop
//! device.handle_key(KeyCode::W, true);
//! device.handle_key(KeyCode::Space, true);
//! device.handle_pointer_motion(4.0, -1.0);
//!
//! // Frame loop
//! let frame = device.poll();
//! assert!(frame.jump);          // pressed this frame
//! assert_eq!(frame.move_axes.y, 1.0);
//!
//! let frame = device.poll();
//! assert!(!frame.jump);         // still held, no new edge
//! ```

pub mod bindings;
pub mod cursor;
pub mod keyboard;
pub mod mouse_state;

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

// Re-export commonly used types at module level
pub use bindings::{Binding, InputAction, KeyBindings, default_bindings};
pub use cursor::CursorLock;
pub use keyboard::{KeyCode, KeyboardState};
pub use mouse_state::PointerState;

/// Everything the frame loop needs from input for one frame.
///
/// `jump`, `crouch`, `roll`, `interact` and `escape` are edges: true only on
/// the frame the action went from released to pressed. `run` is a level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Movement axes, x = right and y = forward, length at most 1
    pub move_axes: Vec2,
    /// Run modifier held
    pub run: bool,
    pub jump: bool,
    pub crouch: bool,
    pub roll: bool,
    pub interact: bool,
    pub escape: bool,
    /// Pointer motion since the last frame
    pub pointer_delta: Vec2,
    /// Scroll notches since the last frame, positive zooms in
    pub scroll: f32,
}

static_assertions::assert_impl_all!(FrameInput: Copy, Send, Sync);

impl FrameInput {
    /// Snapshot with only movement axes set.
    pub fn moving(axes: Vec2) -> Self {
        Self {
            move_axes: axes,
            ..Self::default()
        }
    }

    /// Snapshot with only pointer motion set.
    pub fn looking(pointer_delta: Vec2) -> Self {
        Self {
            pointer_delta,
            ..Self::default()
        }
    }
}

/// Polled once per frame by the frame loop.
pub trait InputSource {
    fn poll(&mut self) -> FrameInput;
}

static_assertions::assert_obj_safe!(InputSource);

/// Released-to-pressed edge detection over logical actions.
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    previous: HashSet<InputAction>,
    pressed: HashSet<InputAction>,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's held actions.
    pub fn update(&mut self, held: HashSet<InputAction>) {
        self.pressed = held.difference(&self.previous).copied().collect();
        self.previous = held;
    }

    /// Whether `action` went down this frame.
    pub fn pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    /// Whether `action` is held this frame.
    pub fn held(&self, action: InputAction) -> bool {
        self.previous.contains(&action)
    }

    pub fn reset(&mut self) {
        self.previous.clear();
        self.pressed.clear();
    }
}

/// Keyboard and pointer devices turned into [`FrameInput`] through bindings.
#[derive(Debug, Clone, Default)]
pub struct DeviceInput {
    keyboard: KeyboardState,
    pointer: PointerState,
    bindings: KeyBindings,
    edges: EdgeTracker,
}

impl DeviceInput {
    /// Device input with the default bindings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        self.keyboard.handle_key(key, pressed)
    }

    pub fn handle_pointer_motion(&mut self, dx: f32, dy: f32) {
        self.pointer.accumulate_delta(dx, dy);
    }

    pub fn handle_scroll(&mut self, notches: f32) {
        self.pointer.accumulate_scroll(notches);
    }

    /// Drop everything held or accumulated, e.g. when the window loses focus.
    pub fn focus_lost(&mut self) {
        self.keyboard.reset();
        self.pointer.reset();
        self.edges.reset();
    }
}

impl InputSource for DeviceInput {
    fn poll(&mut self) -> FrameInput {
        self.edges
            .update(self.bindings.held_actions(self.keyboard.held_keys()));
        let axis = |positive: InputAction, negative: InputAction| {
            self.edges.held(positive) as i32 as f32 - self.edges.held(negative) as i32 as f32
        };

        let mut move_axes = Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBack),
        );
        if move_axes.length_squared() > 1.0 {
            move_axes = move_axes.normalize();
        }

        let (pointer_delta, scroll) = self.pointer.consume();

        FrameInput {
            move_axes,
            run: self.edges.held(InputAction::Run),
            jump: self.edges.pressed(InputAction::Jump),
            crouch: self.edges.pressed(InputAction::Crouch),
            roll: self.edges.pressed(InputAction::Roll),
            interact: self.edges.pressed(InputAction::Interact),
            escape: self.edges.pressed(InputAction::Escape),
            pointer_delta,
            scroll,
        }
    }
}

/// Deterministic queue of frames. Polling past the end yields empty frames.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame.
    pub fn then(mut self, frame: FrameInput) -> Self {
        self.frames.push_back(frame);
        self
    }

    /// Append `count` copies of `frame`.
    pub fn repeat(mut self, frame: FrameInput, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(frame, count));
        self
    }

    /// Append `count` empty frames.
    pub fn idle(self, count: usize) -> Self {
        self.repeat(FrameInput::default(), count)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> FrameInput {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_default_is_empty() {
        let mut device = DeviceInput::new();
        assert_eq!(device.poll(), FrameInput::default());
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::Space, true);

        assert!(device.poll().jump);
        assert!(!device.poll().jump);

        device.handle_key(KeyCode::Space, false);
        assert!(!device.poll().jump);

        device.handle_key(KeyCode::Space, true);
        assert!(device.poll().jump);
    }

    #[test]
    fn test_run_is_level() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::ShiftLeft, true);
        assert!(device.poll().run);
        assert!(device.poll().run);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::W, true);
        device.handle_key(KeyCode::S, true);
        device.handle_key(KeyCode::D, true);
        assert_eq!(device.poll().move_axes, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_diagonal_is_unit_length() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::W, true);
        device.handle_key(KeyCode::ArrowLeft, true);
        let axes = device.poll().move_axes;
        assert!((axes.length() - 1.0).abs() < 1e-5);
        assert!(axes.x < 0.0 && axes.y > 0.0);
    }

    #[test]
    fn test_shared_action_and_key_repeat_keep_single_edge() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::W, true);
        assert_eq!(device.poll().move_axes, Vec2::Y);
        device.handle_key(KeyCode::ArrowUp, true);
        assert_eq!(device.poll().move_axes, Vec2::Y);
        device.handle_key(KeyCode::ControlLeft, true);
        assert!(device.poll().roll);
        device.handle_key(KeyCode::ControlLeft, true);
        assert!(!device.poll().roll);
    }

    #[test]
    fn test_pointer_consumed_per_frame() {
        let mut device = DeviceInput::new();
        device.handle_pointer_motion(2.0, 1.0);
        device.handle_pointer_motion(1.0, 1.0);
        device.handle_scroll(1.0);

        let frame = device.poll();
        assert_eq!(frame.pointer_delta, Vec2::new(3.0, 2.0));
        assert_eq!(frame.scroll, 1.0);

        let frame = device.poll();
        assert_eq!(frame.pointer_delta, Vec2::ZERO);
        assert_eq!(frame.scroll, 0.0);
    }

    #[test]
    fn test_focus_lost_releases_everything() {
        let mut device = DeviceInput::new();
        device.handle_key(KeyCode::W, true);
        device.handle_pointer_motion(5.0, 5.0);
        device.focus_lost();
        assert_eq!(device.poll(), FrameInput::default());
    }

    #[test]
    fn test_scripted_input_order() {
        let mut script = ScriptedInput::new()
            .then(FrameInput::moving(Vec2::Y))
            .idle(2)
            .repeat(FrameInput::looking(Vec2::X), 1);

        assert_eq!(script.remaining(), 4);
        assert_eq!(script.poll().move_axes, Vec2::Y);
        assert_eq!(script.poll(), FrameInput::default());
        assert_eq!(script.poll(), FrameInput::default());
        assert_eq!(script.poll().pointer_delta, Vec2::X);
        assert!(script.is_finished());
        assert_eq!(script.poll(), FrameInput::default());
    }

    #[test]
    fn test_edge_tracker() {
        let mut edges = EdgeTracker::new();
        edges.update([InputAction::Jump].into());
        assert!(edges.pressed(InputAction::Jump));
        assert!(edges.held(InputAction::Jump));

        edges.update([InputAction::Jump, InputAction::Roll].into());
        assert!(!edges.pressed(InputAction::Jump));
        assert!(edges.pressed(InputAction::Roll));

        edges.update(HashSet::new());
        assert!(!edges.held(InputAction::Jump));
    }
}
