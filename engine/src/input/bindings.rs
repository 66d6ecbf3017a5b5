//! Input Bindings Module
//!
//! Maps physical keys to logical actions. Several keys may drive the same
//! action (WASD and the arrow keys both move), but each key drives at most one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::KeyCode;

/// Logical input actions that can be bound to physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (default: W, ArrowUp)
    MoveForward,
    /// Move backward (default: S, ArrowDown)
    MoveBack,
    /// Strafe left (default: A, ArrowLeft)
    MoveLeft,
    /// Strafe right (default: D, ArrowRight)
    MoveRight,
    /// Run modifier (default: Left Shift)
    Run,
    /// Jump (default: Space)
    Jump,
    /// Toggle crouch (default: C)
    Crouch,
    /// Dodge roll (default: Left Ctrl)
    Roll,
    /// Interact with objects (default: E)
    Interact,
    /// Toggle cursor lock (default: Escape)
    Escape,
}

/// One key-to-action pair, the serialized form of [`KeyBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: KeyCode,
    pub action: InputAction,
}

/// Maps physical keys to logical actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create a new KeyBindings instance with default key mappings.
    ///
    /// Default bindings:
    /// - W / ArrowUp = MoveForward
    /// - S / ArrowDown = MoveBack
    /// - A / ArrowLeft = MoveLeft
    /// - D / ArrowRight = MoveRight
    /// - Left Shift = Run
    /// - Space = Jump
    /// - C = Crouch
    /// - Left Ctrl = Roll
    /// - E = Interact
    /// - Escape = Escape
    pub fn new() -> Self {
        Self::from_bindings(&default_bindings())
    }

    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
        }
    }

    /// Build from a list of pairs. Later pairs win when a key repeats.
    pub fn from_bindings(bindings: &[Binding]) -> Self {
        let mut out = Self::empty();
        for binding in bindings {
            out.bind(binding.key, binding.action);
        }
        out
    }

    /// Bind a physical key to a logical action.
    ///
    /// If the key was previously bound to another action, that binding is
    /// replaced. Other keys bound to `action` keep their binding.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.key_to_action.insert(key, action);
    }

    /// Remove the binding for a specific key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        self.key_to_action.remove(&key);
    }

    /// Remove every key bound to `action`.
    pub fn unbind_action(&mut self, action: InputAction) {
        self.key_to_action.retain(|_, bound| *bound != action);
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Keys bound to `action`.
    pub fn keys_for(&self, action: InputAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.key_to_action
            .iter()
            .filter(move |(_, bound)| **bound == action)
            .map(|(key, _)| *key)
    }

    /// Check if an action is held, given the set of held keys.
    pub fn is_action_held(&self, action: InputAction, held_keys: &HashSet<KeyCode>) -> bool {
        held_keys
            .iter()
            .any(|key| self.key_to_action.get(key) == Some(&action))
    }

    /// Every action with at least one held key.
    pub fn held_actions(&self, held_keys: &HashSet<KeyCode>) -> HashSet<InputAction> {
        held_keys
            .iter()
            .filter_map(|key| self.key_to_action.get(key).copied())
            .collect()
    }

    /// Current bindings as pairs, sorted by key for stable output.
    pub fn to_bindings(&self) -> Vec<Binding> {
        let mut out: Vec<Binding> = self
            .key_to_action
            .iter()
            .map(|(&key, &action)| Binding { key, action })
            .collect();
        out.sort_by_key(|b| format!("{:?}", b.key));
        out
    }
}

/// The default key layout as serializable pairs.
pub fn default_bindings() -> Vec<Binding> {
    use InputAction::*;
    use KeyCode::*;

    [
        (W, MoveForward),
        (ArrowUp, MoveForward),
        (S, MoveBack),
        (ArrowDown, MoveBack),
        (A, MoveLeft),
        (ArrowLeft, MoveLeft),
        (D, MoveRight),
        (ArrowRight, MoveRight),
        (ShiftLeft, Run),
        (Space, Jump),
        (C, Crouch),
        (ControlLeft, Roll),
        (E, Interact),
        (KeyCode::Escape, InputAction::Escape),
    ]
    .into_iter()
    .map(|(key, action)| Binding { key, action })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::W), Some(InputAction::MoveForward));
        assert_eq!(bindings.get_action(KeyCode::ArrowUp), Some(InputAction::MoveForward));
        assert_eq!(bindings.get_action(KeyCode::S), Some(InputAction::MoveBack));
        assert_eq!(bindings.get_action(KeyCode::A), Some(InputAction::MoveLeft));
        assert_eq!(bindings.get_action(KeyCode::D), Some(InputAction::MoveRight));
        assert_eq!(bindings.get_action(KeyCode::ShiftLeft), Some(InputAction::Run));
        assert_eq!(bindings.get_action(KeyCode::Space), Some(InputAction::Jump));
        assert_eq!(bindings.get_action(KeyCode::C), Some(InputAction::Crouch));
        assert_eq!(bindings.get_action(KeyCode::ControlLeft), Some(InputAction::Roll));
        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::Interact));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(InputAction::Escape));
    }

    #[test]
    fn test_right_modifiers_unbound_by_default() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.get_action(KeyCode::ShiftRight), None);
        assert_eq!(bindings.get_action(KeyCode::ControlRight), None);
        assert_eq!(bindings.keys_for(InputAction::Roll).count(), 1);
    }

    #[test]
    fn test_multiple_keys_per_action() {
        let bindings = KeyBindings::new();
        let mut keys: Vec<KeyCode> = bindings.keys_for(InputAction::MoveLeft).collect();
        keys.sort_by_key(|k| format!("{k:?}"));
        assert_eq!(keys, vec![KeyCode::A, KeyCode::ArrowLeft]);
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();
        bindings.bind(KeyCode::E, InputAction::Roll);

        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::Roll));
        // Ctrl still rolls as well
        assert_eq!(bindings.get_action(KeyCode::ControlLeft), Some(InputAction::Roll));
        assert_eq!(bindings.keys_for(InputAction::Interact).count(), 0);
    }

    #[test]
    fn test_unbind() {
        let mut bindings = KeyBindings::new();
        bindings.unbind_key(KeyCode::W);
        assert_eq!(bindings.get_action(KeyCode::W), None);
        assert_eq!(bindings.keys_for(InputAction::MoveForward).count(), 1);

        bindings.unbind_action(InputAction::MoveForward);
        assert_eq!(bindings.keys_for(InputAction::MoveForward).count(), 0);
    }

    #[test]
    fn test_is_action_held() {
        let bindings = KeyBindings::new();

        let mut held = HashSet::new();
        assert!(!bindings.is_action_held(InputAction::MoveForward, &held));

        held.insert(KeyCode::ArrowUp);
        assert!(bindings.is_action_held(InputAction::MoveForward, &held));
        assert!(!bindings.is_action_held(InputAction::MoveBack, &held));
    }

    #[test]
    fn test_held_actions() {
        let bindings = KeyBindings::new();
        let held: HashSet<KeyCode> = [KeyCode::W, KeyCode::ShiftLeft, KeyCode::Unknown].into();
        let actions = bindings.held_actions(&held);
        assert_eq!(actions.len(), 2);
        assert!(actions.contains(&InputAction::MoveForward));
        assert!(actions.contains(&InputAction::Run));
    }

    #[test]
    fn test_bindings_round_trip_through_pairs() {
        let bindings = KeyBindings::new();
        let restored = KeyBindings::from_bindings(&bindings.to_bindings());
        assert_eq!(bindings, restored);
    }
}
