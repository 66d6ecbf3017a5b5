//! Player health
//!
//! Hazards, pickups and other trigger volumes talk to the character through
//! [`Damageable`]. [`Health`] is the stock implementation: values clamp to
//! `[0, max]`, death is latched, and nothing changes once dead.

use tracing::{debug, info};

/// Default maximum health
pub const DEFAULT_MAX_HEALTH: i32 = 100;

/// Reported by [`Damageable::take_damage`] when the hit was fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    Died,
}

/// Capability exposed to collaborators that hurt or heal the character.
pub trait Damageable {
    /// Apply damage. Returns [`HealthEvent::Died`] exactly once, on the hit
    /// that brings health to zero.
    fn take_damage(&mut self, amount: i32) -> Option<HealthEvent>;
    fn heal(&mut self, amount: i32);
    fn is_dead(&self) -> bool;
}

/// Integer hit points with a latched death flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEALTH)
    }
}

impl Health {
    /// Full health with the given maximum (at least 1).
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Current health as a fraction of max, for UI bars.
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: i32) -> Option<HealthEvent> {
        if self.dead {
            return None;
        }
        self.current = self.current.saturating_sub(amount.max(0)).clamp(0, self.max);
        debug!(target: "health", amount, current = self.current, "took damage");

        if self.current == 0 {
            self.dead = true;
            info!(target: "health", "character died");
            return Some(HealthEvent::Died);
        }
        None
    }

    fn heal(&mut self, amount: i32) {
        if self.dead {
            return;
        }
        self.current = self.current.saturating_add(amount.max(0)).clamp(0, self.max);
        debug!(target: "health", amount, current = self.current, "healed");
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}
