//! Animation parameter sink
//!
//! Locomotion pushes a handful of parameters to whatever drives the character
//! animation. The sink is optional; without one the pushes are skipped.

/// One-shot animation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTrigger {
    Jump,
    Roll,
}

/// Receives animation parameters from the locomotion controller.
pub trait AnimationSink {
    fn set_grounded(&mut self, grounded: bool);
    fn set_crouching(&mut self, crouching: bool);
    /// Horizontal speed in m/s, 0 when idle.
    fn set_speed(&mut self, speed: f32);
    fn trigger(&mut self, trigger: AnimationTrigger);
}

/// Sink that records the latest parameters and every trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationLog {
    pub grounded: bool,
    pub crouching: bool,
    pub speed: f32,
    pub triggers: Vec<AnimationTrigger>,
}

impl AnimationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `trigger` fired.
    pub fn count(&self, trigger: AnimationTrigger) -> usize {
        self.triggers.iter().filter(|t| **t == trigger).count()
    }
}

impl AnimationSink for AnimationLog {
    fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    fn set_crouching(&mut self, crouching: bool) {
        self.crouching = crouching;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn trigger(&mut self, trigger: AnimationTrigger) {
        self.triggers.push(trigger);
    }
}
