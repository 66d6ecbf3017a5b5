//! Player Module
//!
//! Character movement and the capabilities a character exposes to the world.
//!
//! # Components
//!
//! - [`LocomotionController`] - Camera-relative movement state machine
//!   - Idle, moving, crouching, jumping and rolling as one tagged enum
//!   - Commits moves through a [`crate::physics::CollisionWorld`]
//! - [`Stance`] / [`StanceShapes`] - Standing and crouching collision volumes
//! - [`AnimationSink`] - Optional receiver for animation parameters
//! - [`Health`] - Stock [`Damageable`] implementation for hazards and pickups

pub mod animation;
pub mod health;
pub mod locomotion;
pub mod stance;

pub use animation::{AnimationLog, AnimationSink, AnimationTrigger};
pub use health::{DEFAULT_MAX_HEALTH, Damageable, Health, HealthEvent};
pub use locomotion::{
    CROUCH_SPEED, CharacterTransform, FrameMotion, GRAVITY, GROUNDED_VELOCITY, KinematicState,
    LocomotionConfig, LocomotionContext, LocomotionController, LocomotionInput, LocomotionState,
    MAX_FRAME_DT, RUN_SPEED, WALK_SPEED,
};
pub use stance::{BODY_RADIUS, CROUCH_HEIGHT, STANDING_HEIGHT, Stance, StanceShapes};
