//! Player Locomotion Controller
//!
//! Turns per-frame input into a kinematic character move: idle, walk, run,
//! crouch, jump and dodge roll. Movement is relative to a reference yaw (the
//! chase camera's facing) so that forward input always moves away from the
//! camera regardless of where the character is facing.
//!
//! # State Machine
//!
//! ```text
//!            deadzone                crouch edge
//!   Idle  <----------->  Moving   <-------------> Crouching
//!     |  \                 |  \
//!     |   \ jump edge      |   \ roll edge (grounded)
//!     |    v               |    v
//!     |   Jumping          |   Rolling { elapsed, direction }
//!     |    | ground contact     | elapsed >= roll_duration
//!     +----+--------------------+-----> Idle
//! ```
//!
//! Rolling ignores every input until its timer runs out. Gravity and the
//! ground snap run in every state.
//!
//! # Physics Model
//!
//! - Walk speed: 5.0 m/s, run 9.0 m/s, crouch 2.5 m/s
//! - Gravity: -9.81 m/s^2, integrated with the midpoint rule so a jump peaks
//!   at exactly `jump_height`
//! - Grounded vertical velocity held at -2.0 m/s to keep contact
//! - Roll: 5.0 m over 0.6 s at constant speed
//!
//! # Usage
//!
//! ```rust,ignore
//! use escape_run_engine::physics::StaticWorld;
//! use escape_run_engine::player::{LocomotionConfig, LocomotionContext, LocomotionController, LocomotionInput};
//! use glam::{Vec2, Vec3};
//!
//! let world = StaticWorld::with_ground(0.0);
//! let mut controller = LocomotionController::spawn(LocomotionConfig::default(), Vec3::ZERO, 0.0);
//!
//! // Each frame:
//! let input = LocomotionInput { axes: Vec2::Y, ..Default::default() };
//! let ctx = LocomotionContext::new(&world).with_reference_yaw(Some(camera_yaw));
//! let motion = controller.update(delta_time, &input, ctx);
//! ```

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::FrameInput;
use crate::physics::{
    BodyState, Capsule, CollisionWorld, rotation_from_yaw, slerp_clamped, yaw_forward,
    yaw_from_rotation,
};

use super::animation::{AnimationSink, AnimationTrigger};
use super::stance::{Stance, StanceShapes};

/// Longest frame step integrated in one update, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Walk speed in meters per second
pub const WALK_SPEED: f32 = 5.0;

/// Run speed in meters per second
pub const RUN_SPEED: f32 = 9.0;

/// Crouch speed in meters per second
pub const CROUCH_SPEED: f32 = 2.5;

/// Gravity acceleration in meters per second squared
pub const GRAVITY: f32 = -9.81;

/// Vertical velocity held while grounded
pub const GROUNDED_VELOCITY: f32 = -2.0;

// =============================================================================
// Configuration
// =============================================================================

/// Locomotion tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    /// Facing slerp rate per second
    pub rotation_speed: f32,
    /// Apex height of a jump in meters
    pub jump_height: f32,
    /// Vertical acceleration, negative pulls down
    pub gravity: f32,
    pub roll_distance: f32,
    pub roll_duration: f32,
    /// Input magnitude below which the character is idle
    pub input_deadzone: f32,
    /// Vertical velocity held while grounded and falling
    pub grounded_velocity: f32,
    pub shapes: StanceShapes,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            crouch_speed: CROUCH_SPEED,
            rotation_speed: 10.0,
            jump_height: 1.2,
            gravity: GRAVITY,
            roll_distance: 5.0,
            roll_duration: 0.6,
            input_deadzone: 0.1,
            grounded_velocity: GROUNDED_VELOCITY,
            shapes: StanceShapes::default(),
        }
    }
}

impl LocomotionConfig {
    /// Launch velocity that peaks at `jump_height`: `sqrt(h * -2 * g)`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).max(0.0).sqrt()
    }

    /// Constant roll speed in meters per second.
    pub fn roll_speed(&self) -> f32 {
        if self.roll_duration > 0.0 {
            self.roll_distance / self.roll_duration
        } else {
            0.0
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Locomotion state. Exactly one at a time; roll data only exists while rolling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocomotionState {
    #[default]
    Idle,
    Moving,
    Crouching,
    Jumping,
    Rolling {
        /// Seconds since the roll started
        elapsed: f32,
        /// Unit horizontal direction captured at the start
        direction: Vec3,
    },
}

impl LocomotionState {
    pub fn name(&self) -> &'static str {
        match self {
            LocomotionState::Idle => "idle",
            LocomotionState::Moving => "moving",
            LocomotionState::Crouching => "crouching",
            LocomotionState::Jumping => "jumping",
            LocomotionState::Rolling { .. } => "rolling",
        }
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self, LocomotionState::Rolling { .. })
    }

    pub fn stance(&self) -> Stance {
        match self {
            LocomotionState::Crouching => Stance::Crouching,
            _ => Stance::Standing,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Everything locomotion owns about the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    /// Feet position
    pub position: Vec3,
    /// Yaw-only facing
    pub orientation: Quat,
    pub vertical_velocity: f32,
    pub state: LocomotionState,
    /// Result of this frame's ground query
    pub grounded: bool,
}

/// Read-only view of the character for cameras and UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterTransform {
    pub position: Vec3,
    pub yaw: f32,
}

impl CharacterTransform {
    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }

    /// Horizontal distance to a point, for proximity prompts.
    pub fn horizontal_distance_to(&self, point: Vec3) -> f32 {
        Vec2::new(point.x - self.position.x, point.z - self.position.z).length()
    }
}

// =============================================================================
// Per-frame input and collaborators
// =============================================================================

/// Locomotion's slice of a frame's input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionInput {
    /// x = right, y = forward, each in [-1, 1]
    pub axes: Vec2,
    /// Run modifier held
    pub run: bool,
    /// Crouch toggle edge
    pub crouch: bool,
    /// Jump edge
    pub jump: bool,
    /// Roll edge
    pub roll: bool,
}

impl From<&FrameInput> for LocomotionInput {
    fn from(frame: &FrameInput) -> Self {
        Self {
            axes: frame.move_axes,
            run: frame.run,
            crouch: frame.crouch,
            jump: frame.jump,
            roll: frame.roll,
        }
    }
}

/// Collaborators for one update.
///
/// The world and the animation sink are borrowed independently; the sink is
/// a unique borrow and must not be tied to the world's lifetime.
pub struct LocomotionContext<'w, 'a> {
    /// Ground query and move resolution
    pub world: &'w dyn CollisionWorld,
    /// Camera yaw; `None` falls back to the character's own facing
    pub reference_yaw: Option<f32>,
    pub animation: Option<&'a mut dyn AnimationSink>,
}

impl<'w, 'a> LocomotionContext<'w, 'a> {
    pub fn new(world: &'w dyn CollisionWorld) -> Self {
        Self {
            world,
            reference_yaw: None,
            animation: None,
        }
    }

    pub fn with_reference_yaw(mut self, yaw: Option<f32>) -> Self {
        self.reference_yaw = yaw;
        self
    }

    pub fn with_animation(mut self, animation: Option<&'a mut dyn AnimationSink>) -> Self {
        self.animation = animation;
        self
    }
}

/// What one update did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMotion {
    /// Displacement requested from the collision world
    pub displacement: Vec3,
    /// Feet position after the world resolved the move
    pub position: Vec3,
}

/// Clamp input to unit length and return its magnitude and world heading.
fn input_heading(axes: Vec2, reference_yaw: f32) -> (f32, f32) {
    let axes = axes.clamp_length_max(1.0);
    let magnitude = axes.length();
    if magnitude == 0.0 {
        return (0.0, reference_yaw);
    }
    (magnitude, reference_yaw + axes.x.atan2(axes.y))
}

// =============================================================================
// LocomotionController
// =============================================================================

/// Kinematic character controller.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    kinematic: KinematicState,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

impl LocomotionController {
    /// Idle at the origin facing -Z.
    pub fn new(config: LocomotionConfig) -> Self {
        Self::spawn(config, Vec3::ZERO, 0.0)
    }

    /// Idle at `position` facing `yaw`.
    pub fn spawn(config: LocomotionConfig, position: Vec3, yaw: f32) -> Self {
        Self {
            config,
            kinematic: KinematicState {
                position,
                orientation: rotation_from_yaw(yaw),
                vertical_velocity: 0.0,
                state: LocomotionState::Idle,
                grounded: false,
            },
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LocomotionConfig) {
        self.config = config;
    }

    pub fn kinematic(&self) -> &KinematicState {
        &self.kinematic
    }

    pub fn state(&self) -> LocomotionState {
        self.kinematic.state
    }

    pub fn position(&self) -> Vec3 {
        self.kinematic.position
    }

    pub fn orientation(&self) -> Quat {
        self.kinematic.orientation
    }

    pub fn yaw(&self) -> f32 {
        yaw_from_rotation(self.kinematic.orientation)
    }

    /// Horizontal facing direction.
    pub fn forward(&self) -> Vec3 {
        let forward = self.kinematic.orientation * Vec3::NEG_Z;
        Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::NEG_Z)
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.kinematic.vertical_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.kinematic.grounded
    }

    /// Current collision volume, which follows the stance.
    pub fn shape(&self) -> Capsule {
        self.kinematic.state.stance().shape(&self.config.shapes)
    }

    pub fn body(&self) -> BodyState {
        BodyState {
            position: self.kinematic.position,
            shape: self.shape(),
        }
    }

    pub fn transform(&self) -> CharacterTransform {
        CharacterTransform {
            position: self.kinematic.position,
            yaw: self.yaw(),
        }
    }

    /// Move instantly, clearing vertical velocity and any jump or roll.
    pub fn teleport(&mut self, position: Vec3) {
        self.kinematic.position = position;
        self.kinematic.vertical_velocity = 0.0;
        if matches!(
            self.kinematic.state,
            LocomotionState::Jumping | LocomotionState::Rolling { .. }
        ) {
            self.transition(LocomotionState::Idle);
        }
    }

    /// Advance one frame and commit the resolved position.
    pub fn update(
        &mut self,
        dt: f32,
        input: &LocomotionInput,
        ctx: LocomotionContext<'_, '_>,
    ) -> FrameMotion {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let LocomotionContext {
            world,
            reference_yaw,
            mut animation,
        } = ctx;

        let grounded = world.is_grounded(&self.body());
        self.kinematic.grounded = grounded;
        if let Some(sink) = animation.as_mut() {
            sink.set_grounded(grounded);
        }

        if grounded && self.kinematic.vertical_velocity < 0.0 {
            self.kinematic.vertical_velocity = self.config.grounded_velocity;
            if self.kinematic.state == LocomotionState::Jumping {
                self.transition(LocomotionState::Idle);
            }
        }

        let mut horizontal = Vec3::ZERO;
        if !self.kinematic.state.is_rolling() {
            let reference_yaw = reference_yaw.unwrap_or_else(|| self.yaw());
            horizontal = self.drive(dt, input, grounded, reference_yaw, &mut animation);
        }
        if self.kinematic.state.is_rolling() {
            horizontal = self.advance_roll(dt);
            if let Some(sink) = animation.as_mut() {
                sink.set_speed(self.config.roll_speed());
            }
        }

        // Midpoint rule keeps the jump apex exact
        let previous = self.kinematic.vertical_velocity;
        self.kinematic.vertical_velocity += self.config.gravity * dt;
        let rise = 0.5 * (previous + self.kinematic.vertical_velocity) * dt;
        if grounded && self.kinematic.vertical_velocity < 0.0 {
            self.kinematic.vertical_velocity = self.config.grounded_velocity;
        }

        let displacement = horizontal + Vec3::Y * rise;
        let position = world.resolve_move(&self.body(), displacement);
        self.kinematic.position = position;

        FrameMotion {
            displacement,
            position,
        }
    }

    /// Handle input outside a roll. May start a roll, in which case the
    /// returned displacement is zero and the roll advances separately.
    fn drive(
        &mut self,
        dt: f32,
        input: &LocomotionInput,
        grounded: bool,
        reference_yaw: f32,
        animation: &mut Option<&mut dyn AnimationSink>,
    ) -> Vec3 {
        let (magnitude, heading) = input_heading(input.axes, reference_yaw);
        let has_input = magnitude > 0.0 && magnitude >= self.config.input_deadzone;

        if input.crouch
            && matches!(
                self.kinematic.state,
                LocomotionState::Idle | LocomotionState::Moving | LocomotionState::Crouching
            )
        {
            self.toggle_crouch(has_input, animation);
        }

        let can_act = grounded
            && matches!(
                self.kinematic.state,
                LocomotionState::Idle | LocomotionState::Moving
            );

        if input.roll && can_act {
            let direction = if has_input {
                self.kinematic.orientation = rotation_from_yaw(heading);
                yaw_forward(heading)
            } else {
                self.forward()
            };
            self.transition(LocomotionState::Rolling {
                elapsed: 0.0,
                direction,
            });
            if let Some(sink) = animation.as_mut() {
                sink.trigger(AnimationTrigger::Roll);
            }
            return Vec3::ZERO;
        }

        let mut horizontal = Vec3::ZERO;
        if has_input {
            let target = rotation_from_yaw(heading);
            self.kinematic.orientation = slerp_clamped(
                self.kinematic.orientation,
                target,
                self.config.rotation_speed * dt,
            );

            let speed = self.movement_speed(input.run);
            horizontal = yaw_forward(heading) * speed * dt;
            if self.kinematic.state == LocomotionState::Idle {
                self.transition(LocomotionState::Moving);
            }
            if let Some(sink) = animation.as_mut() {
                sink.set_speed(speed);
            }
        } else {
            if self.kinematic.state == LocomotionState::Moving {
                self.transition(LocomotionState::Idle);
            }
            if let Some(sink) = animation.as_mut() {
                sink.set_speed(0.0);
            }
        }

        if input.jump
            && grounded
            && matches!(
                self.kinematic.state,
                LocomotionState::Idle | LocomotionState::Moving
            )
        {
            self.kinematic.vertical_velocity = self.config.jump_velocity();
            self.transition(LocomotionState::Jumping);
            if let Some(sink) = animation.as_mut() {
                sink.trigger(AnimationTrigger::Jump);
            }
        }

        horizontal
    }

    fn toggle_crouch(&mut self, has_input: bool, animation: &mut Option<&mut dyn AnimationSink>) {
        let crouching = self.kinematic.state.stance().toggled() == Stance::Crouching;
        let next = if crouching {
            LocomotionState::Crouching
        } else if has_input {
            LocomotionState::Moving
        } else {
            LocomotionState::Idle
        };
        self.transition(next);
        if let Some(sink) = animation.as_mut() {
            sink.set_crouching(crouching);
        }
    }

    /// Move along the roll direction for this frame and end the roll on time.
    fn advance_roll(&mut self, dt: f32) -> Vec3 {
        let LocomotionState::Rolling { elapsed, direction } = self.kinematic.state else {
            return Vec3::ZERO;
        };
        let duration = self.config.roll_duration;
        let step = dt.min((duration - elapsed).max(0.0));
        let displacement = direction * self.config.roll_speed() * step;

        let elapsed = elapsed + dt;
        if elapsed >= duration {
            self.transition(LocomotionState::Idle);
        } else {
            self.kinematic.state = LocomotionState::Rolling { elapsed, direction };
        }
        displacement
    }

    fn movement_speed(&self, run: bool) -> f32 {
        match self.kinematic.state {
            LocomotionState::Crouching => self.config.crouch_speed,
            _ if run => self.config.run_speed,
            _ => self.config.walk_speed,
        }
    }

    fn transition(&mut self, next: LocomotionState) {
        let previous = self.kinematic.state;
        self.kinematic.state = next;
        if !previous.same_kind(&next) {
            debug!(
                target: "locomotion",
                from = previous.name(),
                to = next.name(),
                "state transition"
            );
        }
    }
}
