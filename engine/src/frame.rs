//! Per-frame character rig
//!
//! [`CharacterRig`] owns one character's locomotion controller, chase camera
//! and cursor lock, and runs them in a fixed order each frame:
//!
//! ```text
//! input -> cursor lock -> locomotion (commits position) -> camera
//! ```
//!
//! # Update Order
//!
//! Movement is relative to the camera yaw, and the camera follows the
//! character position. One of them has to go first:
//!
//! - [`UpdateOrder::LocomotionFirst`] (default): locomotion reads the yaw the
//!   camera had at the end of the previous frame, so a mouse flick turns the
//!   movement direction one frame late. The camera then orbits and places
//!   itself around the position committed this frame.
//! - [`UpdateOrder::CameraOrbitFirst`]: the camera applies pointer input
//!   first, locomotion reads this frame's yaw, then the camera places itself
//!   around the committed position. No lag either way.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::camera::{CameraInput, CameraPose, ChaseCamera};
use crate::config::RigConfig;
use crate::input::{CursorLock, FrameInput, InputSource};
use crate::physics::CollisionWorld;
use crate::player::{
    AnimationSink, LocomotionContext, LocomotionController, LocomotionInput, LocomotionState,
};

/// Which stage reads the other's output from the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// Locomotion uses last frame's camera yaw
    #[default]
    LocomotionFirst,
    /// Camera orbit input is applied before locomotion
    CameraOrbitFirst,
}

/// Snapshot of a rig after one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frames completed, including this one
    pub frame: u64,
    pub state: LocomotionState,
    pub position: Vec3,
    pub yaw: f32,
    pub grounded: bool,
    pub camera: CameraPose,
    pub camera_enabled: bool,
    pub cursor_locked: bool,
    /// Interact edge passed through for trigger volumes
    pub interact: bool,
}

/// One character with its camera.
#[derive(Debug, Clone)]
pub struct CharacterRig {
    locomotion: LocomotionController,
    camera: ChaseCamera,
    cursor: CursorLock,
    order: UpdateOrder,
    frame: u64,
}

impl CharacterRig {
    /// Spawn a character at `spawn` facing the camera's initial yaw, with the
    /// camera snapped behind it.
    pub fn new(config: &RigConfig, spawn: Vec3, world: &dyn CollisionWorld) -> Self {
        let locomotion = LocomotionController::spawn(
            config.locomotion,
            spawn,
            config.camera.initial_yaw_deg.to_radians(),
        );
        let camera = ChaseCamera::spawn(config.camera, Some(locomotion.transform()), world);
        Self::from_parts(
            locomotion,
            camera,
            CursorLock::new(config.input.cursor_locked),
            config.update_order,
        )
    }

    /// Assemble from existing components.
    pub fn from_parts(
        locomotion: LocomotionController,
        camera: ChaseCamera,
        cursor: CursorLock,
        order: UpdateOrder,
    ) -> Self {
        Self {
            locomotion,
            camera,
            cursor,
            order,
            frame: 0,
        }
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn locomotion_mut(&mut self) -> &mut LocomotionController {
        &mut self.locomotion
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ChaseCamera {
        &mut self.camera
    }

    pub fn cursor(&self) -> &CursorLock {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorLock {
        &mut self.cursor
    }

    pub fn order(&self) -> UpdateOrder {
        self.order
    }

    pub fn set_order(&mut self, order: UpdateOrder) {
        self.order = order;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Poll `source` and run one frame.
    pub fn step(
        &mut self,
        dt: f32,
        source: &mut dyn InputSource,
        world: &dyn CollisionWorld,
        animation: Option<&mut dyn AnimationSink>,
    ) -> FrameReport {
        let input = source.poll();
        self.tick(dt, &input, world, animation)
    }

    /// Run one frame with an already sampled input.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &FrameInput,
        world: &dyn CollisionWorld,
        animation: Option<&mut dyn AnimationSink>,
    ) -> FrameReport {
        if input.escape {
            self.cursor.handle_escape();
        }

        let camera_input = CameraInput {
            pointer_delta: input.pointer_delta,
            scroll: input.scroll,
            cursor_locked: self.cursor.is_locked(),
        };
        let locomotion_input = LocomotionInput::from(input);

        match self.order {
            UpdateOrder::LocomotionFirst => {
                let ctx = LocomotionContext::new(world)
                    .with_reference_yaw(self.camera.reference_yaw())
                    .with_animation(animation);
                self.locomotion.update(dt, &locomotion_input, ctx);
                self.camera
                    .update(dt, &camera_input, self.locomotion.position(), world);
            }
            UpdateOrder::CameraOrbitFirst => {
                self.camera.apply_orbit_input(&camera_input);
                let ctx = LocomotionContext::new(world)
                    .with_reference_yaw(self.camera.reference_yaw())
                    .with_animation(animation);
                self.locomotion.update(dt, &locomotion_input, ctx);
                self.camera.follow(dt, self.locomotion.position(), world);
            }
        }

        self.frame += 1;
        let report = self.report(input.interact);
        trace!(
            target: "rig",
            frame = report.frame,
            state = report.state.name(),
            position = ?report.position,
            "frame complete"
        );
        report
    }

    fn report(&self, interact: bool) -> FrameReport {
        FrameReport {
            frame: self.frame,
            state: self.locomotion.state(),
            position: self.locomotion.position(),
            yaw: self.locomotion.yaw(),
            grounded: self.locomotion.is_grounded(),
            camera: self.camera.pose(),
            camera_enabled: self.camera.is_enabled(),
            cursor_locked: self.cursor.is_locked(),
            interact,
        }
    }
}
