//! Chase Camera Module
//!
//! Third-person orbit camera that trails a character, pulls in when geometry
//! sits between the character and the camera, and smooths both position and
//! rotation. Window-system agnostic: pointer and scroll deltas come in as
//! plain numbers, and collision comes from a [`CollisionWorld`].
//!
//! # Frame Update
//!
//! 1. Orbit input: yaw and pitch from pointer delta (only while the cursor is
//!    locked), zoom from scroll (always)
//! 2. Anchor = target position + `target_offset`
//! 3. Sphere cast from the anchor toward the camera for `desired + buffer`;
//!    a hit pulls the camera in to `max(hit - buffer, min_distance)`
//! 4. Critically damped spring toward the resulting position
//! 5. Look from the smoothed position at the anchor, slerped by
//!    `rotation_smoothing * dt`
//!
//! # Usage
//!
//! ```rust,ignore
//! use escape_run_engine::camera::{CameraInput, ChaseCamera, ChaseCameraConfig};
//!
//! let mut camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(character.transform()), &world);
//!
//! // Each frame, after the character has moved:
//! let input = CameraInput { pointer_delta, scroll, cursor_locked: true };
//! let pose = camera.update(delta_time, &input, character.position(), &world);
//! renderer.set_view(pose.position, pose.rotation);
//! ```

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use super::orbit::{orbit_direction, resolve_distance};
use crate::physics::{
    CollisionWorld, LayerMask, look_rotation, slerp_clamped, smooth_damp, yaw_forward,
};
use crate::player::{CharacterTransform, MAX_FRAME_DT};

// =============================================================================
// Configuration
// =============================================================================

/// Camera collision configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraCollisionConfig {
    /// Whether occlusion checks run at all
    pub enabled: bool,
    /// Radius of the probe sphere
    pub radius: f32,
    /// Gap kept between the camera and whatever it hit
    pub buffer: f32,
    /// Layers that block the camera
    pub mask: LayerMask,
}

impl Default for CameraCollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 0.3,
            buffer: 0.2,
            mask: LayerMask::ALL,
        }
    }
}

/// Chase camera tuning. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseCameraConfig {
    /// Anchor offset above the character's feet (eye level)
    pub target_offset: Vec3,
    /// Starting distance
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per scroll notch
    pub zoom_step: f32,
    /// Degrees per pointer unit, x = yaw and y = pitch
    pub sensitivity_deg: Vec2,
    pub min_pitch_deg: f32,
    pub max_pitch_deg: f32,
    pub initial_pitch_deg: f32,
    pub initial_yaw_deg: f32,
    /// Position spring rate; the smoothing time constant is its inverse
    pub position_smoothing: f32,
    /// Rotation slerp rate per second
    pub rotation_smoothing: f32,
    pub invert_y: bool,
    pub collision: CameraCollisionConfig,
}

impl Default for ChaseCameraConfig {
    fn default() -> Self {
        Self {
            target_offset: Vec3::new(0.0, 1.5, 0.0),
            distance: 5.0,
            min_distance: 1.0,
            max_distance: 8.0,
            zoom_step: 2.0,
            sensitivity_deg: Vec2::splat(3.0),
            min_pitch_deg: -30.0,
            max_pitch_deg: 70.0,
            initial_pitch_deg: 20.0,
            initial_yaw_deg: 0.0,
            position_smoothing: 10.0,
            rotation_smoothing: 10.0,
            invert_y: false,
            collision: CameraCollisionConfig::default(),
        }
    }
}

impl ChaseCameraConfig {
    /// Pitch limits in radians.
    pub fn pitch_limits(&self) -> (f32, f32) {
        (self.min_pitch_deg.to_radians(), self.max_pitch_deg.to_radians())
    }

    /// Spring time constant in seconds.
    pub fn smooth_time(&self) -> f32 {
        if self.position_smoothing > 0.0 {
            1.0 / self.position_smoothing
        } else {
            0.0
        }
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

// =============================================================================
// State
// =============================================================================

/// Orbit and smoothing state carried across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    /// Radians, unbounded
    pub yaw: f32,
    /// Radians, within the configured pitch limits
    pub pitch: f32,
    /// Zoom distance, within `[min_distance, max_distance]`
    pub desired_distance: f32,
    /// Distance after occlusion this frame
    pub effective_distance: f32,
    pub smoothed_position: Vec3,
    pub smooth_velocity: Vec3,
}

/// Where the camera is and where it looks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Orbit input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    pub pointer_delta: Vec2,
    pub scroll: f32,
    /// Pointer deltas are ignored while the cursor is free
    pub cursor_locked: bool,
}

// =============================================================================
// ChaseCamera
// =============================================================================

/// Collision-aware third-person chase camera.
#[derive(Clone, Debug)]
pub struct ChaseCamera {
    config: ChaseCameraConfig,
    orbit: OrbitState,
    rotation: Quat,
    enabled: bool,
}

impl ChaseCamera {
    /// Create the camera around a target and snap it into place.
    ///
    /// Without a target the camera comes up disabled: every update is a no-op
    /// until [`ChaseCamera::set_target`] provides one.
    pub fn spawn(
        config: ChaseCameraConfig,
        target: Option<CharacterTransform>,
        world: &dyn CollisionWorld,
    ) -> Self {
        let (min_pitch, max_pitch) = config.pitch_limits();
        let mut camera = Self {
            orbit: OrbitState {
                yaw: config.initial_yaw_deg.to_radians(),
                pitch: config.initial_pitch_deg.to_radians().clamp(min_pitch, max_pitch),
                desired_distance: config.clamp_distance(config.distance),
                effective_distance: config.clamp_distance(config.distance),
                smoothed_position: Vec3::ZERO,
                smooth_velocity: Vec3::ZERO,
            },
            config,
            rotation: Quat::IDENTITY,
            enabled: false,
        };

        match target {
            Some(target) => camera.set_target(target, world),
            None => error!(target: "camera", "chase camera has no target, disabling"),
        }
        camera
    }

    pub fn config(&self) -> &ChaseCameraConfig {
        &self.config
    }

    /// Replace the tuning, re-clamping the current orbit to the new limits.
    pub fn set_config(&mut self, config: ChaseCameraConfig) {
        let (min_pitch, max_pitch) = config.pitch_limits();
        self.orbit.pitch = self.orbit.pitch.clamp(min_pitch, max_pitch);
        self.orbit.desired_distance = config.clamp_distance(self.orbit.desired_distance);
        self.config = config;
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn yaw(&self) -> f32 {
        self.orbit.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.orbit.pitch
    }

    pub fn desired_distance(&self) -> f32 {
        self.orbit.desired_distance
    }

    pub fn effective_distance(&self) -> f32 {
        self.orbit.effective_distance
    }

    /// Yaw for camera-relative movement, `None` while disabled.
    pub fn reference_yaw(&self) -> Option<f32> {
        self.enabled.then_some(self.orbit.yaw)
    }

    /// Horizontal direction the camera faces.
    pub fn flat_forward(&self) -> Vec3 {
        yaw_forward(self.orbit.yaw)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.orbit.smoothed_position,
            rotation: self.rotation,
        }
    }

    /// Anchor point the camera orbits and looks at.
    pub fn anchor(&self, target_position: Vec3) -> Vec3 {
        target_position + self.config.target_offset
    }

    /// Follow `target` and snap to it.
    pub fn set_target(&mut self, target: CharacterTransform, world: &dyn CollisionWorld) {
        self.enabled = true;
        self.reset(target.position, world);
        debug!(target: "camera", position = ?target.position, "chase camera target set");
    }

    /// Stop following; updates become no-ops and the pose freezes.
    pub fn clear_target(&mut self) {
        if self.enabled {
            self.enabled = false;
            debug!(target: "camera", "chase camera target cleared");
        }
    }

    /// Snap to the current orbit around `target_position`, dropping smoothing.
    pub fn reset(&mut self, target_position: Vec3, world: &dyn CollisionWorld) {
        let anchor = self.anchor(target_position);
        let position = self.resolve_position(anchor, world);
        self.orbit.smoothed_position = position;
        self.orbit.smooth_velocity = Vec3::ZERO;
        if let Some(rotation) = look_rotation(anchor - position) {
            self.rotation = rotation;
        }
    }

    /// Apply pointer and scroll input to the orbit.
    pub fn apply_orbit_input(&mut self, input: &CameraInput) {
        if !self.enabled {
            return;
        }

        if input.cursor_locked {
            let sensitivity = Vec2::new(
                self.config.sensitivity_deg.x.to_radians(),
                self.config.sensitivity_deg.y.to_radians(),
            );
            let dy = if self.config.invert_y {
                -input.pointer_delta.y
            } else {
                input.pointer_delta.y
            };
            let (min_pitch, max_pitch) = self.config.pitch_limits();

            self.orbit.yaw += input.pointer_delta.x * sensitivity.x;
            self.orbit.pitch = (self.orbit.pitch - dy * sensitivity.y).clamp(min_pitch, max_pitch);
        }

        if input.scroll != 0.0 {
            self.orbit.desired_distance = self
                .config
                .clamp_distance(self.orbit.desired_distance - input.scroll * self.config.zoom_step);
        }
    }

    /// Place the camera for this frame around the committed target position.
    pub fn follow(&mut self, dt: f32, target_position: Vec3, world: &dyn CollisionWorld) -> CameraPose {
        if !self.enabled {
            return self.pose();
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let anchor = self.anchor(target_position);
        let desired_position = self.resolve_position(anchor, world);

        self.orbit.smoothed_position = smooth_damp(
            self.orbit.smoothed_position,
            desired_position,
            &mut self.orbit.smooth_velocity,
            self.config.smooth_time(),
            dt,
        );

        // Camera on top of the anchor: keep the previous rotation
        if let Some(look) = look_rotation(anchor - self.orbit.smoothed_position) {
            self.rotation = slerp_clamped(self.rotation, look, self.config.rotation_smoothing * dt);
        }

        self.pose()
    }

    /// Orbit input followed by placement.
    pub fn update(
        &mut self,
        dt: f32,
        input: &CameraInput,
        target_position: Vec3,
        world: &dyn CollisionWorld,
    ) -> CameraPose {
        self.apply_orbit_input(input);
        self.follow(dt, target_position, world)
    }

    /// Occlusion-adjusted camera position for the current orbit.
    fn resolve_position(&mut self, anchor: Vec3, world: &dyn CollisionWorld) -> Vec3 {
        let direction = orbit_direction(self.orbit.pitch, self.orbit.yaw);
        let desired = self.orbit.desired_distance;
        let collision = &self.config.collision;

        let effective = if collision.enabled {
            let hit = world
                .sphere_cast(anchor, collision.radius, direction, desired + collision.buffer, collision.mask)
                .map(|hit| hit.distance);
            if let Some(distance) = hit {
                trace!(target: "camera", distance, "camera occluded");
            }
            resolve_distance(desired, self.config.min_distance, collision.buffer, hit)
        } else {
            desired
        };

        self.orbit.effective_distance = effective;
        anchor + direction * effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NoCollision;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn target() -> CharacterTransform {
        CharacterTransform {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    fn locked(pointer_delta: Vec2) -> CameraInput {
        CameraInput {
            pointer_delta,
            scroll: 0.0,
            cursor_locked: true,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ChaseCameraConfig::default();
        assert_eq!(config.target_offset, Vec3::new(0.0, 1.5, 0.0));
        assert!(approx_eq(config.smooth_time(), 0.1));
        assert!(config.collision.enabled);
    }

    #[test]
    fn test_spawn_snaps_to_orbit() {
        let camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(target()), &NoCollision);
        assert!(camera.is_enabled());
        assert!(approx_eq(camera.pitch(), 20f32.to_radians()));

        let anchor = Vec3::new(0.0, 1.5, 0.0);
        let pose = camera.pose();
        assert!(approx_eq(pose.position.distance(anchor), 5.0));
        // Looking at the anchor
        assert!((pose.forward() - (anchor - pose.position).normalize()).length() < EPSILON);
    }

    #[test]
    fn test_yaw_accumulates_unbounded() {
        let mut camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(target()), &NoCollision);
        for _ in 0..20 {
            camera.apply_orbit_input(&locked(Vec2::new(10.0, 0.0)));
        }
        // Past a full turn, no wrapping
        assert!(approx_eq(camera.yaw(), 600f32.to_radians()));
    }

    #[test]
    fn test_invert_y_flips_pitch() {
        let config = ChaseCameraConfig {
            invert_y: true,
            ..Default::default()
        };
        let mut camera = ChaseCamera::spawn(config, Some(target()), &NoCollision);
        let before = camera.pitch();
        camera.apply_orbit_input(&locked(Vec2::new(0.0, 1.0)));
        assert!(camera.pitch() > before);
    }

    #[test]
    fn test_zoom_ignores_cursor_lock() {
        let mut camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(target()), &NoCollision);
        camera.apply_orbit_input(&CameraInput {
            pointer_delta: Vec2::ZERO,
            scroll: 1.0,
            cursor_locked: false,
        });
        assert!(approx_eq(camera.desired_distance(), 3.0));
    }

    #[test]
    fn test_collision_disabled_ignores_hits() {
        struct AlwaysHit;
        impl CollisionWorld for AlwaysHit {
            fn sphere_cast(
                &self,
                origin: Vec3,
                _radius: f32,
                direction: Vec3,
                _max_distance: f32,
                _mask: LayerMask,
            ) -> Option<crate::physics::SphereHit> {
                Some(crate::physics::SphereHit {
                    distance: 2.0,
                    point: origin + direction * 2.0,
                    normal: -direction,
                })
            }
        }

        let mut config = ChaseCameraConfig::default();
        let camera = ChaseCamera::spawn(config, Some(target()), &AlwaysHit);
        assert!(approx_eq(camera.effective_distance(), 1.8));

        config.collision.enabled = false;
        let camera = ChaseCamera::spawn(config, Some(target()), &AlwaysHit);
        assert!(approx_eq(camera.effective_distance(), 5.0));
    }

    #[test]
    fn test_set_config_reclamps() {
        let mut camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(target()), &NoCollision);
        let config = ChaseCameraConfig {
            max_distance: 3.0,
            max_pitch_deg: 10.0,
            ..Default::default()
        };
        camera.set_config(config);
        assert!(approx_eq(camera.desired_distance(), 3.0));
        assert!(approx_eq(camera.pitch(), 10f32.to_radians()));
    }

    #[test]
    fn test_clear_target_freezes_pose() {
        let mut camera = ChaseCamera::spawn(ChaseCameraConfig::default(), Some(target()), &NoCollision);
        let before = camera.pose();
        camera.clear_target();
        assert!(camera.reference_yaw().is_none());

        let after = camera.update(0.016, &locked(Vec2::new(50.0, 5.0)), Vec3::new(10.0, 0.0, 0.0), &NoCollision);
        assert_eq!(before, after);
    }
}
