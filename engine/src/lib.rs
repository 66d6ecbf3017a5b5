//! Escape Run Engine Library
//!
//! Third-person character core: kinematic locomotion with jump, crouch and
//! roll, plus a collision-aware orbiting chase camera. Rendering and windowing
//! stay with the host; this crate only consumes per-frame input and collision
//! queries and produces poses.
//!
//! # Modules
//!
//! - [`physics`] - Collision queries, reference static world, smoothing helpers
//! - [`input`] - Key bindings, edge detection, cursor lock, per-frame input
//! - [`player`] - Locomotion state machine, stances, health, animation hooks
//! - [`camera`] - Orbit chase camera with occlusion pull-in
//! - [`frame`] - Character rig that runs locomotion and camera each frame
//! - [`config`] - JSON rig configuration
//! - [`logging`] - `tracing` subscriber setup for binaries
//!
//! # Example
//!
//! ```ignore
//! use escape_run_engine::config::RigConfig;
//! use escape_run_engine::frame::CharacterRig;
//! use escape_run_engine::input::{DeviceInput, KeyCode};
//! use escape_run_engine::physics::StaticWorld;
//! use glam::Vec3;
//!
//! let world = StaticWorld::with_ground(0.0);
//! let config = RigConfig::default();
//! let mut rig = CharacterRig::new(&config, Vec3::ZERO, &world);
//! let mut device = DeviceInput::with_bindings(config.input.key_bindings());
//!
//! // Per window event
//! device.handle_key(KeyCode::W, true);
//! device.handle_pointer_motion(4.0, -1.0);
//!
//! // Per frame
//! let report = rig.step(dt, &mut device, &world, None);
//! draw_character(report.position, report.yaw);
//! set_view(report.camera.position, report.camera.rotation);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod logging;
pub mod physics;
pub mod player;

pub use camera::{CameraPose, ChaseCamera, ChaseCameraConfig};
pub use config::RigConfig;
pub use error::ConfigError;
pub use frame::{CharacterRig, FrameReport, UpdateOrder};
pub use input::{DeviceInput, FrameInput, InputSource, KeyCode, ScriptedInput};
pub use physics::{CollisionWorld, NoCollision, StaticWorld};
pub use player::{LocomotionConfig, LocomotionController, LocomotionState};
