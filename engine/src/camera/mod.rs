//! Camera Module
//!
//! Third-person chase camera. This module is window-system agnostic: it only
//! deals with camera state and math, and reads geometry through
//! [`crate::physics::CollisionWorld`].

pub mod chase;
pub mod orbit;

pub use chase::{
    CameraCollisionConfig, CameraInput, CameraPose, ChaseCamera, ChaseCameraConfig, OrbitState,
};
pub use orbit::{orbit_direction, resolve_distance};
