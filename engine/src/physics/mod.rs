//! Physics module
//!
//! Collision queries and numeric helpers shared by locomotion and the camera.
//! There is no rigid body simulation here: characters are kinematic and the
//! only "physics" is gravity integration inside the locomotion controller.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Angles in radians unless a field name ends in `_deg`
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`smoothing`] - Critically damped spring, slerp and yaw helpers
//! - [`collision`] - The [`CollisionWorld`] trait and a static reference world

pub mod collision;
pub mod smoothing;
pub mod types;

pub use collision::{
    Aabb, BodyState, BoxCollider, Capsule, CollisionWorld, GROUND_LAYER, LayerMask, NoCollision,
    SphereHit, StaticWorld, aabb_surface_normal, ray_aabb_span,
};
pub use smoothing::{
    look_rotation, rotation_from_yaw, slerp_clamped, smooth_damp, yaw_forward, yaw_from_rotation,
};
pub use types::{Quat, Vec2, Vec3};
