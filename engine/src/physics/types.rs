//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the locomotion and camera code, re-exported from the glam library.

pub use glam::{Mat3, Quat, Vec2, Vec3};
