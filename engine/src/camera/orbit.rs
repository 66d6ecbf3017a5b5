//! Orbit maths
//!
//! Pure functions behind the chase camera: where the orbit puts the camera and
//! how far occlusion lets it sit.
//!
//! Pitch is positive above the target. Yaw follows the crate-wide convention
//! (0 looks down -Z), so at yaw 0 the camera sits on the +Z side of its target
//! looking toward -Z.

use glam::Vec3;

/// Unit vector from the anchor to the camera for an orbit angle pair.
///
/// ```text
/// (-sin(yaw) cos(pitch), sin(pitch), cos(yaw) cos(pitch))
/// ```
///
/// This is the reverse of the camera's viewing direction, so a camera placed
/// along it looks along [`crate::physics::yaw_forward`]`(yaw)` when pitch is 0.
#[inline]
pub fn orbit_direction(pitch: f32, yaw: f32) -> Vec3 {
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(-sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
}

/// Distance the camera may sit from its anchor.
///
/// With an occluder at `hit` the camera pulls in to `max(hit - buffer,
/// min_distance)`, never further out than `desired`. Without one it sits at
/// `desired`.
#[inline]
pub fn resolve_distance(desired: f32, min_distance: f32, buffer: f32, hit: Option<f32>) -> f32 {
    match hit {
        Some(distance) => (distance - buffer).max(min_distance).min(desired),
        None => desired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::yaw_forward;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_orbit_direction_is_unit() {
        for (pitch, yaw) in [(0.0, 0.0), (0.5, 1.0), (-0.4, -2.0), (1.2, 3.0)] {
            assert!(approx_eq(orbit_direction(pitch, yaw).length(), 1.0));
        }
    }

    #[test]
    fn test_orbit_direction_behind_target() {
        // At zero pitch the camera sits opposite the yaw's forward
        for yaw in [0.0, FRAC_PI_2, -1.0] {
            let dir = orbit_direction(0.0, yaw);
            assert!((dir + yaw_forward(yaw)).length() < EPSILON);
        }
    }

    #[test]
    fn test_positive_pitch_is_above() {
        assert!(orbit_direction(0.3, 0.0).y > 0.0);
        assert!(orbit_direction(-0.3, 0.0).y < 0.0);
    }

    #[test]
    fn test_resolve_distance_cases() {
        assert!(approx_eq(resolve_distance(5.0, 1.0, 0.2, None), 5.0));
        assert!(approx_eq(resolve_distance(5.0, 1.0, 0.2, Some(2.0)), 1.8));
        // Degrades toward the minimum, never below it
        assert!(approx_eq(resolve_distance(5.0, 1.0, 0.2, Some(0.5)), 1.0));
        // Never beyond desired
        assert!(approx_eq(resolve_distance(5.0, 1.0, 0.2, Some(5.2)), 5.0));
    }
}
