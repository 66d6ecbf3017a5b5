//! Smoothing and orientation helpers
//!
//! Small numeric utilities shared by the locomotion controller and the chase
//! camera: a critically-damped spring, clamped spherical interpolation, and
//! conversions between yaw angles and rotations.
//!
//! # Yaw Convention
//!
//! Yaw is measured in radians around +Y. Yaw 0 faces -Z, positive yaw turns
//! toward +X:
//!
//! - forward = `(sin(yaw), 0, -cos(yaw))`
//! - right   = `(cos(yaw), 0, sin(yaw))`
//!
//! Rotations follow the same convention: the identity rotation looks down -Z.

use glam::{Mat3, Quat, Vec3};

/// Smallest smoothing time constant accepted by [`smooth_damp`].
const MIN_SMOOTH_TIME: f32 = 1.0e-4;

/// Below this squared length a direction is treated as degenerate.
const DEGENERATE_LENGTH_SQ: f32 = 1.0e-8;

/// Move `current` toward `target` with a critically-damped spring.
///
/// `velocity` carries the spring state between frames and is updated in place.
/// `smooth_time` is roughly the time needed to cover most of the distance.
/// The result never overshoots the target, so when the spring would pass it the
/// value lands exactly on `target` and the velocity is cleared.
///
/// Uses the rational approximation of `exp(-omega * dt)` from Game Programming
/// Gems 4, which stays stable for large steps.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let output = target + (change + temp) * decay;

    // Passed the target this step
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }

    output
}

/// Spherically interpolate between two rotations with `t` clamped to `[0, 1]`.
#[inline]
pub fn slerp_clamped(from: Quat, to: Quat, t: f32) -> Quat {
    from.slerp(to, t.clamp(0.0, 1.0)).normalize()
}

/// Build the rotation that looks along `direction` with +Y as up.
///
/// Returns `None` for a zero-length direction, leaving the caller to decide
/// what a degenerate look means.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if direction.length_squared() < DEGENERATE_LENGTH_SQ {
        return None;
    }
    let forward = direction.normalize();

    let mut right = forward.cross(Vec3::Y);
    if right.length_squared() < DEGENERATE_LENGTH_SQ {
        // Looking straight up or down
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = right.cross(forward).normalize();

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}

/// Horizontal forward vector for a yaw angle.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, -yaw.cos())
}

/// Yaw-only rotation whose forward vector is [`yaw_forward`]`(yaw)`.
#[inline]
pub fn rotation_from_yaw(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw)
}

/// Extract the yaw of a rotation from its forward vector.
///
/// A rotation looking straight up or down has no defined heading and yields 0.
pub fn yaw_from_rotation(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::NEG_Z;
    if forward.x.abs() < 1.0e-6 && forward.z.abs() < 1.0e-6 {
        return 0.0;
    }
    forward.x.atan2(-forward.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1.0e-4;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut current = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;

        for _ in 0..600 {
            current = smooth_damp(current, target, &mut velocity, 0.1, 1.0 / 60.0);
            assert!(current.x <= target.x + EPSILON, "overshoot: {}", current.x);
        }

        assert!(approx_vec(current, target));
    }

    #[test]
    fn test_smooth_damp_is_monotonic() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut current = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;
        let mut last = current.y;

        for _ in 0..120 {
            current = smooth_damp(current, target, &mut velocity, 0.25, 1.0 / 60.0);
            assert!(current.y >= last);
            last = current.y;
        }
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut velocity = Vec3::new(1.0, 2.0, 3.0);
        let current = Vec3::new(4.0, 5.0, 6.0);
        let out = smooth_damp(current, Vec3::ZERO, &mut velocity, 0.1, 0.0);
        assert_eq!(out, current);
        assert_eq!(velocity, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_smooth_damp_frame_rate_independent() {
        let target = Vec3::new(3.0, 0.0, 0.0);

        let mut fast = Vec3::ZERO;
        let mut fast_velocity = Vec3::ZERO;
        for _ in 0..120 {
            fast = smooth_damp(fast, target, &mut fast_velocity, 0.2, 1.0 / 120.0);
        }

        let mut slow = Vec3::ZERO;
        let mut slow_velocity = Vec3::ZERO;
        for _ in 0..30 {
            slow = smooth_damp(slow, target, &mut slow_velocity, 0.2, 1.0 / 30.0);
        }

        // One second either way, both should be close to the same point
        assert!((fast - slow).length() < 0.05);
    }

    #[test]
    fn test_slerp_clamped_bounds() {
        let a = Quat::IDENTITY;
        let b = rotation_from_yaw(FRAC_PI_2);
        assert!(slerp_clamped(a, b, -1.0).angle_between(a) < EPSILON);
        assert!(slerp_clamped(a, b, 5.0).angle_between(b) < EPSILON);
    }

    #[test]
    fn test_yaw_round_trip_quarter_turns() {
        for yaw in [0.0, FRAC_PI_2, -FRAC_PI_2, PI * 0.75] {
            let rotation = rotation_from_yaw(yaw);
            assert!(approx_vec(rotation * Vec3::NEG_Z, yaw_forward(yaw)));
            assert!((yaw_from_rotation(rotation) - yaw).abs() < EPSILON);
        }
    }

    #[test]
    fn test_yaw_basis() {
        assert!(approx_vec(yaw_forward(0.0), Vec3::NEG_Z));
        assert!(approx_vec(yaw_forward(FRAC_PI_2), Vec3::X));
    }

    #[test]
    fn test_look_rotation_points_forward() {
        let dir = Vec3::new(1.0, -0.5, 2.0);
        let rotation = look_rotation(dir).unwrap();
        assert!(approx_vec(rotation * Vec3::NEG_Z, dir.normalize()));
        // Up vector keeps a positive Y component
        assert!((rotation * Vec3::Y).y > 0.0);
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert!(look_rotation(Vec3::ZERO).is_none());
        assert!(look_rotation(Vec3::splat(1.0e-6)).is_none());
    }

    #[test]
    fn test_look_rotation_straight_down() {
        let rotation = look_rotation(Vec3::NEG_Y).unwrap();
        assert!(approx_vec(rotation * Vec3::NEG_Z, Vec3::NEG_Y));
    }
}
