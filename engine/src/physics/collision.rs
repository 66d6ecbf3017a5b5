//! Collision queries
//!
//! The locomotion controller and the chase camera never own geometry. They ask
//! a [`CollisionWorld`] three questions:
//!
//! - is this body standing on something ([`CollisionWorld::is_grounded`])
//! - where does a swept sphere first hit ([`CollisionWorld::sphere_cast`])
//! - where does a body end up after a requested move ([`CollisionWorld::resolve_move`])
//!
//! [`NoCollision`] answers "nothing, never, unobstructed" and is useful for
//! tests. [`StaticWorld`] is a small reference implementation built from an
//! optional ground plane and a list of axis-aligned boxes.
//!
//! # Sphere Casts
//!
//! A sphere cast against a box is a ray cast against the box grown by the sphere
//! radius (slab method). The corners of the grown box are square rather than
//! rounded, so casts that graze an edge report a hit slightly early. For camera
//! occlusion that errs on the safe side.
//!
//! # Example
//!
//! ```ignore
//! use escape_run_engine::physics::{Aabb, LayerMask, StaticWorld, CollisionWorld};
//! use glam::Vec3;
//!
//! let world = StaticWorld::with_ground(0.0)
//!     .with_box(Aabb::new(Vec3::new(-1.0, 0.0, -6.0), Vec3::new(1.0, 3.0, -4.0)), 1);
//!
//! if let Some(hit) = world.sphere_cast(Vec3::Y, 0.3, Vec3::NEG_Z, 10.0, LayerMask::ALL) {
//!     println!("wall at {}", hit.distance);
//! }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Layer the ground plane of a [`StaticWorld`] lives on.
pub const GROUND_LAYER: u8 = 0;

/// Vertical tolerance used when deciding whether a body is supported.
pub const DEFAULT_GROUND_SKIN: f32 = 0.05;

// =============================================================================
// Shapes and layers
// =============================================================================

/// Upright capsule describing a character's collision volume.
///
/// The capsule stands on the body's position: its bottom sits at the feet and
/// its center is `center_offset` above them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capsule {
    /// Total height in meters
    pub height: f32,
    /// Height of the capsule center above the feet
    pub center_offset: f32,
    /// Horizontal radius in meters
    pub radius: f32,
}

impl Capsule {
    /// Creates a capsule centered halfway up its height.
    pub const fn upright(height: f32, radius: f32) -> Self {
        Self {
            height,
            center_offset: height * 0.5,
            radius,
        }
    }

    /// Height of the bottom of the capsule above the feet.
    #[inline]
    pub fn bottom_offset(&self) -> f32 {
        self.center_offset - self.height * 0.5
    }

    /// Height of the top of the capsule above the feet.
    #[inline]
    pub fn top_offset(&self) -> f32 {
        self.center_offset + self.height * 0.5
    }
}

impl Default for Capsule {
    fn default() -> Self {
        Self::upright(1.8, 0.3)
    }
}

/// Bit set of collision layers a query should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer; queries with this mask never hit.
    pub const NONE: Self = Self(0);

    /// Mask containing a single layer.
    pub const fn layer(layer: u8) -> Self {
        Self(1u32 << (layer as u32 % 32))
    }

    /// Whether `layer` is part of this mask.
    #[inline]
    pub fn contains(self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }

    /// Mask with `layer` removed.
    pub fn without(self, layer: u8) -> Self {
        Self(self.0 & !Self::layer(layer).0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// What a collision query needs to know about a character body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Feet position in world space
    pub position: Vec3,
    /// Current collision volume
    pub shape: Capsule,
}

/// Result of a sphere cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Distance the sphere center traveled before touching
    pub distance: f32,
    /// Approximate contact point on the hit surface
    pub point: Vec3,
    /// Outward surface normal at the contact
    pub normal: Vec3,
}

// =============================================================================
// CollisionWorld
// =============================================================================

/// Collision queries consumed by locomotion and the chase camera.
///
/// Every method has a default that behaves like empty space, so a world only
/// needs to override the queries it can actually answer.
pub trait CollisionWorld {
    /// Whether the body is resting on a surface.
    fn is_grounded(&self, _body: &BodyState) -> bool {
        false
    }

    /// Sweep a sphere from `origin` along the unit vector `direction`.
    ///
    /// Returns the first hit within `max_distance` on a layer in `mask`.
    /// Surfaces already overlapping the sphere at `origin` are ignored.
    fn sphere_cast(
        &self,
        _origin: Vec3,
        _radius: f32,
        _direction: Vec3,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<SphereHit> {
        None
    }

    /// Apply a requested displacement and return the body's new feet position.
    fn resolve_move(&self, body: &BodyState, displacement: Vec3) -> Vec3 {
        body.position + displacement
    }
}

/// Empty space: never grounded, never hit, every move succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollision;

impl CollisionWorld for NoCollision {}

// =============================================================================
// Ray helpers
// =============================================================================

/// Slab-method ray vs axis-aligned box test.
///
/// Returns the entry and exit distances along `ray_dir` when the infinite line
/// crosses the box and the exit lies in front of the origin. The entry distance
/// is negative when the origin is inside the box.
pub fn ray_aabb_span(ray_origin: Vec3, ray_dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let t1 = (min[axis] - origin) * inv;
        let t2 = (max[axis] - origin) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit >= t_enter && t_exit >= 0.0 {
        Some((t_enter, t_exit))
    } else {
        None
    }
}

/// Outward normal of the box face nearest to `point`.
pub fn aabb_surface_normal(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    let center = (min + max) * 0.5;
    let half_extents = ((max - min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

// =============================================================================
// StaticWorld
// =============================================================================

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box grown by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether `point` lies over the box footprint grown by `margin`.
    pub fn covers_xz(&self, point: Vec3, margin: f32) -> bool {
        point.x >= self.min.x - margin
            && point.x <= self.max.x + margin
            && point.z >= self.min.z - margin
            && point.z <= self.max.z + margin
    }
}

/// A box collider on a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    pub bounds: Aabb,
    pub layer: u8,
}

/// Reference [`CollisionWorld`]: an optional infinite ground plane plus boxes.
///
/// Bodies stand on the ground plane and on box tops, and are blocked
/// horizontally by boxes taller than the body's feet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticWorld {
    /// Height of the infinite ground plane, if any
    pub ground_height: Option<f32>,
    /// Box colliders
    pub colliders: Vec<BoxCollider>,
    /// Support tolerance for grounded checks
    #[serde(default = "default_ground_skin")]
    pub ground_skin: f32,
}

fn default_ground_skin() -> f32 {
    DEFAULT_GROUND_SKIN
}

impl StaticWorld {
    /// Empty world with no ground.
    pub fn new() -> Self {
        Self {
            ground_height: None,
            colliders: Vec::new(),
            ground_skin: DEFAULT_GROUND_SKIN,
        }
    }

    /// World with a ground plane at `height`.
    pub fn with_ground(height: f32) -> Self {
        Self {
            ground_height: Some(height),
            ..Self::new()
        }
    }

    /// Add a box collider on `layer`.
    pub fn with_box(mut self, bounds: Aabb, layer: u8) -> Self {
        self.add_box(bounds, layer);
        self
    }

    pub fn add_box(&mut self, bounds: Aabb, layer: u8) {
        self.colliders.push(BoxCollider { bounds, layer });
    }

    /// Highest supporting surface under `point` that is not above `max_height`.
    fn support_height(&self, point: Vec3, radius: f32, max_height: f32) -> Option<f32> {
        let boxes = self
            .colliders
            .iter()
            .filter(|c| c.bounds.covers_xz(point, radius) && c.bounds.max.y <= max_height)
            .map(|c| c.bounds.max.y);

        self.ground_height
            .into_iter()
            .chain(boxes)
            .fold(None, |best: Option<f32>, h| Some(best.map_or(h, |b| b.max(h))))
    }

    /// Whether a body with its feet at `feet` overlaps a box it cannot step onto.
    fn blocked(&self, feet: Vec3, shape: &Capsule) -> bool {
        let bottom = feet.y + shape.bottom_offset() + self.ground_skin;
        let top = feet.y + shape.top_offset();
        self.colliders.iter().any(|c| {
            c.bounds.covers_xz(feet, shape.radius) && c.bounds.max.y > bottom && c.bounds.min.y < top
        })
    }
}

impl CollisionWorld for StaticWorld {
    fn is_grounded(&self, body: &BodyState) -> bool {
        let feet = body.position;
        match self.support_height(feet, body.shape.radius, feet.y + self.ground_skin) {
            Some(height) => feet.y - height <= self.ground_skin,
            None => false,
        }
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SphereHit> {
        if direction.length_squared() < 1e-12 || max_distance <= 0.0 {
            return None;
        }
        let direction = direction.normalize();
        let mut best: Option<SphereHit> = None;

        if let Some(ground) = self.ground_height {
            if mask.contains(GROUND_LAYER) && direction.y < 0.0 && origin.y - radius > ground {
                let distance = (origin.y - radius - ground) / -direction.y;
                if distance <= max_distance {
                    let center = origin + direction * distance;
                    best = Some(SphereHit {
                        distance,
                        point: Vec3::new(center.x, ground, center.z),
                        normal: Vec3::Y,
                    });
                }
            }
        }

        for collider in self.colliders.iter().filter(|c| mask.contains(c.layer)) {
            let grown = collider.bounds.expanded(radius);
            if grown.contains(origin) {
                continue;
            }
            let Some((t_enter, _)) = ray_aabb_span(origin, direction, grown.min, grown.max) else {
                continue;
            };
            if t_enter < 0.0 || t_enter > max_distance {
                continue;
            }
            if best.is_some_and(|b| b.distance <= t_enter) {
                continue;
            }
            let center = origin + direction * t_enter;
            let normal = aabb_surface_normal(center, grown.min, grown.max);
            best = Some(SphereHit {
                distance: t_enter,
                point: center - normal * radius,
                normal,
            });
        }

        best
    }

    fn resolve_move(&self, body: &BodyState, displacement: Vec3) -> Vec3 {
        let mut feet = body.position;

        // Horizontal axes one at a time so the body slides along walls
        for step in [Vec3::new(displacement.x, 0.0, 0.0), Vec3::new(0.0, 0.0, displacement.z)] {
            if step == Vec3::ZERO {
                continue;
            }
            let candidate = feet + step;
            if !self.blocked(candidate, &body.shape) {
                feet = candidate;
            }
        }

        let start_y = feet.y;
        feet.y += displacement.y;

        // Only surfaces the body was above at the start of the move can catch it
        if let Some(support) = self.support_height(feet, body.shape.radius, start_y + self.ground_skin) {
            if feet.y < support {
                feet.y = support;
            }
        }

        feet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn body_at(position: Vec3) -> BodyState {
        BodyState {
            position,
            shape: Capsule::default(),
        }
    }

    fn wall_world() -> StaticWorld {
        // Wall spanning x in [-2, 2] with its near face at z = -5
        StaticWorld::with_ground(0.0).with_box(
            Aabb::new(Vec3::new(-2.0, 0.0, -6.0), Vec3::new(2.0, 3.0, -5.0)),
            1,
        )
    }

    #[test]
    fn test_ray_aabb_span_hit() {
        let span = ray_aabb_span(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        let (enter, exit) = span.unwrap();
        assert!(approx_eq(enter, 4.0));
        assert!(approx_eq(exit, 6.0));
    }

    #[test]
    fn test_ray_aabb_span_parallel_miss() {
        let span = ray_aabb_span(
            Vec3::new(0.0, 5.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(span.is_none());
    }

    #[test]
    fn test_ray_aabb_span_behind() {
        let span = ray_aabb_span(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(span.is_none());
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::ALL.without(3);
        assert!(mask.contains(0));
        assert!(!mask.contains(3));
        assert!(!LayerMask::NONE.contains(0));
        assert!(LayerMask::layer(5).contains(5));
    }

    #[test]
    fn test_capsule_offsets() {
        let shape = Capsule::upright(1.0, 0.3);
        assert!(approx_eq(shape.bottom_offset(), 0.0));
        assert!(approx_eq(shape.top_offset(), 1.0));
    }

    #[test]
    fn test_no_collision_defaults() {
        let world = NoCollision;
        let body = body_at(Vec3::ZERO);
        assert!(!world.is_grounded(&body));
        assert!(world.sphere_cast(Vec3::ZERO, 0.3, Vec3::X, 10.0, LayerMask::ALL).is_none());
        assert_eq!(world.resolve_move(&body, Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_grounded_on_plane() {
        let world = StaticWorld::with_ground(0.0);
        assert!(world.is_grounded(&body_at(Vec3::ZERO)));
        assert!(world.is_grounded(&body_at(Vec3::new(0.0, 0.03, 0.0))));
        assert!(!world.is_grounded(&body_at(Vec3::new(0.0, 0.5, 0.0))));
    }

    #[test]
    fn test_grounded_on_box_top() {
        let world = StaticWorld::new().with_box(Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)), 1);
        assert!(world.is_grounded(&body_at(Vec3::new(0.0, 1.0, 0.0))));
        assert!(!world.is_grounded(&body_at(Vec3::new(5.0, 1.0, 0.0))));
    }

    #[test]
    fn test_sphere_cast_hits_wall() {
        let world = wall_world();
        let hit = world
            .sphere_cast(Vec3::new(0.0, 1.0, 0.0), 0.3, Vec3::NEG_Z, 10.0, LayerMask::ALL)
            .unwrap();
        assert!(approx_eq(hit.distance, 4.7));
        assert_eq!(hit.normal, Vec3::Z);
        assert!(approx_eq(hit.point.z, -5.0));
    }

    #[test]
    fn test_sphere_cast_respects_range_and_mask() {
        let world = wall_world();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(world.sphere_cast(origin, 0.3, Vec3::NEG_Z, 4.0, LayerMask::ALL).is_none());
        assert!(
            world
                .sphere_cast(origin, 0.3, Vec3::NEG_Z, 10.0, LayerMask::ALL.without(1))
                .is_none()
        );
    }

    #[test]
    fn test_sphere_cast_hits_ground() {
        let world = StaticWorld::with_ground(0.0);
        let hit = world
            .sphere_cast(Vec3::new(0.0, 2.0, 0.0), 0.5, Vec3::NEG_Y, 10.0, LayerMask::ALL)
            .unwrap();
        assert!(approx_eq(hit.distance, 1.5));
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_sphere_cast_ignores_initial_overlap() {
        let world = wall_world();
        let hit = world.sphere_cast(Vec3::new(0.0, 1.0, -5.5), 0.3, Vec3::Z, 10.0, LayerMask::layer(1));
        assert!(hit.is_none());
    }

    #[test]
    fn test_resolve_move_lands_on_ground() {
        let world = StaticWorld::with_ground(0.0);
        let end = world.resolve_move(&body_at(Vec3::new(0.0, 0.1, 0.0)), Vec3::new(1.0, -0.5, 0.0));
        assert!(approx_eq(end.x, 1.0));
        assert!(approx_eq(end.y, 0.0));
    }

    #[test]
    fn test_resolve_move_blocked_by_wall_slides() {
        let world = wall_world();
        let start = Vec3::new(0.0, 0.0, -4.6);
        let end = world.resolve_move(&body_at(start), Vec3::new(0.5, 0.0, -0.5));
        // Sideways part goes through, the part into the wall does not
        assert!(approx_eq(end.x, 0.5));
        assert!(approx_eq(end.z, -4.6));
    }
}
