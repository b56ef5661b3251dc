//! The geometry query boundary.
//!
//! Movement code never talks to a concrete physics backend. It asks a
//! [`GeometryQuery`] for every surface a box would touch along a path and
//! filters the answer itself. [`CollisionWorld`](super::CollisionWorld) is the
//! parry3d implementation; tests are free to plug in scripted ones.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Identifier of a collider known to the query service.
///
/// The moving player box has an id too, so the world can be told to ignore
/// collisions between it and specific colliders (portal surfaces, doors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// One surface touched by a cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceContact {
    /// Distance travelled along the cast direction before touching.
    pub distance: f32,

    /// Surface normal, pointing away from the surface that was hit.
    pub normal: Vec3,

    /// Whether the collider is a trigger volume.
    pub is_trigger: bool,

    /// Collider that owns the surface.
    pub collider: ColliderId,

    /// The cast volume already overlapped this collider at its origin.
    ///
    /// Such contacts report `distance == 0` and a normal opposing the cast
    /// direction, since no real impact point exists.
    pub initial_overlap: bool,
}

impl SurfaceContact {
    /// Whether the surface is flat enough to stand on.
    #[inline]
    pub fn is_walkable(&self, min_normal_y: f32) -> bool {
        self.normal.y > min_normal_y
    }
}

/// Synchronous collision queries against level geometry.
pub trait GeometryQuery {
    /// Sweep an axis-aligned box through the world.
    ///
    /// Returns every surface whose collider matches `mask` and that the box
    /// touches within `max_distance`, ordered by ascending distance. Triggers
    /// and ignored colliders are included; callers filter them.
    fn cast_box(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Vec<SurfaceContact>;

    /// Cast a ray and return the nearest non-trigger surface it hits.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<SurfaceContact>;

    /// Whether collisions between two colliders are switched off.
    fn should_ignore_collision(&self, a: ColliderId, b: ColliderId) -> bool;
}

/// Drop triggers and ignored colliders, keeping distance order.
pub fn blocking_contacts<'a, Q: GeometryQuery + ?Sized>(
    query: &'a Q,
    contacts: &'a [SurfaceContact],
    mover: ColliderId,
) -> impl Iterator<Item = &'a SurfaceContact> + 'a {
    contacts
        .iter()
        .filter(|c| !c.is_trigger)
        .filter(move |c| !query.should_ignore_collision(c.collider, mover))
}
