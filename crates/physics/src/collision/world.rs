//! Collision world containing all static and dynamic geometry.
//!
//! The collision world stores every collider in the level and answers
//! [`GeometryQuery`] casts against them with parry3d.

use std::collections::HashSet;

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::{Cuboid, SharedShape};
use thiserror::Error;

use super::flags::ContentFlags;
use super::query::{ColliderId, GeometryQuery, SurfaceContact};

/// Penetration depth below which a starting overlap counts as touching.
const PENETRATION_TOLERANCE: f32 = 1.0e-3;

/// Contacts whose normal does not oppose the cast by at least this much are
/// grazing (sliding along a floor, moving away from a wall) and never block.
const GRAZING_EPSILON: f32 = 1.0e-4;

/// Errors raised while building collision geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("convex hull needs at least 4 non-coplanar points, got {0}")]
    DegenerateHull(usize),
}

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: ColliderId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, trigger, player clip...).
    pub contents: ContentFlags,
}

impl CollisionBrush {
    #[inline]
    fn is_trigger(&self) -> bool {
        self.contents.contains(ContentFlags::TRIGGER)
    }
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes (axis-aligned and oriented, e.g. ramps)
/// - Convex hull brushes
/// - Pairs of colliders that ignore each other
///
/// The world is only mutated between ticks; queries take `&self`.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    /// Collider pairs that never collide, stored with the smaller id first.
    ignored_pairs: HashSet<(ColliderId, ColliderId)>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for a collider that lives outside the world, such as the
    /// player's own box.
    pub fn allocate_id(&mut self) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> ColliderId {
        self.add_oriented_box(center, half_extents, Vec3::ZERO, contents)
    }

    /// Add a rotated box to the world.
    ///
    /// `rotation` is a scaled axis (axis times angle in radians). A box
    /// rotated about Z makes a ramp along X.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Vec3,
        contents: ContentFlags,
    ) -> ColliderId {
        let id = self.allocate_id();
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(to_vector(center), to_vector(rotation));

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });

        id
    }

    /// Add a convex hull to the world.
    pub fn add_convex_hull(&mut self, points: &[Vec3], contents: ContentFlags) -> Result<ColliderId, GeometryError> {
        if points.len() < 4 {
            return Err(GeometryError::DegenerateHull(points.len()));
        }

        let parry_points: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let shape = SharedShape::convex_hull(&parry_points).ok_or(GeometryError::DegenerateHull(points.len()))?;
        let id = self.allocate_id();

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform: Isometry::identity(),
            contents,
        });

        Ok(id)
    }

    /// Move a brush, e.g. a door or platform. Returns false for unknown ids.
    pub fn set_brush_position(&mut self, id: ColliderId, center: Vec3) -> bool {
        match self.brushes.iter_mut().find(|b| b.id == id) {
            Some(brush) => {
                brush.transform.translation = to_vector(center).into();
                true
            }
            None => false,
        }
    }

    /// Turn collisions between two colliders off (or back on).
    pub fn set_ignore_collision(&mut self, a: ColliderId, b: ColliderId, ignore: bool) {
        let key = ordered_pair(a, b);
        if ignore {
            self.ignored_pairs.insert(key);
        } else {
            self.ignored_pairs.remove(&key);
        }
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    /// Cast the box against a single brush.
    ///
    /// A box that starts touching the brush (within `PENETRATION_TOLERANCE`)
    /// is hit at distance zero with the real surface normal. Deeper
    /// penetration is reported as an initial overlap whose normal opposes
    /// the cast.
    fn cast_against(
        &self,
        brush: &CollisionBrush,
        mover: &Cuboid,
        mover_pos: &Isometry<Real>,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SurfaceContact> {
        let (distance, normal, initial_overlap) = match self.starting_contact(brush, mover, mover_pos) {
            Some(contact) if contact.dist >= -PENETRATION_TOLERANCE => {
                (0.0, from_vector(contact.normal2.into_inner()), false)
            }
            Some(_) => (0.0, -direction, true),
            None => self.sweep_against(brush, mover, mover_pos, direction, max_distance)?,
        };

        if !initial_overlap && normal.dot(direction) > -GRAZING_EPSILON {
            return None;
        }

        Some(SurfaceContact {
            distance,
            normal,
            is_trigger: brush.is_trigger(),
            collider: brush.id,
            initial_overlap,
        })
    }

    /// Contact between the box at rest and a brush it touches or overlaps.
    fn starting_contact(
        &self,
        brush: &CollisionBrush,
        mover: &Cuboid,
        mover_pos: &Isometry<Real>,
    ) -> Option<query::Contact> {
        query::contact(
            mover_pos,
            mover,
            &brush.transform,
            brush.shape.as_ref(),
            PENETRATION_TOLERANCE,
        )
        .unwrap_or_else(|_| {
            log::trace!("unsupported contact query against brush {:?}", brush.id);
            None
        })
    }

    /// Time of impact and world-space normal for a box that starts clear of
    /// the brush.
    fn sweep_against(
        &self,
        brush: &CollisionBrush,
        mover: &Cuboid,
        mover_pos: &Isometry<Real>,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<(f32, Vec3, bool)> {
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: false,
        };

        match query::cast_shapes(
            mover_pos,
            &to_vector(direction),
            mover,
            &brush.transform,
            &Vector::zeros(),
            brush.shape.as_ref(),
            options,
        ) {
            Ok(Some(hit)) if matches!(hit.status, ShapeCastStatus::PenetratingOrWithinTargetDist) => {
                Some((0.0, -direction, true))
            }
            Ok(Some(hit)) => {
                let normal = from_vector(brush.transform.rotation * hit.normal2.into_inner());
                Some((hit.time_of_impact, normal, false))
            }
            Ok(None) => None,
            Err(_) => {
                // Shape pair not supported by parry: treat as no contact
                log::trace!("unsupported shape cast against brush {:?}", brush.id);
                None
            }
        }
    }
}

impl GeometryQuery for CollisionWorld {
    fn cast_box(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Vec<SurfaceContact> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || half_extents.min_element() <= 0.0 {
            return Vec::new();
        }

        let mover = Cuboid::new(to_vector(half_extents));
        let mover_pos = Isometry::translation(origin.x, origin.y, origin.z);

        let mut contacts: Vec<SurfaceContact> = self
            .brushes
            .iter()
            .filter(|brush| mask.intersects(brush.contents))
            .filter_map(|brush| self.cast_against(brush, &mover, &mover_pos, direction, max_distance))
            .collect();

        contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        contacts
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<SurfaceContact> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(Point::new(origin.x, origin.y, origin.z), to_vector(dir));

        self.brushes
            .iter()
            .filter(|brush| mask.intersects(brush.contents) && !brush.is_trigger())
            .filter_map(|brush| {
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
                    .map(|hit| SurfaceContact {
                        distance: hit.time_of_impact,
                        normal: from_vector(hit.normal),
                        is_trigger: false,
                        collider: brush.id,
                        initial_overlap: hit.time_of_impact == 0.0,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn should_ignore_collision(&self, a: ColliderId, b: ColliderId) -> bool {
        self.ignored_pairs.contains(&ordered_pair(a, b))
    }
}

fn ordered_pair(a: ColliderId, b: ColliderId) -> (ColliderId, ColliderId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn from_vector(v: Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
