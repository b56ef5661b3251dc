//! Box sweeps: the primitive every movement query is built on.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;
use super::query::{blocking_contacts, ColliderId, GeometryQuery};

/// Sweeps shorter than this are treated as not moving at all.
const MIN_SWEEP_DISTANCE: f32 = 1.0e-6;

/// A request to move a box from `start` to `end`.
#[derive(Debug, Clone, Copy)]
pub struct SweepRequest {
    /// Box center at the start of the sweep.
    pub start: Vec3,
    /// Desired box center at the end of the sweep.
    pub end: Vec3,
    /// Half-size of the box in each axis.
    pub half_extents: Vec3,
    /// Content flags to collide with.
    pub mask: ContentFlags,
    /// Collider doing the moving, used for ignore-pair filtering.
    pub mover: ColliderId,
}

impl SweepRequest {
    /// Build a request for a box of `half_extents` owned by `mover`.
    pub fn new(start: Vec3, end: Vec3, half_extents: Vec3, mask: ContentFlags, mover: ColliderId) -> Self {
        Self {
            start,
            end,
            half_extents,
            mask,
            mover,
        }
    }
}

/// Result of a box sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// How far along the path the box got before touching something.
    ///
    /// - `1.0` = travelled the full distance (no collision)
    /// - `0.0` = blocked right at the start
    pub fraction: f32,

    /// Where the sweep began.
    pub start_position: Vec3,

    /// Box center where the sweep stopped.
    pub end_position: Vec3,

    /// Normal of the blocking surface. `Vec3::ZERO` when nothing was hit.
    pub normal: Vec3,
}

impl SweepResult {
    /// A sweep that reached its end without touching anything.
    pub fn unobstructed(start: Vec3, end: Vec3) -> Self {
        Self {
            fraction: 1.0,
            start_position: start,
            end_position: end,
            normal: Vec3::ZERO,
        }
    }

    /// Check if this sweep hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Whether the box moved some distance and then stopped on a surface.
    #[inline]
    pub fn stopped_partway(&self) -> bool {
        self.fraction > 0.0 && self.fraction < 1.0
    }
}

/// Sweep a box through the world and report the first blocking contact.
///
/// Triggers and colliders ignored against `request.mover` never block. A
/// zero-length request has no direction, so it is answered as an
/// unobstructed sweep that ends where it started.
pub fn box_sweep<Q: GeometryQuery + ?Sized>(query: &Q, request: &SweepRequest) -> SweepResult {
    let delta = request.end - request.start;
    let max_distance = delta.length();

    if max_distance < MIN_SWEEP_DISTANCE {
        return SweepResult::unobstructed(request.start, request.start);
    }

    let direction = delta / max_distance;
    let contacts = query.cast_box(
        request.start,
        request.half_extents,
        direction,
        max_distance,
        request.mask,
    );

    let closest = blocking_contacts(query, &contacts, request.mover).next().copied();

    match closest {
        Some(closest) => SweepResult {
            fraction: (closest.distance / max_distance).clamp(0.0, 1.0),
            start_position: request.start,
            end_position: request.start + direction * closest.distance,
            normal: closest.normal,
        },
        None => SweepResult::unobstructed(request.start, request.start + direction * max_distance),
    }
}
