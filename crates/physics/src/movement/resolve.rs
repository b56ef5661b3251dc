//! Collision response: velocity clipping and continuous collision detection.
//!
//! Each step the player box is swept along its velocity for the distance it
//! would cover. On impact the velocity is clipped along the surface and the
//! box only advances up to the contact; otherwise it moves the full step and
//! is pulled back onto the ground.

use glam::Vec3;

use crate::collision::{blocking_contacts, ContentFlags, GeometryQuery, SurfaceContact};

use super::config::MovementConfig;
use super::ground::{classify_ground, stay_on_ground};
use super::state::MovementState;

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface. The
/// overbounce factor removes slightly more than that, so the player ends up
/// moving a hair away from the surface instead of grinding into it.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal) * overbounce;
    velocity - normal * backoff
}

/// Run ground classification, then move the player for one step.
///
/// Returns the contact the box stopped against, if any.
pub fn move_with_collisions<Q: GeometryQuery + ?Sized>(
    query: &Q,
    state: &mut MovementState,
    config: &MovementConfig,
    delta_time: f32,
) -> Option<SurfaceContact> {
    let ground = classify_ground(query, state, config, delta_time);
    state.grounded = ground.grounded;
    state.velocity = ground.velocity;

    let speed = state.velocity.length();
    let cast_distance = speed * delta_time;

    let impact = first_impact(query, state, config, cast_distance);

    match impact {
        Some(contact) => {
            let time_to_impact = if contact.distance > 0.0 && speed == 0.0 {
                delta_time
            } else if speed == 0.0 {
                0.0
            } else {
                contact.distance / speed
            };

            state.velocity = clip_velocity(state.velocity, contact.normal, config.overbounce);
            state.position += state.velocity * time_to_impact;

            log::trace!(
                "ccd impact: collider {:?} distance {:.4} normal {:?} toi {:.4}",
                contact.collider,
                contact.distance,
                contact.normal,
                time_to_impact
            );
        }
        None => {
            state.position += state.velocity * delta_time;
            stay_on_ground(query, state, config);
        }
    }

    state.was_grounded = state.grounded;
    impact
}

/// Nearest contact that blocks the box along its velocity.
///
/// Colliders the box already overlaps at the start are not impacts: there is
/// no time of impact to move to, and stopping on them would pin the player.
fn first_impact<Q: GeometryQuery + ?Sized>(
    query: &Q,
    state: &MovementState,
    config: &MovementConfig,
    cast_distance: f32,
) -> Option<SurfaceContact> {
    let direction = state.velocity.normalize_or_zero();
    if direction == Vec3::ZERO || cast_distance <= 0.0 {
        return None;
    }

    let contacts = query.cast_box(
        state.position,
        state.half_extents(config),
        direction,
        cast_distance,
        ContentFlags::MASK_PLAYER_SOLID,
    );

    let impact = blocking_contacts(query, &contacts, state.collider)
        .find(|contact| !contact.initial_overlap)
        .copied();
    impact
}
