//! Ground detection and the stay-on-ground correction.

use glam::Vec3;

use crate::collision::{blocking_contacts, box_sweep, ContentFlags, GeometryQuery, SweepRequest};

use super::config::MovementConfig;
use super::resolve::clip_velocity;
use super::state::MovementState;

/// Outcome of a ground check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundCheck {
    /// Supported by a walkable surface.
    pub grounded: bool,
    /// Velocity after landing adjustments.
    pub velocity: Vec3,
}

/// Decide whether the player stands on walkable ground.
///
/// Sweeps the box down by the distance it would fall this step. Every
/// walkable contact grounds the player; when falling, the velocity is clipped
/// against it and the vertical part dropped so the fall ends on the surface.
/// Rising faster than the airborne threshold skips the sweep entirely, which
/// keeps a fresh jump from snapping back onto the floor.
pub fn classify_ground<Q: GeometryQuery + ?Sized>(
    query: &Q,
    state: &MovementState,
    config: &MovementConfig,
    delta_time: f32,
) -> GroundCheck {
    let mut velocity = state.velocity;

    if velocity.y > config.airborne_rise_threshold {
        return GroundCheck {
            grounded: false,
            velocity,
        };
    }

    let check_distance = (velocity.y * delta_time).abs().max(config.min_ground_check_distance);
    let contacts = query.cast_box(
        state.position,
        state.half_extents(config),
        Vec3::NEG_Y,
        check_distance,
        ContentFlags::MASK_PLAYER_SOLID,
    );

    let mut grounded = false;
    for contact in blocking_contacts(query, &contacts, state.collider) {
        if contact.is_walkable(config.min_ground_normal) {
            grounded = true;

            if velocity.y < 0.0 {
                velocity = clip_velocity(velocity, contact.normal, config.overbounce);
                velocity.y = 0.0;
            }
        } else {
            log::debug!(
                "too steep to stand on: collider {:?} normal {:?}",
                contact.collider,
                contact.normal
            );
        }
    }

    GroundCheck { grounded, velocity }
}

/// Keep the player glued to stairs and ramps after an unobstructed move.
///
/// Finds a safe start `step_offset` above the box center, then sweeps down to
/// `step_offset` below it. Only a sweep that moved, then stopped on a walkable
/// surface snaps the position. Returns whether a snap happened.
pub fn stay_on_ground<Q: GeometryQuery + ?Sized>(
    query: &Q,
    state: &mut MovementState,
    config: &MovementConfig,
) -> bool {
    let half_extents = state.half_extents(config);
    let step = Vec3::new(0.0, config.step_offset, 0.0);

    let up = box_sweep(
        query,
        &SweepRequest::new(
            state.position,
            state.position + step,
            half_extents,
            ContentFlags::MASK_PLAYER_SOLID,
            state.collider,
        ),
    );

    let down = box_sweep(
        query,
        &SweepRequest::new(
            up.end_position,
            state.position - step,
            half_extents,
            ContentFlags::MASK_PLAYER_SOLID,
            state.collider,
        ),
    );

    if down.stopped_partway() && down.normal.y > config.min_ground_normal {
        state.position = down.end_position;
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{ColliderId, CollisionWorld};

    const DT: f32 = 0.02;

    fn floor_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world
    }

    fn state_at(position: Vec3, velocity: Vec3, config: &MovementConfig) -> MovementState {
        let mut state = MovementState::new(position, ColliderId(1000), config);
        state.velocity = velocity;
        state
    }

    #[test]
    fn test_falling_onto_floor_lands() {
        let config = MovementConfig::default();
        let world = floor_world();
        // Box bottom 5cm above the floor, falling 10cm this step
        let state = state_at(Vec3::new(0.0, 0.95, 0.0), Vec3::new(0.0, -5.0, 0.0), &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(check.grounded);
        assert_eq!(check.velocity.y, 0.0);
    }

    #[test]
    fn test_landing_keeps_horizontal_speed() {
        let config = MovementConfig::default();
        let world = floor_world();
        let state = state_at(Vec3::new(0.0, 0.95, 0.0), Vec3::new(3.0, -5.0, 0.0), &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(check.grounded);
        assert!((check.velocity.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_resting_on_floor_is_grounded() {
        let config = MovementConfig::default();
        let world = floor_world();
        let state = state_at(Vec3::new(0.0, 0.9, 0.0), Vec3::ZERO, &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(check.grounded);
        assert_eq!(check.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_rising_fast_is_airborne() {
        let config = MovementConfig::default();
        let world = floor_world();
        let state = state_at(Vec3::new(0.0, 0.9, 0.0), Vec3::new(0.0, 7.0, 0.0), &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(!check.grounded);
        assert_eq!(check.velocity, state.velocity);
    }

    #[test]
    fn test_high_above_floor_is_airborne() {
        let config = MovementConfig::default();
        let world = floor_world();
        let state = state_at(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -5.0, 0.0), &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(!check.grounded);
        assert_eq!(check.velocity.y, -5.0);
    }

    #[test]
    fn test_steep_slope_does_not_ground() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        // 60 degree slab: normal.y = 0.5
        world.add_oriented_box(
            Vec3::ZERO,
            Vec3::new(10.0, 0.5, 10.0),
            Vec3::new(0.0, 0.0, 60.0_f32.to_radians()),
            ContentFlags::SOLID,
        );

        let contacts = world.cast_box(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.4, 0.9, 0.4), Vec3::NEG_Y, 10.0, ContentFlags::SOLID);
        let drop = contacts[0].distance - 0.02;
        let state = state_at(Vec3::new(0.0, 5.0 - drop, 0.0), Vec3::new(0.0, -5.0, 0.0), &config);

        let check = classify_ground(&world, &state, &config, DT);

        assert!(!check.grounded);
        assert_eq!(check.velocity.y, -5.0);
    }

    #[test]
    fn test_ignored_floor_does_not_ground() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        let player = world.allocate_id();
        let floor = world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world.set_ignore_collision(player, floor, true);

        let mut state = state_at(Vec3::new(0.0, 0.9, 0.0), Vec3::ZERO, &config);
        state.collider = player;

        assert!(!classify_ground(&world, &state, &config, DT).grounded);
    }

    #[test]
    fn test_stay_on_ground_snaps_down() {
        let config = MovementConfig::default();
        let world = floor_world();
        // Hovering 5cm above the floor, within step_offset
        let mut state = state_at(Vec3::new(0.0, 0.95, 0.0), Vec3::ZERO, &config);

        assert!(stay_on_ground(&world, &mut state, &config));
        assert!((state.position.y - 0.9).abs() < 1e-3, "y={}", state.position.y);
    }

    #[test]
    fn test_stay_on_ground_ignores_far_floor() {
        let config = MovementConfig::default();
        let world = floor_world();
        let mut state = state_at(Vec3::new(0.0, 1.5, 0.0), Vec3::ZERO, &config);

        assert!(!stay_on_ground(&world, &mut state, &config));
        assert_eq!(state.position.y, 1.5);
    }

    #[test]
    fn test_stay_on_ground_under_low_ceiling() {
        let config = MovementConfig::default();
        let mut world = floor_world();
        // Ceiling touching the top of the box: the up sweep goes nowhere
        world.add_box(
            Vec3::new(0.0, 2.35, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            ContentFlags::SOLID,
        );
        let mut state = state_at(Vec3::new(0.0, 0.95, 0.0), Vec3::ZERO, &config);

        assert!(stay_on_ground(&world, &mut state, &config));
        assert!((state.position.y - 0.9).abs() < 1e-3, "y={}", state.position.y);
    }
}
