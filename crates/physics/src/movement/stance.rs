//! Crouching: stance selection, head clearance and height blending.
//!
//! The box keeps its center while its height blends between the standing and
//! crouching sizes, so crouching shrinks it from both ends.

use glam::Vec3;

use crate::collision::{ContentFlags, GeometryQuery};

use super::config::MovementConfig;
use super::state::MovementState;

/// Update crouch state and blend the box height and camera toward it.
///
/// Holding crouch always crouches. Releasing it only stands back up once
/// nothing solid is above the head.
pub fn update_crouch<Q: GeometryQuery + ?Sized>(
    query: &Q,
    state: &mut MovementState,
    wants_crouch: bool,
    config: &MovementConfig,
    delta_time: f32,
) {
    let was_crouching = state.crouching;

    state.crouching = if wants_crouch {
        true
    } else if state.crouching {
        head_blocked(query, state, config)
    } else {
        false
    };

    if was_crouching && !wants_crouch && state.crouching {
        log::debug!("staying crouched under a low ceiling at {:?}", state.position);
    }

    state.height = smooth_damp(
        state.height,
        config.height(state.crouching),
        config.crouch_smooth_time,
        delta_time,
    );
    state.camera_offset = smooth_damp(
        state.camera_offset,
        config.camera_offset(state.crouching),
        config.crouch_smooth_time,
        delta_time,
    );
}

/// Whether something solid sits above the player's head.
///
/// Casts five rays straight up: one from the box center and one from each
/// corner, inset by `ground_check_offset`. Rays reach the top of the box
/// plus `uncrouch_clearance`.
pub fn head_blocked<Q: GeometryQuery + ?Sized>(query: &Q, state: &MovementState, config: &MovementConfig) -> bool {
    let half_extents = state.half_extents(config);
    let inset_x = half_extents.x - config.ground_check_offset;
    let inset_z = half_extents.z - config.ground_check_offset;
    let reach = half_extents.y + config.uncrouch_clearance;

    let origins = [
        state.position,
        state.position + Vec3::new(-inset_x, 0.0, inset_z),
        state.position + Vec3::new(-inset_x, 0.0, -inset_z),
        state.position + Vec3::new(inset_x, 0.0, -inset_z),
        state.position + Vec3::new(inset_x, 0.0, inset_z),
    ];

    origins.iter().any(|&origin| {
        query
            .cast_ray(origin, Vec3::Y, reach, ContentFlags::MASK_PLAYER_SOLID)
            .is_some_and(|hit| origin.y + hit.distance > state.position.y)
    })
}

/// Critically damped step from `current` toward `target`.
///
/// Starts from rest every call, so each step covers a fixed share of the
/// remaining distance (about 56% when `smooth_time` equals `delta_time`).
/// The result always lies between `current` and `target`.
pub fn smooth_damp(current: f32, target: f32, smooth_time: f32, delta_time: f32) -> f32 {
    if smooth_time <= 0.0 {
        return target;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * delta_time;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = omega * change * delta_time;
    let output = target + (change + temp) * decay;

    // Never overshoot
    if (target > current) == (output > target) {
        return target;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{ColliderId, CollisionWorld};

    const DT: f32 = 0.02;

    fn standing_state(config: &MovementConfig) -> MovementState {
        MovementState::new(Vec3::new(0.0, 0.9, 0.0), ColliderId(1000), config)
    }

    #[test]
    fn test_smooth_damp_moves_part_way() {
        let next = smooth_damp(1.8, 1.0, DT, DT);

        assert!(next < 1.8 && next > 1.0);
        // ~56% of the way there
        assert!((next - (1.0 + 0.8 * 0.441)).abs() < 0.01, "next={next}");
    }

    #[test]
    fn test_smooth_damp_is_monotonic_and_bounded() {
        let mut value = 1.8;
        for _ in 0..50 {
            let next = smooth_damp(value, 1.0, DT, DT);
            assert!(next <= value);
            assert!(next >= 1.0);
            value = next;
        }
        assert!((value - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_smooth_damp_at_target_stays() {
        assert_eq!(smooth_damp(1.0, 1.0, DT, DT), 1.0);
    }

    #[test]
    fn test_crouch_shrinks_box_gradually() {
        let config = MovementConfig::default();
        let world = CollisionWorld::new();
        let mut state = standing_state(&config);

        update_crouch(&world, &mut state, true, &config, DT);

        assert!(state.crouching);
        assert!(state.height < config.standing_height);
        assert!(state.height > config.crouching_height);
        assert!(state.camera_offset < config.standing_camera_offset);
    }

    #[test]
    fn test_release_stands_up_in_open_space() {
        let config = MovementConfig::default();
        let world = CollisionWorld::new();
        let mut state = standing_state(&config);

        for _ in 0..20 {
            update_crouch(&world, &mut state, true, &config, DT);
        }
        for _ in 0..20 {
            update_crouch(&world, &mut state, false, &config, DT);
        }

        assert!(!state.crouching);
        assert!((state.height - config.standing_height).abs() < 1e-3);
    }

    #[test]
    fn test_low_ceiling_keeps_crouched() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        // Ceiling 1.3m above the floor
        world.add_box(
            Vec3::new(0.0, 1.8, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            ContentFlags::SOLID,
        );

        let mut state = MovementState::new(Vec3::new(0.0, 0.5, 0.0), ColliderId(1000), &config);
        state.crouching = true;
        state.height = config.crouching_height;

        update_crouch(&world, &mut state, false, &config, DT);

        assert!(state.crouching);
        assert!(head_blocked(&world, &state, &config));
        assert_eq!(state.height, config.crouching_height);
    }

    #[test]
    fn test_corner_ray_sees_ledge() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        // Overhang covering only the +X edge of the box
        world.add_box(
            Vec3::new(1.2, 1.5, 0.0),
            Vec3::new(1.0, 0.2, 5.0),
            ContentFlags::SOLID,
        );

        let mut state = MovementState::new(Vec3::new(0.0, 0.5, 0.0), ColliderId(1000), &config);
        state.height = config.crouching_height;

        assert!(head_blocked(&world, &state, &config));
    }

    #[test]
    fn test_triggers_do_not_block_head() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, 1.8, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            ContentFlags::SOLID | ContentFlags::TRIGGER,
        );

        let state = MovementState::new(Vec3::new(0.0, 0.5, 0.0), ColliderId(1000), &config);

        assert!(!head_blocked(&world, &state, &config));
    }
}
