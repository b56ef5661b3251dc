//! Velocity integration: gravity, wish velocity, acceleration and friction.
//!
//! Every function here is a pure update of a velocity vector. None of them
//! touch the collision world.

use glam::Vec3;

use super::config::MovementConfig;
use super::state::{Action, PlayerCommand};

/// Pull the player down while airborne, until max fall speed is reached.
pub fn apply_gravity(
    velocity: &mut Vec3,
    grounded: bool,
    gravity_multiplier: f32,
    config: &MovementConfig,
    delta_time: f32,
) {
    if !grounded && velocity.y > -config.max_fall_speed {
        velocity.y -= gravity_multiplier * config.gravity * delta_time;
    }
}

/// Desired motion for this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WishVelocity {
    /// Unit direction in world space, or zero with no input.
    pub direction: Vec3,
    /// Desired speed along `direction`.
    pub speed: f32,
}

impl WishVelocity {
    /// Wish velocity with no movement input.
    pub const NONE: Self = Self {
        direction: Vec3::ZERO,
        speed: 0.0,
    };
}

/// Local-space input velocity: x is strafe, z is forward.
///
/// Right overrides left and forward overrides back when both are held.
pub fn input_velocity(command: &PlayerCommand, move_speed: f32) -> Vec3 {
    let mut strafe = 0.0;
    let mut forward = 0.0;

    if command.buttons.pressed(Action::Left) {
        strafe = -move_speed;
    }
    if command.buttons.pressed(Action::Right) {
        strafe = move_speed;
    }
    if command.buttons.pressed(Action::Back) {
        forward = -move_speed;
    }
    if command.buttons.pressed(Action::Forward) {
        forward = move_speed;
    }

    Vec3::new(strafe, 0.0, forward)
}

/// Whether the player is walking backwards this step.
pub fn is_moving_backwards(command: &PlayerCommand) -> bool {
    input_velocity(command, 1.0).z < 0.0
}

/// Turn input and camera yaw into a world-space wish direction and speed.
///
/// Diagonal input is capped back to the move speed before rotating.
pub fn wish_velocity(command: &PlayerCommand, crouching: bool, config: &MovementConfig) -> WishVelocity {
    let move_speed = config.move_speed(crouching);

    let mut local = input_velocity(command, move_speed);
    let magnitude = local.length();
    if magnitude > move_speed {
        local *= move_speed / magnitude;
    }

    let world = command.yaw_rotation() * local;
    let speed = world.length();
    if speed < 1.0e-6 {
        return WishVelocity::NONE;
    }

    WishVelocity {
        direction: world / speed,
        speed,
    }
}

/// Ground acceleration toward the wish direction.
///
/// Speed is capped by only adding what is missing along `wish_direction`:
/// if the player already moves that fast in that direction, nothing changes.
pub fn accelerate_ground(
    velocity: &mut Vec3,
    wish_direction: Vec3,
    wish_speed: f32,
    surface_friction: f32,
    config: &MovementConfig,
    delta_time: f32,
) {
    let current_speed = velocity.dot(wish_direction);
    let speed_to_add = wish_speed - current_speed;
    if speed_to_add <= 0.0 {
        return;
    }

    let accel_speed =
        (config.ground_acceleration * delta_time * wish_speed * surface_friction).min(speed_to_add);
    *velocity += wish_direction * accel_speed;
}

/// Air acceleration toward the wish direction.
///
/// Only horizontal velocity counts against the wish speed, and the wish
/// speed is capped at the air cap, which is what allows air strafing to
/// gain speed while straight-line air control stays weak.
pub fn accelerate_air(
    velocity: &mut Vec3,
    wish_direction: Vec3,
    wish_speed: f32,
    config: &MovementConfig,
    delta_time: f32,
) {
    let capped_wish_speed = wish_speed.min(config.air_acceleration_cap);
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let current_speed = horizontal.dot(wish_direction);
    let speed_to_add = capped_wish_speed - current_speed;
    if speed_to_add <= 0.0 {
        return;
    }

    let accel_speed = speed_to_add.min(config.air_acceleration * wish_speed * delta_time);
    *velocity += wish_direction * accel_speed;
}

/// Ground friction.
pub fn apply_friction(velocity: &mut Vec3, config: &MovementConfig, delta_time: f32) {
    let speed = velocity.length();

    // Too slow to bother: stop dead so no drift remains
    if speed < config.minimum_speed_cutoff {
        *velocity = Vec3::ZERO;
        return;
    }

    let control = speed.max(config.stop_speed);
    let loss = control * config.friction * delta_time;
    let new_speed = (speed - loss).max(0.0);

    if new_speed != speed {
        *velocity *= new_speed / speed;
    }
}

/// Clamp each velocity component to ±`max_velocity`.
pub fn clamp_velocity(velocity: &mut Vec3, max_velocity: f32) {
    *velocity = velocity.clamp(Vec3::splat(-max_velocity), Vec3::splat(max_velocity));
}
