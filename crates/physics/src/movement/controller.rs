//! Player movement controller.
//!
//! This is the main entry point for player movement. It takes input commands
//! and updates the movement state through the collision world.

use glam::Vec3;

use crate::collision::{box_sweep, ContentFlags, GeometryQuery, SweepRequest};

use super::accelerate::{
    accelerate_air, accelerate_ground, apply_friction, apply_gravity, clamp_velocity, is_moving_backwards,
    wish_velocity,
};
use super::config::{LevelSettings, MovementConfig};
use super::resolve::move_with_collisions;
use super::stance::update_crouch;
use super::state::{MovementState, PlayerCommand};

/// Farthest a spawning player is dropped to find the floor (meters).
const SPAWN_DROP_DISTANCE: f32 = 4.0;

/// Player movement controller.
///
/// Handles all player movement physics including:
/// - Ground and air acceleration
/// - Jumping and crouching
/// - Friction
/// - Continuous collision response
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(MovementConfig::default());
/// let mut state = MovementState::new(spawn_position, player_id, &controller.config);
///
/// // Each fixed step:
/// controller.update(&mut state, &command, &world, &level, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl PlayerController {
    /// Create a new player controller with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default())
    }

    /// Reset a player to standing at a spawn point.
    ///
    /// Sweeps down from the spawn point to find the ground and places the
    /// player on it. With no ground below, the spawn point is used as-is.
    pub fn spawn_at<Q: GeometryQuery + ?Sized>(&self, state: &mut MovementState, spawn_pos: Vec3, world: &Q) {
        *state = MovementState::new(spawn_pos, state.collider, &self.config);

        let drop = box_sweep(
            world,
            &SweepRequest::new(
                spawn_pos,
                spawn_pos - Vec3::new(0.0, SPAWN_DROP_DISTANCE, 0.0),
                state.half_extents(&self.config),
                ContentFlags::MASK_PLAYER_SOLID,
                state.collider,
            ),
        );

        if drop.hit_something() && drop.normal.y > self.config.min_ground_normal {
            state.position = drop.end_position;
            state.grounded = true;
            state.was_grounded = true;
        } else {
            log::debug!("no ground below spawn point {:?}", spawn_pos);
        }
    }

    /// Update player movement for one fixed step.
    ///
    /// This is the main entry point that should be called each simulation tick.
    ///
    /// # Arguments
    ///
    /// * `state` - The player's movement state (will be modified)
    /// * `command` - The player's input for this step
    /// * `world` - Level geometry
    /// * `level` - Per-level settings (gravity multiplier)
    /// * `delta_time` - Fixed step duration in seconds
    pub fn update<Q: GeometryQuery + ?Sized>(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &Q,
        level: &LevelSettings,
        delta_time: f32,
    ) {
        let config = &self.config;

        update_crouch(world, state, command.wants_crouch(), config, delta_time);

        apply_gravity(
            &mut state.velocity,
            state.grounded,
            level.gravity_multiplier,
            config,
            delta_time,
        );

        self.check_jump(state, command);

        let wish = wish_velocity(command, state.crouching, config);

        if state.grounded {
            let mut wish_speed = wish.speed;
            if is_moving_backwards(command) {
                wish_speed *= config.backwards_move_speed_scale;
            }

            apply_friction(&mut state.velocity, config, delta_time);
            accelerate_ground(
                &mut state.velocity,
                wish.direction,
                wish_speed,
                config.normal_surface_friction,
                config,
                delta_time,
            );
        } else {
            accelerate_air(&mut state.velocity, wish.direction, wish.speed, config, delta_time);
        }

        clamp_velocity(&mut state.velocity, config.max_velocity);

        move_with_collisions(world, state, config, delta_time);

        clamp_velocity(&mut state.velocity, config.max_velocity);
    }

    // ========================================================================
    // Jumping
    // ========================================================================

    fn check_jump(&self, state: &mut MovementState, command: &PlayerCommand) {
        if state.grounded && command.wants_jump() {
            state.velocity.y = self.config.jump_power(state.crouching);
            state.grounded = false;
            log::debug!("jump: vy={}", state.velocity.y);
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::with_default_config()
    }
}

// ============================================================================
// Tests
// ============================================================================
