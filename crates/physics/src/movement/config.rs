//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. Values follow
//! the Source engine model expressed in metric units (meters, seconds).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value that would break the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("crouching height {crouching} must not exceed standing height {standing}")]
    CrouchTallerThanStanding { crouching: f32, standing: f32 },

    #[error("overbounce must be at least 1.0 (got {0})")]
    Overbounce(f32),
}

/// Configuration for player movement physics.
///
/// Read-only for the lifetime of a session. Missing fields in a settings
/// file fall back to [`MovementConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Player Dimensions
    // ========================================================================
    /// Half of the collision box width on X and Z (meters).
    pub hull_half_width: f32,

    /// Collision box height while standing (meters).
    pub standing_height: f32,

    /// Collision box height while crouching (meters).
    pub crouching_height: f32,

    /// Camera height above the box center while standing (meters).
    pub standing_camera_offset: f32,

    /// Camera height above the box center while crouching (meters).
    pub crouching_camera_offset: f32,

    /// Smoothing time for crouch height and camera blends (seconds).
    pub crouch_smooth_time: f32,

    /// Extra headroom required above the box before standing up (meters).
    pub uncrouch_clearance: f32,

    // ========================================================================
    // Movement Speeds
    // ========================================================================
    /// Walking speed (meters/second).
    pub move_speed: f32,

    /// Crouch-walking speed (meters/second).
    pub crouching_move_speed: f32,

    /// Multiplier on wish speed while walking backwards on the ground.
    pub backwards_move_speed_scale: f32,

    /// Upward velocity applied when jumping (meters/second).
    pub jump_power: f32,

    /// Upward velocity applied when jumping while crouched (meters/second).
    pub crouching_jump_power: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity acceleration before the level multiplier (meters/second²).
    pub gravity: f32,

    /// Gravity stops pulling once falling this fast (meters/second).
    pub max_fall_speed: f32,

    /// Every velocity component is clamped to ±this (meters/second).
    pub max_velocity: f32,

    /// Ground acceleration rate.
    pub ground_acceleration: f32,

    /// Air acceleration rate.
    pub air_acceleration: f32,

    /// Cap on the wish speed used for air acceleration (meters/second).
    pub air_acceleration_cap: f32,

    /// Ground friction coefficient.
    pub friction: f32,

    /// Surface friction used for ordinary ground.
    pub normal_surface_friction: f32,

    /// Below this speed friction bleeds as if moving at this speed.
    pub stop_speed: f32,

    /// Below this speed the player is stopped outright on the ground.
    pub minimum_speed_cutoff: f32,

    // ========================================================================
    // Ground and Collision
    // ========================================================================
    /// Minimum surface normal Y to be considered ground.
    /// 0.7 ≈ 45 degrees
    pub min_ground_normal: f32,

    /// Rising faster than this never counts as grounded (meters/second).
    pub airborne_rise_threshold: f32,

    /// Shortest downward ground check, so a resting box still finds its floor.
    pub min_ground_check_distance: f32,

    /// Height of the stay-on-ground correction sweep (meters).
    pub step_offset: f32,

    /// Inset of the corner rays used for the head-clearance check (meters).
    pub ground_check_offset: f32,

    /// Overbounce factor for velocity clipping (prevents re-colliding).
    pub overbounce: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Player dimensions
            hull_half_width: 0.4,
            standing_height: 1.8,
            crouching_height: 1.0,
            standing_camera_offset: 0.7,
            crouching_camera_offset: 0.3,
            crouch_smooth_time: 0.02,
            uncrouch_clearance: 0.8,

            // Movement speeds
            move_speed: 6.0,
            crouching_move_speed: 3.0,
            backwards_move_speed_scale: 0.9,
            jump_power: 7.0,
            crouching_jump_power: 6.5,

            // Physics
            gravity: 20.0,
            max_fall_speed: 40.0,
            max_velocity: 50.0,
            ground_acceleration: 10.0,
            air_acceleration: 12.0,
            air_acceleration_cap: 0.76,
            friction: 6.0,
            normal_surface_friction: 1.0,
            stop_speed: 1.9,
            minimum_speed_cutoff: 0.1,

            // Ground and collision
            min_ground_normal: 0.7, // ~45 degree max slope
            airborne_rise_threshold: 3.0,
            min_ground_check_distance: 0.02,
            step_offset: 0.1,
            ground_check_offset: 0.1,
            overbounce: 1.001,
        }
    }
}

impl MovementConfig {
    /// Create a "fast arcade" movement config with strong air strafing.
    pub fn arcade() -> Self {
        Self {
            move_speed: 8.0,
            crouching_move_speed: 4.0,
            jump_power: 8.0,
            crouching_jump_power: 7.5,
            gravity: 24.0,
            ground_acceleration: 15.0,
            air_acceleration: 100.0,
            air_acceleration_cap: 1.2,
            ..Default::default()
        }
    }

    /// Create a "tactical" movement config (slower, heavier).
    pub fn tactical() -> Self {
        Self {
            move_speed: 4.5,
            crouching_move_speed: 1.8,
            backwards_move_speed_scale: 0.7,
            jump_power: 5.5,
            crouching_jump_power: 5.0,
            friction: 8.0,
            ground_acceleration: 8.0,
            air_acceleration: 4.0,
            air_acceleration_cap: 0.4,
            ..Default::default()
        }
    }

    /// Move speed for the current crouch state.
    pub fn move_speed(&self, is_crouching: bool) -> f32 {
        if is_crouching {
            self.crouching_move_speed
        } else {
            self.move_speed
        }
    }

    /// Jump velocity for the current crouch state.
    pub fn jump_power(&self, is_crouching: bool) -> f32 {
        if is_crouching {
            self.crouching_jump_power
        } else {
            self.jump_power
        }
    }

    /// Target collision box height for the current crouch state.
    pub fn height(&self, is_crouching: bool) -> f32 {
        if is_crouching {
            self.crouching_height
        } else {
            self.standing_height
        }
    }

    /// Target camera offset for the current crouch state.
    pub fn camera_offset(&self, is_crouching: bool) -> f32 {
        if is_crouching {
            self.crouching_camera_offset
        } else {
            self.standing_camera_offset
        }
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("hull_half_width", self.hull_half_width),
            ("standing_height", self.standing_height),
            ("crouching_height", self.crouching_height),
            ("standing_camera_offset", self.standing_camera_offset),
            ("crouching_camera_offset", self.crouching_camera_offset),
            ("crouch_smooth_time", self.crouch_smooth_time),
            ("uncrouch_clearance", self.uncrouch_clearance),
            ("move_speed", self.move_speed),
            ("crouching_move_speed", self.crouching_move_speed),
            ("backwards_move_speed_scale", self.backwards_move_speed_scale),
            ("jump_power", self.jump_power),
            ("crouching_jump_power", self.crouching_jump_power),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("max_velocity", self.max_velocity),
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("air_acceleration_cap", self.air_acceleration_cap),
            ("friction", self.friction),
            ("normal_surface_friction", self.normal_surface_friction),
            ("stop_speed", self.stop_speed),
            ("minimum_speed_cutoff", self.minimum_speed_cutoff),
            ("min_ground_normal", self.min_ground_normal),
            ("airborne_rise_threshold", self.airborne_rise_threshold),
            ("min_ground_check_distance", self.min_ground_check_distance),
            ("step_offset", self.step_offset),
            ("ground_check_offset", self.ground_check_offset),
            ("overbounce", self.overbounce),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("hull_half_width", self.hull_half_width),
            ("crouching_height", self.crouching_height),
            ("crouch_smooth_time", self.crouch_smooth_time),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.crouching_height > self.standing_height {
            return Err(ConfigError::CrouchTallerThanStanding {
                crouching: self.crouching_height,
                standing: self.standing_height,
            });
        }

        if self.overbounce < 1.0 {
            return Err(ConfigError::Overbounce(self.overbounce));
        }

        Ok(())
    }
}

/// Settings owned by the active level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Scales [`MovementConfig::gravity`]. Levels that omit it get 1.0.
    pub gravity_multiplier: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self { gravity_multiplier: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MovementConfig::default();
        assert!(config.move_speed > 0.0);
        assert!(config.gravity > 0.0);
        assert!(config.overbounce > 1.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(MovementConfig::arcade().validate(), Ok(()));
        assert_eq!(MovementConfig::tactical().validate(), Ok(()));
    }

    #[test]
    fn test_crouch_selectors() {
        let config = MovementConfig::default();

        assert_eq!(config.move_speed(true), config.crouching_move_speed);
        assert_eq!(config.move_speed(false), config.move_speed);
        assert_eq!(config.jump_power(true), config.crouching_jump_power);
        assert_eq!(config.height(false), config.standing_height);
        assert_eq!(config.camera_offset(true), config.crouching_camera_offset);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let config = MovementConfig {
            friction: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative { field: "friction", value: -1.0 })
        );
    }

    #[test]
    fn test_validate_rejects_inverted_heights() {
        let config = MovementConfig {
            crouching_height: 2.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CrouchTallerThanStanding { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_small_overbounce() {
        let config = MovementConfig {
            overbounce: 0.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Overbounce(0.5)));
    }

    #[test]
    fn test_level_settings_default_multiplier() {
        assert_eq!(LevelSettings::default().gravity_multiplier, 1.0);
    }
}
