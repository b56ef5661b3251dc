//! Player movement physics.
//!
//! This module implements Source-style FPS movement with:
//!
//! - Ground and air acceleration with different models
//! - Friction with a stop-speed floor
//! - Jumping and crouching with head clearance
//! - Continuous collision detection with velocity clipping
//! - A stay-on-ground pass for stairs and ramps
//!
//! # Design
//!
//! Movement is controlled by the [`PlayerController`] which takes input commands
//! and updates the player's [`MovementState`] through any [`GeometryQuery`].
//!
//! All movement is deterministic - the same inputs will always produce the same
//! outputs.
//!
//! [`GeometryQuery`]: crate::collision::GeometryQuery

mod accelerate;
mod config;
mod controller;
mod ground;
mod resolve;
mod stance;
mod state;

pub use accelerate::{
    accelerate_air, accelerate_ground, apply_friction, apply_gravity, clamp_velocity, input_velocity,
    is_moving_backwards, wish_velocity, WishVelocity,
};
pub use config::{ConfigError, LevelSettings, MovementConfig};
pub use controller::PlayerController;
pub use ground::{classify_ground, stay_on_ground, GroundCheck};
pub use resolve::{clip_velocity, move_with_collisions};
pub use stance::{head_blocked, smooth_damp, update_crouch};
pub use state::{Action, CommandButtons, InputSource, MovementState, PlayerCommand};
