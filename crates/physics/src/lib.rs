//! Strafe Physics Engine
//!
//! A deterministic first-person movement engine in the Source style: ground
//! and air acceleration, friction, crouching and jumping, with continuous
//! collision detection against level geometry.
//!
//! # Architecture
//!
//! The physics engine is split into two main systems:
//!
//! - **Collision**: Sweeps boxes through the world, returns contact information
//! - **Movement**: Uses collision sweeps to implement player movement physics
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **Explicit inputs**: Every step receives its command, level settings and step duration
//! 3. **Pluggable geometry**: Movement only sees the [`GeometryQuery`] trait

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    box_sweep, ColliderId, CollisionWorld, ContentFlags, GeometryQuery, SurfaceContact, SweepRequest, SweepResult,
};
pub use movement::{
    Action, CommandButtons, ConfigError, InputSource, LevelSettings, MovementConfig, MovementState, PlayerCommand, PlayerController,
};
