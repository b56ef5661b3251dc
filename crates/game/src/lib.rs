//! Strafe Game Logic
//!
//! This crate wraps the movement engine in a playable session:
//!
//! - Player state, camera look and input handling
//! - Level building, spawn points and trigger volumes
//! - Ghost runs: recording a run and replaying the fastest one
//! - Settings files
//!
//! # Architecture
//!
//! The simulation is deterministic and runs at a fixed timestep. All state
//! updates are driven by player input and the level geometry.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Game Simulation                         │
//! │  ┌─────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ Input   │───►│ Physics  │───►│ Game State             │  │
//! │  │ Commands│    │ (movement│    │ (players, level,       │  │
//! │  └─────────┘    │ collision)    │  ghost runs)           │  │
//! │                 └──────────┘    └────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod ghost;
pub mod input;
pub mod level;
pub mod player;
pub mod settings;
pub mod simulation;

// Re-export main types
pub use ghost::{GhostPlayback, GhostRecorder, GhostRun, GhostSample};
pub use input::PlayerInput;
pub use level::Level;
pub use player::Player;
pub use settings::{Settings, SettingsError};
pub use simulation::{Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use strafe_physics::{
    Action, CollisionWorld, ContentFlags, LevelSettings, MovementConfig, MovementState, PlayerCommand,
    PlayerController,
};
