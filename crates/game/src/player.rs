//! Player entity and state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use strafe_physics::{ColliderId, MovementConfig, MovementState};

use crate::ghost::GhostRecorder;

/// Unique identifier for entities.
pub type EntityId = u32;

/// Pitch stops just short of straight up or down (radians).
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Radians of rotation per pixel of mouse movement at sensitivity 1.0.
const RADIANS_PER_PIXEL: f32 = 0.001;

/// A player in the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Movement physics state.
    pub movement: MovementState,

    /// Camera yaw in radians. Drives the movement direction.
    pub yaw: f32,

    /// Camera pitch in radians, positive looking up. Never affects movement.
    pub pitch: f32,

    /// Seconds since the current run started.
    pub run_time: f32,

    /// Reached the finish of the current run.
    pub finished: bool,

    /// Samples of the current run.
    #[serde(skip)]
    pub recorder: GhostRecorder,
}

impl Player {
    /// Create a new player standing at `spawn_position`.
    pub fn new(
        id: EntityId,
        name: String,
        spawn_position: Vec3,
        collider: ColliderId,
        config: &MovementConfig,
    ) -> Self {
        Self {
            id,
            name,
            movement: MovementState::new(spawn_position, collider, config),
            yaw: 0.0,
            pitch: 0.0,
            run_time: 0.0,
            finished: false,
            recorder: GhostRecorder::new(),
        }
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    /// Get the player's eye position (for camera).
    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.movement.eye_position()
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.movement.grounded
    }

    /// Check if the player is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.movement.crouching
    }

    /// Turn the camera by a mouse delta in pixels.
    ///
    /// Moving the mouse right turns right and moving it up looks up.
    pub fn apply_look(&mut self, mouse_delta: (f32, f32), sensitivity: f32) {
        let scale = sensitivity * RADIANS_PER_PIXEL;
        self.yaw += mouse_delta.0 * scale;
        self.pitch = (self.pitch - mouse_delta.1 * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Direction the player is looking.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
    }

    /// Start a new run: clear timers and discard recorded samples.
    pub fn restart_run(&mut self) {
        self.run_time = 0.0;
        self.finished = false;
        self.recorder.restart();
    }
}
