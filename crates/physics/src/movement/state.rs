//! Movement state and input structures.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::ColliderId;

use super::config::MovementConfig;

/// Complete movement state for one player.
///
/// `position` is the center of the collision box, not the feet. The box is
/// `2 * hull_half_width` wide and `height` tall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Box center in world space.
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Standing on walkable ground after the last collision pass.
    pub grounded: bool,

    /// Value of `grounded` at the end of the previous step.
    pub was_grounded: bool,

    /// Crouch key held, or kept crouched by a low ceiling.
    pub crouching: bool,

    /// Current collision box height, blended toward the crouch target.
    pub height: f32,

    /// Current camera height above the box center.
    pub camera_offset: f32,

    /// Id of the player's box for ignore-pair filtering.
    pub collider: ColliderId,
}

impl MovementState {
    /// Create a standing player at `position`.
    pub fn new(position: Vec3, collider: ColliderId, config: &MovementConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            was_grounded: false,
            crouching: false,
            height: config.standing_height,
            camera_offset: config.standing_camera_offset,
            collider,
        }
    }

    /// Half-size of the collision box.
    #[inline]
    pub fn half_extents(&self, config: &MovementConfig) -> Vec3 {
        Vec3::new(config.hull_half_width, self.height * 0.5, config.hull_half_width)
    }

    /// World position of the camera.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.camera_offset, 0.0)
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Check if moving (has significant velocity).
    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 0.01
    }

    /// Whether the player touched down during the last step.
    pub fn just_landed(&self) -> bool {
        self.grounded && !self.was_grounded
    }
}

/// A player action the movement code polls each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Crouch,
}

impl Action {
    /// All actions, in button-bit order.
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Crouch,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Anything that can answer "is this action held right now".
pub trait InputSource {
    fn is_action_pressed(&self, action: Action) -> bool;
}

/// Button state flags for player commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandButtons(pub u16);

impl CommandButtons {
    /// Check if an action's button is pressed.
    #[inline]
    pub fn pressed(self, action: Action) -> bool {
        (self.0 & action.bit()) != 0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    /// Set a button to a given state.
    #[inline]
    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    /// Snapshot any input source.
    pub fn capture(source: &impl InputSource) -> Self {
        let mut buttons = Self::default();
        for action in Action::ALL {
            buttons.set(action, source.is_action_pressed(action));
        }
        buttons
    }
}

/// Input for a single simulation step.
///
/// Captured once per tick and never buffered by the movement code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Buttons held this tick.
    pub buttons: CommandButtons,

    /// Camera yaw in radians. Yaw 0 looks down +Z; positive yaw turns
    /// toward +X.
    pub yaw: f32,
}

impl PlayerCommand {
    /// Create a command with the given buttons pressed.
    pub fn new(actions: &[Action], yaw: f32) -> Self {
        let mut buttons = CommandButtons::default();
        for &action in actions {
            buttons.press(action);
        }
        Self { buttons, yaw }
    }

    /// Check if jump is requested.
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.buttons.pressed(Action::Jump)
    }

    /// Check if crouch is requested.
    #[inline]
    pub fn wants_crouch(&self) -> bool {
        self.buttons.pressed(Action::Crouch)
    }

    /// Rotation that takes local input space into world space.
    ///
    /// Only yaw matters: looking up or down never tilts movement.
    #[inline]
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

impl InputSource for PlayerCommand {
    fn is_action_pressed(&self, action: Action) -> bool {
        self.buttons.pressed(action)
    }
}
