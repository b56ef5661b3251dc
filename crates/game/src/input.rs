//! Player input handling.
//!
//! This module turns the raw key and mouse state a client samples each tick
//! into commands for the physics system.

use serde::{Deserialize, Serialize};
use strafe_physics::{Action, CommandButtons, InputSource, PlayerCommand};

/// Raw player input for a single tick.
///
/// This is the input format received from the client input system.
/// It gets converted to [`PlayerCommand`] for the physics system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this tick (pixels).
    pub mouse_delta: (f32, f32),

    /// Action buttons pressed.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
}

impl PlayerInput {
    /// Input holding the given actions, with no mouse movement.
    pub fn holding(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for &action in actions {
            match action {
                Action::Forward => input.movement.forward = true,
                Action::Back => input.movement.backward = true,
                Action::Left => input.movement.left = true,
                Action::Right => input.movement.right = true,
                Action::Jump => input.actions.jump = true,
                Action::Crouch => input.actions.crouch = true,
            }
        }
        input
    }

    /// Convert to a physics command facing `yaw` radians.
    pub fn to_command(&self, yaw: f32) -> PlayerCommand {
        PlayerCommand {
            buttons: CommandButtons::capture(self),
            yaw,
        }
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }
}

impl InputSource for PlayerInput {
    fn is_action_pressed(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.movement.forward,
            Action::Back => self.movement.backward,
            Action::Left => self.movement.left,
            Action::Right => self.movement.right,
            Action::Jump => self.actions.jump,
            Action::Crouch => self.actions.crouch,
        }
    }
}
