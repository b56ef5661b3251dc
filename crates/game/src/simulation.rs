//! Fixed-step session loop.
//!
//! Each tick turns player input into movement commands, steps the movement
//! controller against the level, records ghost samples and checks the
//! finish line. The same level and the same inputs always produce the same
//! trajectories.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strafe_physics::{ConfigError, MovementConfig, PlayerController};

use crate::ghost::{GhostPlayback, GhostPose, GhostSample};
use crate::input::PlayerInput;
use crate::level::{Level, FINISH_TRIGGER};
use crate::player::{EntityId, Player};

/// Session-wide tuning: step rate, movement constants and look speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed steps per second.
    pub tick_rate: u32,

    /// Constants for the movement controller.
    pub movement: MovementConfig,

    /// Scales mouse deltas before they turn the camera.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            movement: MovementConfig::default(),
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Step duration in seconds.
    pub fn delta_time(&self) -> f32 {
        (self.tick_rate as f32).recip()
    }

    /// Check the movement constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()
    }
}

/// A running session: one level and the players in it.
#[derive(Debug)]
pub struct Simulation {
    /// Ticks run so far.
    pub frame: u64,

    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// Players, in input order.
    pub players: Vec<Player>,

    controller: PlayerController,

    /// Replay of the level's best run.
    ghost: GhostPlayback,

    /// Where the ghost was drawn on the last tick.
    ghost_pose: Option<GhostPose>,

    /// Id handed to the next player.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a session on `level`.
    ///
    /// A zero tick rate has no step duration; it is raised to 1Hz. Settings
    /// files reject it before getting here.
    pub fn new(mut config: SimulationConfig, level: Level) -> Self {
        if config.tick_rate == 0 {
            log::warn!("tick rate of 0 raised to 1Hz");
            config.tick_rate = 1;
        }

        Self {
            frame: 0,
            controller: PlayerController::new(config.movement.clone()),
            config,
            level,
            players: Vec::new(),
            ghost: GhostPlayback::new(),
            ghost_pose: None,
            next_entity_id: 1,
        }
    }

    /// Default settings on the test arena.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    /// Add a player to the simulation, dropped onto the ground under the
    /// next spawn point.
    pub fn add_player(&mut self, name: &str) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let collider = self.level.collision.allocate_id();
        let (position, facing) = self.spawn_for(self.players.len());

        let mut player = Player::new(id, name.to_string(), position, collider, &self.controller.config);
        self.controller
            .spawn_at(&mut player.movement, position, &self.level.collision);
        player.yaw = facing;

        log::info!("player {} '{}' spawned at {:?}", id, name, player.position());

        self.players.push(player);
        id
    }

    pub fn get_player(&self, id: EntityId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn get_player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Send a player back to their spawn point and start a fresh run.
    ///
    /// Returns false for unknown ids.
    pub fn restart_run(&mut self, player_id: EntityId) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return false;
        };

        let (position, facing) = self.spawn_for(index);
        let player = &mut self.players[index];

        self.controller
            .spawn_at(&mut player.movement, position, &self.level.collision);
        player.yaw = facing;
        player.pitch = 0.0;
        player.restart_run();

        self.level.reset_triggers();
        self.ghost.reset();
        self.ghost_pose = None;
        true
    }

    /// Run one fixed step.
    ///
    /// `inputs[i]` drives `players[i]`; players without an entry get idle
    /// input.
    pub fn tick(&mut self, inputs: &[PlayerInput]) {
        let delta_time = self.config.delta_time();

        for (player, input) in self
            .players
            .iter_mut()
            .zip(inputs.iter().copied().chain(std::iter::repeat(PlayerInput::default())))
        {
            player.apply_look(input.mouse_delta, self.config.mouse_sensitivity);
            let command = input.to_command(player.yaw);

            self.controller.update(
                &mut player.movement,
                &command,
                &self.level.collision,
                &self.level.settings,
                delta_time,
            );

            if !player.finished {
                player.run_time += delta_time;
                player.recorder.record(
                    delta_time,
                    GhostSample {
                        position: player.movement.position,
                        yaw: player.yaw,
                        pitch: player.pitch,
                        buttons: command.buttons,
                    },
                );
            }
        }

        for player in &mut self.players {
            if player.finished {
                continue;
            }

            let triggered = self.level.check_triggers(player.position());
            if triggered.iter().any(|id| id == FINISH_TRIGGER) {
                player.finished = true;
                let run = player.recorder.finish(player.run_time);
                log::info!("player {} finished in {:.2}s", player.id, player.run_time);

                if self.level.submit_run(run) {
                    self.ghost.reset();
                }
            } else {
                for trigger_id in triggered {
                    log::debug!("player {} triggered: {}", player.id, trigger_id);
                }
            }
        }

        self.ghost_pose = match &self.level.best_run {
            Some(run) => self.ghost.update(run, delta_time),
            None => None,
        };

        self.frame += 1;
    }

    /// Step duration in seconds.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Where the best-run ghost was drawn on the last tick.
    pub fn ghost_pose(&self) -> Option<GhostPose> {
        self.ghost_pose
    }

    fn spawn_for(&self, index: usize) -> (Vec3, f32) {
        let spawn_index = index % self.level.player_spawn_count().max(1);
        self.level
            .get_player_spawn(spawn_index)
            .map(|s| (s.position, s.facing))
            .unwrap_or((Vec3::ZERO, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::TriggerVolume;
    use strafe_physics::Action;

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test();
        assert_eq!(sim.frame, 0);
        assert!(sim.players.is_empty());
        assert!((sim.delta_time() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_zero_tick_rate_steps_at_one_hertz() {
        let config = SimulationConfig {
            tick_rate: 0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config, Level::test_arena());
        let id = sim.add_player("Test");

        assert_eq!(sim.config.tick_rate, 1);
        assert_eq!(sim.delta_time(), 1.0);

        sim.tick(&[PlayerInput::default()]);
        let player = sim.get_player(id).unwrap();
        assert!(player.position().is_finite());
        assert_eq!(player.run_time, 1.0);
    }

    #[test]
    fn test_add_player_lands_on_floor() {
        let mut sim = Simulation::test();

        let id = sim.add_player("Player1");
        assert!(id > 0);
        assert_eq!(sim.players.len(), 1);

        let player = sim.get_player(id).unwrap();
        assert_eq!(player.name, "Player1");
        assert!(player.on_ground());
        assert!((player.position().y - 0.9).abs() < 1e-3, "y={}", player.position().y);
    }

    #[test]
    fn test_players_get_distinct_colliders() {
        let mut sim = Simulation::test();
        let a = sim.add_player("A");
        let b = sim.add_player("B");

        let ca = sim.get_player(a).unwrap().movement.collider;
        let cb = sim.get_player(b).unwrap().movement.collider;
        assert_ne!(ca, cb);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = Simulation::test();
        sim.add_player("Test");

        sim.tick(&[PlayerInput::default()]);
        assert_eq!(sim.frame, 1);

        sim.tick(&[PlayerInput::default()]);
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test");

        let start_pos = sim.get_player(id).unwrap().position();

        let input = PlayerInput::holding(&[Action::Forward]);
        for _ in 0..50 {
            sim.tick(&[input]);
        }

        let end_pos = sim.get_player(id).unwrap().position();
        let distance = end_pos.z - start_pos.z;

        assert!(distance > 1.0, "walked {distance}m");
        assert!((end_pos.x - start_pos.x).abs() < 1e-3);
    }

    #[test]
    fn test_mouse_turns_movement() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test");
        let start_pos = sim.get_player(id).unwrap().position();

        // Quarter turn to the right: forward becomes +X
        let mut turn = PlayerInput::default();
        turn.mouse_delta = (std::f32::consts::FRAC_PI_2 / (2.0 * 0.001), 0.0);
        sim.tick(&[turn]);

        let input = PlayerInput::holding(&[Action::Forward]);
        for _ in 0..50 {
            sim.tick(&[input]);
        }

        let end_pos = sim.get_player(id).unwrap().position();
        assert!(end_pos.x - start_pos.x > 1.0);
        assert!((end_pos.z - start_pos.z).abs() < 0.05);
    }

    #[test]
    fn test_run_is_recorded() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test");

        for _ in 0..50 {
            sim.tick(&[PlayerInput::holding(&[Action::Forward])]);
        }

        let player = sim.get_player(id).unwrap();
        assert_eq!(player.recorder.samples().len(), 16);
        assert!((player.run_time - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_reaching_finish_stores_best_run() {
        let mut level = Level::test_arena();
        level.triggers = vec![TriggerVolume {
            position: Vec3::new(0.0, 1.0, -17.0),
            half_extents: Vec3::new(3.0, 2.0, 0.5),
            trigger_id: FINISH_TRIGGER.to_string(),
            repeatable: true,
            activated: false,
        }];
        let mut sim = Simulation::new(SimulationConfig::default(), level);
        let id = sim.add_player("Runner");

        for _ in 0..100 {
            sim.tick(&[PlayerInput::holding(&[Action::Forward])]);
        }

        let player = sim.get_player(id).unwrap();
        assert!(player.finished);
        assert!(sim.level.is_completed());

        let best = sim.level.best_run.as_ref().unwrap();
        assert!(best.completion_time > 0.0);
        assert!(!best.is_empty());
        assert!(sim.ghost_pose().is_some());
    }

    #[test]
    fn test_restart_run_respawns() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test");
        let spawn = sim.get_player(id).unwrap().position();

        for _ in 0..30 {
            sim.tick(&[PlayerInput::holding(&[Action::Forward])]);
        }
        assert!(sim.restart_run(id));

        let player = sim.get_player(id).unwrap();
        assert!((player.position() - spawn).length() < 1e-4);
        assert_eq!(player.run_time, 0.0);
        assert!(player.recorder.samples().is_empty());
        assert!(!sim.restart_run(999));
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<PlayerInput> = (0..100u32)
            .map(|tick| {
                let mut held = vec![Action::Forward];
                if tick % 3 == 0 {
                    held.push(Action::Right);
                }
                if tick % 10 == 0 {
                    held.push(Action::Jump);
                }
                PlayerInput {
                    mouse_delta: ((tick % 7) as f32, 0.0),
                    ..PlayerInput::holding(&held)
                }
            })
            .collect();

        let run = || {
            let mut sim = Simulation::test();
            sim.add_player("Test");
            for input in &inputs {
                sim.tick(&[*input]);
            }
            sim.get_player(1).unwrap().movement.clone()
        };

        assert_eq!(run(), run());
    }
}
