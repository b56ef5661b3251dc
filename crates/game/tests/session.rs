//! Integration tests for full game sessions.
//!
//! These drive a [`Simulation`] tick by tick through the test arena and
//! settings-built levels, checking runs, ghosts and level settings together.

use std::io::Write;

use glam::Vec3;
use strafe_game::input::PlayerInput;
use strafe_game::level::{Level, TriggerVolume, FINISH_TRIGGER};
use strafe_game::{Action, Settings, Simulation, SimulationConfig};

/// Tick until `done` holds or `max_ticks` pass. Returns the ticks taken.
fn tick_until(sim: &mut Simulation, input: PlayerInput, max_ticks: usize, done: impl Fn(&Simulation) -> bool) -> usize {
    for tick in 0..max_ticks {
        if done(sim) {
            return tick;
        }
        sim.tick(&[input]);
    }
    max_ticks
}

/// Ticks spent airborne after a single jump.
fn airtime(sim: &mut Simulation) -> usize {
    sim.tick(&[PlayerInput::holding(&[Action::Jump])]);
    assert!(!sim.players[0].on_ground());

    tick_until(sim, PlayerInput::default(), 500, |sim| sim.players[0].on_ground())
}

/// Arena with the finish line moved close to the spawn.
fn short_course() -> Simulation {
    let mut level = Level::test_arena();
    level.triggers = vec![TriggerVolume {
        position: Vec3::new(0.0, 1.0, -12.0),
        half_extents: Vec3::new(6.0, 2.0, 0.5),
        trigger_id: FINISH_TRIGGER.to_string(),
        repeatable: true,
        activated: false,
    }];
    Simulation::new(SimulationConfig::default(), level)
}

// ==================== Run Tests ====================

mod runs {
    use super::*;

    #[test]
    fn test_walking_the_arena_lane_finishes() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Runner");

        let ticks = tick_until(&mut sim, PlayerInput::holding(&[Action::Forward]), 1000, |sim| {
            sim.players[0].finished
        });

        assert!(ticks < 1000, "never reached the finish");
        let player = sim.get_player(id).unwrap();
        assert!(player.on_ground());
        assert!(sim.level.is_completed());
    }

    #[test]
    fn test_slower_run_keeps_previous_best() {
        let mut sim = short_course();
        let id = sim.add_player("Runner");

        tick_until(&mut sim, PlayerInput::holding(&[Action::Forward]), 500, |sim| sim.players[0].finished);
        let best_time = sim.level.best_run.as_ref().unwrap().completion_time;

        // Crouch-walking covers the same distance at half speed
        assert!(sim.restart_run(id));
        tick_until(&mut sim, PlayerInput::holding(&[Action::Forward, Action::Crouch]), 1000, |sim| {
            sim.players[0].finished
        });

        assert!(sim.players[0].finished);
        assert!(sim.players[0].run_time > best_time);
        assert_eq!(sim.level.best_run.as_ref().unwrap().completion_time, best_time);
    }

    #[test]
    fn test_faster_run_replaces_best() {
        let mut sim = short_course();
        let id = sim.add_player("Runner");

        tick_until(&mut sim, PlayerInput::holding(&[Action::Forward, Action::Crouch]), 1000, |sim| {
            sim.players[0].finished
        });
        let slow_time = sim.level.best_run.as_ref().unwrap().completion_time;

        assert!(sim.restart_run(id));
        tick_until(&mut sim, PlayerInput::holding(&[Action::Forward]), 500, |sim| sim.players[0].finished);

        let best = sim.level.best_run.as_ref().unwrap();
        assert!(best.completion_time < slow_time);
    }
}

// ==================== Ghost Tests ====================

mod ghosts {
    use super::*;

    #[test]
    fn test_no_ghost_before_first_finish() {
        let mut sim = Simulation::test();
        sim.add_player("Runner");

        sim.tick(&[PlayerInput::default()]);

        assert!(sim.ghost_pose().is_none());
    }

    #[test]
    fn test_ghost_follows_recorded_path() {
        let mut sim = short_course();
        let id = sim.add_player("Runner");

        tick_until(&mut sim, PlayerInput::holding(&[Action::Forward]), 500, |sim| sim.players[0].finished);
        assert!(sim.restart_run(id));

        let spawn = sim.get_player(id).unwrap().position();
        let mut farthest = f32::MIN;
        for _ in 0..40 {
            sim.tick(&[PlayerInput::default()]);
            let pose = sim.ghost_pose().expect("ghost is replaying");

            // The recorded run went straight up the lane
            assert!((pose.position.x - spawn.x).abs() < 1e-3);
            assert!(pose.position.z >= spawn.z - 1e-3);
            assert!(pose.buttons.pressed(Action::Forward));
            farthest = farthest.max(pose.position.z);
        }

        assert!(farthest > spawn.z + 0.5);
    }
}

// ==================== Settings Tests ====================

mod settings {
    use super::*;

    #[test]
    fn test_low_gravity_level_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [level]
            id = "low_grav"
            name = "Low Gravity"
            settings = {{ gravity_multiplier = 0.5 }}

            [[level.brushes]]
            center = [0.0, -0.5, 0.0]
            half_extents = [20.0, 0.5, 20.0]

            [[level.spawn_points]]
            position = [0.0, 1.0, 0.0]
            "#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        let mut low = settings.build_simulation();
        low.add_player("Jumper");
        assert!(low.players[0].on_ground());

        let mut normal = Simulation::test();
        normal.add_player("Jumper");

        let low_airtime = airtime(&mut low);
        let normal_airtime = airtime(&mut normal);

        assert!(
            low_airtime as f32 > normal_airtime as f32 * 1.5,
            "low={low_airtime} normal={normal_airtime}"
        );
    }

    #[test]
    fn test_tick_rate_sets_step() {
        let settings = Settings::from_toml_str("[simulation]\ntick_rate = 100").unwrap();
        let sim = settings.build_simulation();

        assert!((sim.delta_time() - 0.01).abs() < 1e-9);
    }
}
