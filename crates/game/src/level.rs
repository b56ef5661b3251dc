//! Levels: collision geometry, spawn points, triggers and the best run.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strafe_physics::{CollisionWorld, ContentFlags, LevelSettings};

use crate::ghost::{keep_if_faster, GhostRun};

/// Trigger id that ends a run.
pub const FINISH_TRIGGER: &str = "finish";

/// A playable level.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Geometry the movement controller sweeps against.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Per-level physics settings.
    pub settings: LevelSettings,

    /// Trigger volumes.
    pub triggers: Vec<TriggerVolume>,

    /// Fastest finished run, replayed as a ghost.
    pub best_run: Option<GhostRun>,
}

/// A spawn point for players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Box center the player is dropped from.
    pub position: Vec3,

    /// Starting camera yaw in radians.
    #[serde(default)]
    pub facing: f32,
}

/// An axis-aligned box that reports players standing in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerVolume {
    /// Center position.
    pub position: Vec3,

    /// Half-size on each axis.
    pub half_extents: Vec3,

    /// Name reported when the volume fires.
    pub trigger_id: String,

    /// Keep firing while occupied instead of once.
    #[serde(default)]
    pub repeatable: bool,

    /// Already fired since the last reset.
    #[serde(default, skip_serializing)]
    pub activated: bool,
}

impl TriggerVolume {
    /// Whether `point` lies inside the volume, boundary included.
    pub fn contains(&self, point: Vec3) -> bool {
        let min = self.position - self.half_extents;
        let max = self.position + self.half_extents;
        point.cmpge(min).all() && point.cmple(max).all()
    }
}

/// A solid box in a level file. Rotation is in radians about X, Y and Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushDescription {
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

/// Serialized form of a level, as found in a settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescription {
    pub id: String,
    pub name: String,
    /// Missing gravity multiplier means 1.0.
    pub settings: LevelSettings,
    pub brushes: Vec<BrushDescription>,
    pub spawn_points: Vec<SpawnPoint>,
    pub triggers: Vec<TriggerVolume>,
}

impl Level {
    /// Level with no geometry and default settings.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            settings: LevelSettings::default(),
            triggers: Vec::new(),
            best_run: None,
        }
    }

    /// Build a level from its serialized description.
    pub fn from_description(description: &LevelDescription) -> Self {
        let mut level = Self::new(&description.id, &description.name);
        level.settings = description.settings;
        level.spawn_points = description.spawn_points.clone();
        level.triggers = description.triggers.clone();

        for brush in &description.brushes {
            if brush.rotation == Vec3::ZERO {
                level.collision.add_box(brush.center, brush.half_extents, ContentFlags::SOLID);
            } else {
                level
                    .collision
                    .add_oriented_box(brush.center, brush.half_extents, brush.rotation, ContentFlags::SOLID);
            }
        }

        log::debug!(
            "built level '{}': {} brushes, {} spawn points, {} triggers",
            level.id,
            level.collision.brush_count(),
            level.spawn_points.len(),
            level.triggers.len()
        );

        level
    }

    /// Create a test level exercising every kind of terrain.
    ///
    /// Players spawn at the south end facing north (+Z) down a clear lane
    /// that ends in the finish trigger. Off to the sides are a walkable
    /// ramp, a slope too steep to stand on, a run of shallow steps and a
    /// crawlspace under a low ceiling.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Perimeter walls, 5m tall with their inner faces 49.5m from the center
        for (center, half_extents) in [
            (Vec3::new(0.0, 2.5, -50.0), Vec3::new(50.0, 2.5, 0.5)),
            (Vec3::new(0.0, 2.5, 50.0), Vec3::new(50.0, 2.5, 0.5)),
            (Vec3::new(50.0, 2.5, 0.0), Vec3::new(0.5, 2.5, 50.0)),
            (Vec3::new(-50.0, 2.5, 0.0), Vec3::new(0.5, 2.5, 50.0)),
        ] {
            level.collision.add_box(center, half_extents, ContentFlags::SOLID);
        }

        // 20 degree ramp rising toward +X
        level.collision.add_oriented_box(
            Vec3::new(20.0, 0.0, 10.0),
            Vec3::new(6.0, 0.5, 4.0),
            Vec3::new(0.0, 0.0, 20.0_f32.to_radians()),
            ContentFlags::SOLID,
        );

        // 60 degree slope, too steep to stand on
        level.collision.add_oriented_box(
            Vec3::new(-20.0, 0.0, 10.0),
            Vec3::new(4.0, 0.5, 4.0),
            Vec3::new(0.0, 0.0, 60.0_f32.to_radians()),
            ContentFlags::SOLID,
        );

        // Shallow steps, 5cm each, climbing toward +Z
        for i in 0..6 {
            let top = 0.05 * (i + 1) as f32;
            level.collision.add_box(
                Vec3::new(10.0, top / 2.0, 5.0 + 0.5 * i as f32),
                Vec3::new(1.5, top / 2.0, 0.25),
                ContentFlags::SOLID,
            );
        }

        // Crawlspace: ceiling 1.3m above the floor
        level.collision.add_box(
            Vec3::new(-10.0, 1.8, 5.0),
            Vec3::new(2.0, 0.5, 3.0),
            ContentFlags::SOLID,
        );

        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(0.0, 1.0, -20.0),
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(4.0, 1.0, -20.0),
            facing: 0.0,
        });

        level.triggers.push(TriggerVolume {
            position: Vec3::new(0.0, 1.0, 40.0),
            half_extents: Vec3::new(6.0, 2.0, 1.0),
            trigger_id: FINISH_TRIGGER.to_string(),
            repeatable: true,
            activated: false,
        });

        level
    }

    /// Spawn point `index`, if there is one.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Number of spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Fire every armed trigger containing `position` and return their ids.
    pub fn check_triggers(&mut self, position: Vec3) -> Vec<String> {
        let mut triggered = Vec::new();

        for trigger in &mut self.triggers {
            if trigger.activated && !trigger.repeatable {
                continue;
            }

            if trigger.contains(position) {
                trigger.activated = true;
                triggered.push(trigger.trigger_id.clone());
            }
        }

        triggered
    }

    /// Re-arm every trigger for a new run.
    pub fn reset_triggers(&mut self) {
        for trigger in &mut self.triggers {
            trigger.activated = false;
        }
    }

    /// Offer a finished run. It replaces the stored best only if faster.
    pub fn submit_run(&mut self, run: GhostRun) -> bool {
        keep_if_faster(&mut self.best_run, run)
    }

    /// Whether the level has been finished at least once.
    pub fn is_completed(&self) -> bool {
        self.best_run.is_some()
    }
}
