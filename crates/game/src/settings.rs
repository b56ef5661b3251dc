//! Settings file loading.
//!
//! A settings file is TOML with three optional tables:
//!
//! ```toml
//! [simulation]
//! tick_rate = 50
//! mouse_sensitivity = 2.0
//!
//! [simulation.movement]
//! move_speed = 6.0
//!
//! [level]
//! name = "Hill"
//! settings = { gravity_multiplier = 0.8 }
//! ```
//!
//! Anything left out keeps its default. Without a `[level]` table the test
//! arena is used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strafe_physics::ConfigError;
use thiserror::Error;

use crate::level::{Level, LevelDescription};
use crate::simulation::{Simulation, SimulationConfig};

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid movement config: {0}")]
    Movement(#[from] ConfigError),

    #[error("tick rate must be at least 1")]
    TickRate,

    #[error("gravity multiplier must be a finite, non-negative number (got {0})")]
    GravityMultiplier(f32),
}

/// Everything a session is configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub level: Option<LevelDescription>,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_toml_str(&content)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every value the simulation depends on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.simulation.tick_rate == 0 {
            return Err(SettingsError::TickRate);
        }

        if let Err(err) = self.simulation.validate() {
            log::warn!("rejected movement config: {err}");
            return Err(err.into());
        }

        if let Some(level) = &self.level {
            let multiplier = level.settings.gravity_multiplier;
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(SettingsError::GravityMultiplier(multiplier));
            }
        }

        Ok(())
    }

    /// Build the configured level, or the test arena if none is given.
    pub fn build_level(&self) -> Level {
        match &self.level {
            Some(description) => Level::from_description(description),
            None => Level::test_arena(),
        }
    }

    /// Build a simulation from these settings.
    pub fn build_simulation(&self) -> Simulation {
        Simulation::new(self.simulation.clone(), self.build_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.build_level().id, "test_arena");
    }

    #[test]
    fn test_partial_movement_table() {
        let settings = Settings::from_toml_str(
            r#"
            [simulation]
            tick_rate = 100

            [simulation.movement]
            move_speed = 8.0
        "#,
        )
        .unwrap();

        assert_eq!(settings.simulation.tick_rate, 100);
        assert_eq!(settings.simulation.movement.move_speed, 8.0);
        assert_eq!(settings.simulation.movement.gravity, 20.0);
    }

    #[test]
    fn test_level_gravity_multiplier() {
        let settings = Settings::from_toml_str(
            r#"
            [level]
            name = "Moon"
            settings = { gravity_multiplier = 0.25 }
        "#,
        )
        .unwrap();

        let sim = settings.build_simulation();
        assert_eq!(sim.level.name, "Moon");
        assert_eq!(sim.level.settings.gravity_multiplier, 0.25);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = Settings::from_toml_str("[simulation]\ntick_rate = 0").unwrap_err();
        assert!(matches!(err, SettingsError::TickRate));
    }

    #[test]
    fn test_rejects_invalid_movement() {
        let err = Settings::from_toml_str("[simulation.movement]\noverbounce = 0.5").unwrap_err();
        assert!(matches!(err, SettingsError::Movement(ConfigError::Overbounce(_))));
    }

    #[test]
    fn test_rejects_negative_gravity_multiplier() {
        let err = Settings::from_toml_str("[level.settings]\ngravity_multiplier = -1.0").unwrap_err();
        assert!(matches!(err, SettingsError::GravityMultiplier(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_toml_str("[simulation\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nmouse_sensitivity = 3.5").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.simulation.mouse_sensitivity, 3.5);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("nope.toml")).unwrap_err();

        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }
}
