//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`VMFGEN_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::room::RoomParams;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how the map is written
    #[serde(default)]
    pub output: OutputConfig,
    /// Built-in room parameters
    #[serde(default)]
    pub room: RoomConfig,
    /// Map template selection
    #[serde(default)]
    pub map: MapConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`VMFGEN_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // VMFGEN_ROOM__SIDES=6 -> room.sides = 6
        figment = figment.merge(Env::prefixed("VMFGEN_").split("__"));

        Ok(figment.extract()?)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file; stdout when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Mark the map as a prefab
    #[serde(default)]
    pub prefab: bool,
}

/// Built-in room configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Number of walls
    pub sides: usize,
    /// Distance from the room center to the inner face of each wall
    pub radius: f64,
    /// Clear height between floor and ceiling
    pub height: f64,
    /// Thickness of floor, ceiling and walls
    pub wall_thickness: f64,
    pub wall_material: String,
    pub floor_material: String,
    pub ceiling_material: String,
    /// Per-side wall switch; sides past the end of the list get a wall
    #[serde(default)]
    pub wall_mask: Vec<bool>,
    /// Place an `info_player_start` on the floor
    #[serde(default = "default_true")]
    pub player_start: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            sides: 8,
            radius: 256.0,
            height: 128.0,
            wall_thickness: 16.0,
            wall_material: "brick/brickwall026f".to_string(),
            floor_material: "concrete/concretefloor033a".to_string(),
            ceiling_material: "concrete/concretefloor033a".to_string(),
            wall_mask: vec![false, true, true, true, true, true, true, true],
            player_start: true,
        }
    }
}

impl RoomConfig {
    /// Convert to the room builder's parameters
    pub fn to_room_params(&self) -> RoomParams {
        RoomParams {
            sides: self.sides,
            radius: self.radius,
            height: self.height,
            wall_thickness: self.wall_thickness,
            wall_material: self.wall_material.clone(),
            floor_material: self.floor_material.clone(),
            ceiling_material: self.ceiling_material.clone(),
            wall_mask: self.wall_mask.clone(),
        }
    }
}

/// Map template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// RON map template to build instead of the built-in room
    #[serde(default)]
    pub template: Option<PathBuf>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] figment::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.room.sides, 8);
        assert_eq!(config.room.wall_thickness, 16.0);
        assert!(config.output.path.is_none());
        assert!(!config.output.prefab);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("wall_material"));
        assert!(toml.contains("log_level"));
        // unset paths are left out
        assert!(!toml.contains("template"));
    }

    #[test]
    fn test_room_params_follow_config() {
        let mut room = RoomConfig::default();
        room.sides = 5;
        room.wall_mask = vec![true, false];
        let params = room.to_room_params();
        assert_eq!(params.sides, 5);
        assert_eq!(params.wall_mask, vec![true, false]);
        assert_eq!(params.floor_material, "concrete/concretefloor033a");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = Figment::new()
            .merge(Toml::string("[output]\nprefab = true\n"))
            .extract()
            .unwrap();
        assert!(config.output.prefab);
        assert_eq!(config.room.radius, 256.0);
        assert_eq!(config.debug.log_level, "info");
    }
}
