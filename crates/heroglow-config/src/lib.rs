//! Configuration file handling for heroglow.
//!
//! Settings live in `config.toml` inside the platform config directory
//! (`~/.config/heroglow` on Linux). A missing file means defaults; every
//! field is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use heroglow_core::{AnimationSpeed, MAX_ENTITIES, SceneKind, SceneTuning};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest frame rate the render loop accepts.
pub const MAX_FPS: u32 = 240;

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// User settings for the hero animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scene shown at startup.
    pub scene: SceneKind,
    /// Upper bound on live entities. Zero mounts a blank scene.
    pub max_entities: u32,
    /// Fixed RNG seed for a reproducible run.
    pub seed: Option<u64>,
    pub speed: AnimationSpeed,
    /// Target frames per second.
    pub fps: u32,
    pub tuning: SceneTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            max_entities: 12,
            seed: None,
            speed: AnimationSpeed::default(),
            fps: 30,
            tuning: SceneTuning::default(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be greater than zero".into()));
        }
        if self.fps > MAX_FPS {
            return Err(ConfigError::Invalid(format!(
                "fps must be at most {MAX_FPS}, got {}",
                self.fps
            )));
        }
        if self.max_entities > MAX_ENTITIES {
            return Err(ConfigError::Invalid(format!(
                "max_entities must be at most {MAX_ENTITIES}, got {}",
                self.max_entities
            )));
        }
        Ok(())
    }

    /// Time budget of one frame at the configured rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "heroglow")
}

/// Path of the config file, if the platform has a config directory.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for runtime output such as the log file.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heroglow_core::TextureSize;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scene, SceneKind::Dataflow);
        assert_eq!(config.max_entities, 12);
        assert_eq!(config.seed, None);
        assert_eq!(config.tuning.seed_count, 2);
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            scene = "particles"
            seed = 99
            speed = "fast"

            [tuning]
            beam_texture = { width = 128, height = 32 }
            "#,
        )
        .unwrap();
        assert_eq!(config.scene, SceneKind::Particles);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.speed, AnimationSpeed::Fast);
        assert_eq!(config.max_entities, 12);
        assert_eq!(config.tuning.beam_texture, TextureSize::new(128, 32));
        assert_eq!(config.tuning.sprite_texture, TextureSize::new(32, 32));
    }

    #[test]
    fn test_zero_fps_is_invalid() {
        let err = Config::from_toml_str("fps = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Config::from_toml_str("fps = 1000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_max_entities_upper_bound() {
        let at_limit = format!("max_entities = {MAX_ENTITIES}");
        assert_eq!(
            Config::from_toml_str(&at_limit).unwrap().max_entities,
            MAX_ENTITIES
        );
        let err = Config::from_toml_str("max_entities = 4294967295").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_scene_is_parse_error() {
        let err = Config::from_toml_str(r#"scene = "lasers""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "max_entities = 0\nfps = 60\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_entities, 0);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config {
            seed: Some(7),
            scene: SceneKind::Geometric,
            ..Config::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
