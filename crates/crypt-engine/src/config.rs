//! Engine configuration.
//!
//! Provides the area names, fade timing and frame loop parameters for the
//! runner. Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crypt_scene::FadeEasing;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "crypt.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CRYPT_CONFIG";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Areas ===
    /// Area that stays loaded for the whole process and hosts the player rig
    pub bootstrap_area: String,
    /// Area loaded at startup
    pub initial_area: String,
    /// Areas visited in order after the initial one
    pub route: Vec<String>,
    /// Area catalog file (RON); the built-in catalog is used if missing
    pub catalog_path: PathBuf,

    // === Transitions ===
    /// Full fade duration in seconds
    pub fade_duration: f32,
    /// Curve for the fade overlay alpha
    pub fade_easing: FadeEasing,
    /// Frames a load or unload takes in the in-memory host
    pub load_latency_frames: u32,

    // === Frame Loop ===
    /// Simulated frames per second
    pub tick_rate: u32,
    /// Frame cap for the headless run
    pub max_frames: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bootstrap_area: "Bootstrap".to_string(),
            initial_area: "Dungeon1".to_string(),
            route: vec!["Dungeon2".to_string()],
            catalog_path: PathBuf::from("areas.ron"),

            fade_duration: 1.0,
            fade_easing: FadeEasing::Linear,
            load_latency_frames: 3,

            tick_rate: 60,
            max_frames: 6000,
        }
    }
}

impl EngineConfig {
    /// Loads the config from [`EngineConfig::config_path`].
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Loads the config at `path`.
    ///
    /// A missing or invalid file is logged and yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(Some(config)) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Ok(None) => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            },
            Err(e) => {
                warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            },
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).context("reading file")?;
        let config = toml::from_str(&text).context("parsing TOML")?;
        Ok(Some(config))
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let text = toml::to_string_pretty(self).context("serializing config")?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Where the config is read from.
    ///
    /// `CRYPT_CONFIG` wins, then `<config dir>/crypt/crypt.toml` if it exists,
    /// then `crypt.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        user_config_path()
            .filter(|path| path.is_file())
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Where a new config file is written.
    ///
    /// `CRYPT_CONFIG` wins, then the per-user config dir, then the working
    /// directory.
    pub fn write_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(user_config_path)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Clamps values into ranges the runner can use.
    pub fn validate(&mut self) {
        self.fade_duration = if self.fade_duration.is_finite() {
            self.fade_duration.clamp(0.0, 10.0)
        } else {
            warn!("Non-finite fade duration, using default");
            Self::default().fade_duration
        };
        self.load_latency_frames = self.load_latency_frames.min(600);

        self.tick_rate = self.tick_rate.clamp(10, 240);
        self.max_frames = self.max_frames.max(1);

        if self.bootstrap_area.trim().is_empty() {
            warn!("Empty bootstrap area name, using default");
            self.bootstrap_area = Self::default().bootstrap_area;
        }
        self.route.retain(|area| !area.trim().is_empty());
    }

    /// Fixed frame delta in seconds.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// `<platform config dir>/crypt/crypt.toml`.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crypt").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.bootstrap_area, "Bootstrap");
        assert_eq!(config.initial_area, "Dungeon1");
        assert_eq!(config.fade_duration, 1.0);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        // Set invalid values
        config.fade_duration = -2.0;
        config.tick_rate = 1;
        config.max_frames = 0;
        config.bootstrap_area = "  ".to_string();
        config.route = vec!["Dungeon2".to_string(), String::new()];

        config.validate();

        // Should be clamped
        assert_eq!(config.fade_duration, 0.0);
        assert_eq!(config.tick_rate, 10);
        assert_eq!(config.max_frames, 1);
        assert_eq!(config.bootstrap_area, "Bootstrap");
        assert_eq!(config.route, vec!["Dungeon2".to_string()]);
    }

    #[test]
    fn test_config_validation_non_finite_fade() {
        let mut config = EngineConfig::default();
        config.fade_duration = f32::NAN;
        config.validate();
        assert_eq!(config.fade_duration, 1.0);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("crypt.toml");

        let mut config = EngineConfig::default();
        config.initial_area = "Dungeon3".to_string();
        config.fade_duration = 0.5;
        config.route = vec!["Dungeon1".to_string(), "Dungeon2".to_string()];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.initial_area, "Dungeon3");
        assert_eq!(loaded.fade_duration, 0.5);
        assert_eq!(loaded.route, config.route);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("crypt.toml");
        fs::write(&config_path, "initial_area = \"Dungeon2\"\n").expect("Failed to write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.initial_area, "Dungeon2");
        assert_eq!(loaded.bootstrap_area, "Bootstrap");
        assert_eq!(loaded.load_latency_frames, 3);
    }

    #[test]
    fn test_config_invalid_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("crypt.toml");
        fs::write(&config_path, "fade_duration = \"slow\"").expect("Failed to write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.fade_duration, 1.0);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/crypt.toml");
        assert_eq!(config.initial_area, "Dungeon1");
    }

    #[test]
    fn test_config_fade_easing_from_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("crypt.toml");
        fs::write(&config_path, "fade_easing = \"smooth_step\"\n").expect("Failed to write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.fade_easing, FadeEasing::SmoothStep);
        assert_eq!(loaded.fade_duration, 1.0);
    }

    #[test]
    fn test_config_round_trip_keeps_every_field() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("crypt.toml");
        let config = EngineConfig::default();

        config.save_to(&config_path).expect("Failed to save config");
        assert_eq!(EngineConfig::load_from(&config_path), config);
    }

    #[test]
    fn test_user_config_path_shape() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("crypt/crypt.toml"));
        }
    }

    #[test]
    fn test_frame_dt() {
        let mut config = EngineConfig::default();
        config.tick_rate = 50;
        assert!((config.frame_dt() - 0.02).abs() < 1e-6);
    }
}
