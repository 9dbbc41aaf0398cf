//! Warden settings with persistence
//!
//! Settings are saved to `~/.config/warden/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use warden_game::SimulationConfig;

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenSettings {
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
    pub simulation: SimulationConfig,
    pub demo: DemoSettings,
}

impl WardenSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("warden"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default().normalized();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default().normalized();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default().normalized()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default().normalized()
            }
        }
    }

    /// Parse settings from TOML text. Missing fields take their defaults.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(content).map(Self::normalized)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    fn normalized(mut self) -> Self {
        if self.log_level.trim().is_empty() {
            self.log_level = "info".to_string();
        }
        self
    }
}

/// Headless demo run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Number of fixed ticks to simulate
    pub ticks: u32,
    /// Scene file to load instead of the built-in outpost
    pub scene: Option<PathBuf>,
    /// Option index the pilot picks when a line offers choices
    pub choice: usize,
    /// Ticks the pilot waits between dialogue inputs
    pub read_ticks: u32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            ticks: 900,
            scene: None,
            choice: 0,
            read_ticks: 45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = WardenSettings::parse("").unwrap();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.demo.ticks, 900);
        assert_eq!(settings.simulation.prompt.poll_interval, 0.2);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let settings = WardenSettings::parse(
            r#"
            log_level = "debug"

            [simulation]
            seed = 42

            [simulation.prompt]
            poll_interval = 0.5

            [simulation.player]
            max_health = 150.0

            [demo]
            choice = 1
            "#,
        )
        .unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.simulation.seed, 42);
        assert_eq!(settings.simulation.prompt.poll_interval, 0.5);
        assert!(!settings.simulation.prompt.hide_during_dialogue);
        assert_eq!(settings.simulation.player.max_health, 150.0);
        assert_eq!(settings.simulation.player.attack.cooldown, 0.5);
        assert_eq!(settings.demo.choice, 1);
        assert_eq!(settings.demo.ticks, 900);
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let mut settings = WardenSettings::default().normalized();
        settings.demo.scene = Some(PathBuf::from("scenes/custom.toml"));
        let text = toml::to_string_pretty(&settings).unwrap();
        let back = WardenSettings::parse(&text).unwrap();
        assert_eq!(back.demo.scene, settings.demo.scene);
    }
}
