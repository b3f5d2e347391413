//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::catalog::{SoundCatalog, SoundDescriptor};
use crate::error::MixerError;
use std::path::PathBuf;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Starting slider position for a newly toggled-on track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStartVolume {
    /// Individual volume 100: the track starts at exactly the master level
    #[default]
    Full,
    /// Individual volume mirrors the master volume at toggle time
    MirrorMaster,
}

/// Mixer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Master volume at startup (clamped to 0..=100)
    pub initial_master_volume: u8,
    /// Volume restored by unmute when nothing was remembered
    pub unmute_volume: u8,
    /// How a newly started track picks its individual volume
    pub track_start_volume: TrackStartVolume,
    /// Directory the built-in sounds are loaded from
    pub sounds_root: PathBuf,
    /// Replaces the built-in catalog when present
    pub sounds: Option<Vec<SoundDescriptor>>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            initial_master_volume: 80,
            unmute_volume: 80,
            track_start_volume: TrackStartVolume::Full,
            sounds_root: PathBuf::from("sounds"),
            sounds: None,
        }
    }
}

impl Config for MixerConfig {}

impl MixerConfig {
    /// Build the sound catalog this configuration describes
    ///
    /// # Errors
    /// - `DuplicateSoundId` if a configured catalog repeats an id
    pub fn catalog(&self) -> Result<SoundCatalog, MixerError> {
        match &self.sounds {
            Some(sounds) => SoundCatalog::new(sounds.clone()),
            None => Ok(SoundCatalog::builtin(&self.sounds_root)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("ambient_mixer_{}_{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_defaults() {
        let config = MixerConfig::default();
        assert_eq!(config.initial_master_volume, 80);
        assert_eq!(config.unmute_volume, 80);
        assert_eq!(config.track_start_volume, TrackStartVolume::Full);
        assert_eq!(config.catalog().unwrap().len(), 8);
    }

    #[test]
    fn test_load_partial_toml() {
        let path = temp_path("partial.toml");
        std::fs::write(
            &path,
            "initial_master_volume = 40\ntrack_start_volume = \"mirror_master\"\n",
        )
        .unwrap();

        let config = MixerConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.initial_master_volume, 40);
        assert_eq!(config.track_start_volume, TrackStartVolume::MirrorMaster);
        assert_eq!(config.unmute_volume, 80);
    }

    #[test]
    fn test_load_ron_with_custom_sounds() {
        let path = temp_path("custom.ron");
        std::fs::write(
            &path,
            r#"(
                sounds: Some([
                    (id: "hum", display_name: "Hum", resource_ref: "hum.ogg", visual_tag: "gray"),
                ]),
            )"#,
        )
        .unwrap();

        let config = MixerConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("hum").unwrap().resource_ref, "hum.ogg");
    }

    #[test]
    fn test_save_then_load_toml() {
        let path = temp_path("saved.toml");
        let config = MixerConfig {
            unmute_volume: 65,
            ..MixerConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = MixerConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format() {
        let path = temp_path("config.yaml");
        std::fs::write(&path, "initial_master_volume: 10").unwrap();

        let result = MixerConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MixerConfig::load_from_file("no/such/mixer.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
