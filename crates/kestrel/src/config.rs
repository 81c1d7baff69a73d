//! File-backed configuration support

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors arising while loading or saving configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents did not parse
    #[error("config parse error: {0}")]
    Parse(String),

    /// The value could not be serialized
    #[error("config serialize error: {0}")]
    Serialize(String),

    /// The extension names no supported format
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// A serde type that round-trips through TOML or RON config files
///
/// The format is chosen by file extension. Implementors only need the
/// derive bounds; both methods come for free.
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Load a value from the given file
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save this value to the given file
    fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        title: String,
        volume: f32,
    }

    impl Config for Sample {}

    #[test]
    fn test_round_trip_through_toml() {
        let dir = std::env::temp_dir().join("kestrel-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.toml");

        let sample = Sample {
            title: "windowed".to_string(),
            volume: 0.8,
        };
        sample.save_to_file(&path).unwrap();
        let loaded = Sample::load_from_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = Sample::load_from_file(Path::new("settings.yaml"));
        assert!(matches!(err, Err(ConfigError::UnsupportedFormat(_)) | Err(ConfigError::Io(_))));
    }
}
