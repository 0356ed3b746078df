//! Config persistence and path resolution for `Config`.
//!
//! Covers:
//! - `load` / `load_from` / `save` / `save_to` (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_path`, `config_dir`)

use super::Config;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Config path: {:?}", path);

        if path.exists() {
            log::info!("Loading existing config from {:?}", path);

            let contents = fs::read_to_string(path)?;
            let config: Config = if contents.trim().is_empty() {
                Config::default()
            } else {
                serde_yaml_ng::from_str(&contents)?
            };
            config.validate()?;
            Ok(config)
        } else {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            log::info!("Default config created successfully");
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Get the configuration file path: `~/.config/sugar-term/config.yaml`
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join("sugar-term")
        } else {
            // Fallback if home directory cannot be determined
            PathBuf::from(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::ThemeKind;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        let config = Config {
            font_size: 12,
            theme: ThemeKind::Dark,
            scrollback_lines: 5000,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "font_size: 10\nemulation: vt100\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.font_size, 10);
        assert_eq!(loaded.emulation, "vt100");
        assert_eq!(loaded.scrollback_lines, 1000);
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "font_size: [[[").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_value_is_validation_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "font_size: 2\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_config_path_layout() {
        let path = Config::config_path();
        assert!(path.ends_with("sugar-term/config.yaml"));
    }
}
