//! Application settings: base-address resolution and persistence.
//!
//! Resolution happens once at startup and produces an immutable value
//! threaded through construction; nothing else reads the environment or
//! the settings file. Precedence: environment override, then the
//! persisted value, then the built-in default. Blank values do not count.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the backend address.
pub const BASE_URL_ENV: &str = "DRIVEDECK_BASE_URL";

const CONFIG_DIR_NAME: &str = "drivedeck";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors when reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine the user config directory")]
    NoConfigDir,

    /// Reading the settings file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the settings file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML.
    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Persisted user settings.
///
/// A single key today: the backend base address, written only when the
/// user opts to remember it at a successful login. The token is never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Remembered backend base address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Settings {
    /// Location of the settings file in the user config directory.
    pub fn config_file() -> Result<PathBuf, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load settings from the user config directory.
    ///
    /// A missing file yields the defaults; a present but malformed file
    /// is an error.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        toml::from_str(&contents).map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Save settings to the user config directory.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::config_file()?)
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        // Settings serialize infallibly: one optional string field.
        let contents = toml::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, contents).map_err(write_err)
    }
}

/// Resolve the backend base address from the environment override and the
/// persisted value, falling back to the built-in default.
pub fn resolve_base_url(env: Option<&str>, persisted: Option<&str>) -> String {
    non_blank(env)
        .or_else(|| non_blank(persisted))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// One-shot startup resolution: environment, then settings, then default.
pub fn startup_base_url(settings: &Settings) -> String {
    resolve_base_url(
        std::env::var(BASE_URL_ENV).ok().as_deref(),
        settings.base_url.as_deref(),
    )
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_persisted() {
        assert_eq!(
            resolve_base_url(Some("http://env"), Some("http://saved")),
            "http://env"
        );
    }

    #[test]
    fn test_persisted_wins_over_default() {
        assert_eq!(resolve_base_url(None, Some("http://saved")), "http://saved");
        assert_eq!(resolve_base_url(Some("  "), Some("http://saved")), "http://saved");
    }

    #[test]
    fn test_default_when_both_blank() {
        assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some(""), Some("   ")), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let settings = Settings {
            base_url: Some("http://host/api".into()),
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_settings_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Settings::default());
    }
}
