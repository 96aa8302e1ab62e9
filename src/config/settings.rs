//! Application settings and paths.
//!
//! Manages XDG-compliant paths for the settings file and the editable
//! service table.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::traits::{DEFAULT_BANNER_TIMEOUT, DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/skiff)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance.
    pub fn get() -> ConfigResult<&'static Paths> {
        if let Some(paths) = PATHS.get() {
            return Ok(paths);
        }
        let paths = Self::new()?;
        Ok(PATHS.get_or_init(|| paths))
    }

    fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "skiff", "skiff").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the path to the user's service table.
    pub fn services_file(&self) -> PathBuf {
        self.config_dir.join("services.json")
    }
}

/// Application-wide settings. Command-line flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default concurrency level.
    pub default_concurrency: usize,
    /// Default connect timeout in milliseconds.
    pub default_connect_timeout_ms: u64,
    /// Default banner read timeout in milliseconds.
    pub default_banner_timeout_ms: u64,
    /// Default output format.
    pub default_output_format: String,
    /// Service table to load instead of the default location.
    pub services_file: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: DEFAULT_CONCURRENCY,
            default_connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            default_banner_timeout_ms: DEFAULT_BANNER_TIMEOUT.as_millis() as u64,
            default_output_format: "plain".to_string(),
            services_file: None,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no file
    /// or no home directory.
    pub fn load() -> ConfigResult<Self> {
        let Ok(paths) = Paths::get() else {
            return Ok(Self::default());
        };
        let file = paths.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_concurrency, 500);
        assert_eq!(settings.default_connect_timeout_ms, 1000);
        assert_eq!(settings.default_banner_timeout_ms, 1500);
        assert!(settings.services_file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"default_concurrency": 64}"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.default_concurrency, 64);
        assert_eq!(settings.default_banner_timeout_ms, 1500);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            default_connect_timeout_ms: 250,
            ..AppSettings::default()
        };

        settings.save_to(&path).unwrap();
        let reloaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(reloaded.default_connect_timeout_ms, 250);
    }

    #[test]
    fn test_invalid_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            AppSettings::load_from(&path),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
