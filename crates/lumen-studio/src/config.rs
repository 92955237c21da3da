//! Studio configuration.
//!
//! Provides the library server, playback, device output and file locations.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lumen_editor::grid::Orientation;
use lumen_editor::player::DEFAULT_FPS;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "lumen.toml";

/// Application directory under the platform config and data dirs.
const APP_DIR: &str = "lumen";

/// Default icon library server.
pub const DEFAULT_LIBRARY_URL: &str = "http://localhost:8234";

/// Errors reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid TOML for this config.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written as TOML.
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Studio configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    // === Library ===
    /// Base URL of the icon library server
    pub library_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Keep the library in memory instead of talking to the server
    pub offline: bool,

    // === Editing ===
    /// Playback rate for new animations (1-60)
    pub default_fps: u32,
    /// Where the work in progress is kept between runs
    pub draft_path: PathBuf,
    /// Directory for PNG exports
    pub export_dir: PathBuf,

    // === Device ===
    /// Brightness applied to frames sent to the device
    pub brightness: u8,
    /// Panel orientation
    pub orientation: Orientation,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            library_url: DEFAULT_LIBRARY_URL.to_string(),
            request_timeout_secs: 10,
            offline: false,

            default_fps: DEFAULT_FPS,
            draft_path: default_draft_path(),
            export_dir: PathBuf::from("exports"),

            brightness: 255,
            orientation: Orientation::default(),
        }
    }
}

impl StudioConfig {
    /// Reads the config at `path`.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// logged and also yields the defaults.
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
                warn!("Ignoring config at {}: {e}", path.display());
                Self::default()
            },
        }
    }

    fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&contents)?))
    }

    /// Writes the config to `path`, creating missing parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default config file: `lumen/lumen.toml` in the platform config dir,
    /// or `lumen.toml` in the working directory when there is none.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join(APP_DIR).join(CONFIG_FILE),
        )
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        let url = self.library_url.trim().trim_end_matches('/');
        self.library_url = if url.is_empty() {
            DEFAULT_LIBRARY_URL.to_string()
        } else {
            url.to_string()
        };
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 120);
        self.default_fps = self.default_fps.clamp(1, 60);
    }

    /// Request timeout as a duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Draft file in the platform data dir.
fn default_draft_path() -> PathBuf {
    let name = "draft.json";
    dirs::data_dir().map_or_else(|| PathBuf::from(name), |dir| dir.join(APP_DIR).join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_editor::grid::Rotation;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.library_url, "http://localhost:8234");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.default_fps, 8);
        assert_eq!(config.brightness, 255);
        assert!(!config.offline);
        assert!(config.orientation.is_identity());
    }

    #[test]
    fn test_default_paths_use_platform_dirs() {
        let config = StudioConfig::default();
        match dirs::data_dir() {
            Some(data) => assert_eq!(config.draft_path, data.join("lumen").join("draft.json")),
            None => assert_eq!(config.draft_path, PathBuf::from("draft.json")),
        }
        match dirs::config_dir() {
            Some(dir) => assert_eq!(StudioConfig::config_path(), dir.join("lumen").join("lumen.toml")),
            None => assert_eq!(StudioConfig::config_path(), PathBuf::from("lumen.toml")),
        }
    }

    #[test]
    fn test_config_save_into_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = StudioConfig::default().save_to(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = StudioConfig {
            library_url: " http://icons.local:8234/ ".to_string(),
            request_timeout_secs: 0,
            default_fps: 500,
            ..StudioConfig::default()
        };

        config.validate();

        assert_eq!(config.library_url, "http://icons.local:8234");
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.default_fps, 60);

        config.library_url = "  ".to_string();
        config.validate();
        assert_eq!(config.library_url, DEFAULT_LIBRARY_URL);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("lumen.toml");

        let mut config = StudioConfig::default();
        config.offline = true;
        config.brightness = 40;
        config.orientation = Orientation {
            rotate: Rotation::Cw270,
            flip_h: true,
            flip_v: false,
        };

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = StudioConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = StudioConfig::load_from("/nonexistent/path/lumen.toml");
        assert_eq!(config.library_url, DEFAULT_LIBRARY_URL);
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("lumen.toml");
        fs::write(&config_path, "brightness = \"very\"").expect("write");

        let config = StudioConfig::load_from(&config_path);
        assert_eq!(config.brightness, 255);
    }

    #[test]
    fn test_config_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("lumen.toml");
        fs::write(&config_path, "default_fps = 12\n\n[orientation]\nrotate = 90\n").expect("write");

        let config = StudioConfig::load_from(&config_path);
        assert_eq!(config.default_fps, 12);
        assert_eq!(config.orientation.rotate, Rotation::Cw90);
        assert!(!config.orientation.flip_h);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = StudioConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("library_url"));
        assert!(toml_str.contains("[orientation]"));
    }
}
