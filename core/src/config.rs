//! Configuration (`<config dir>/config.toml`)
//!
//! Start-up defaults for the pet window and playback. The file is only read;
//! choices made from the menu are not written back.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::control::DEFAULT_OPACITY;
use crate::geometry::{ScreenGeometry, Size};
use crate::speed::DEFAULT_SPEED_MS;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Pet window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Display fallback settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Pet window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Initial opacity in percent (default: 85)
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Window width before anything is loaded (default: 200)
    #[serde(default = "default_initial_edge")]
    pub initial_width: u32,
    /// Window height before anything is loaded (default: 200)
    #[serde(default = "default_initial_edge")]
    pub initial_height: u32,
}

/// Playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial speed in milliseconds per frame (default: 100)
    #[serde(default = "default_speed_ms")]
    pub speed_ms: u32,
}

/// Screen size used when the platform does not report the monitor size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fallback_width")]
    pub fallback_width: u32,
    #[serde(default = "default_fallback_height")]
    pub fallback_height: u32,
}

fn default_opacity() -> u8 {
    DEFAULT_OPACITY
}
fn default_initial_edge() -> u32 {
    200
}
fn default_speed_ms() -> u32 {
    DEFAULT_SPEED_MS
}
fn default_fallback_width() -> u32 {
    1920
}
fn default_fallback_height() -> u32 {
    1080
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            initial_width: default_initial_edge(),
            initial_height: default_initial_edge(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_ms: default_speed_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
        }
    }
}

impl WindowConfig {
    pub fn initial_size(&self) -> Size {
        Size::new(self.initial_width.max(1), self.initial_height.max(1))
    }
}

impl DisplayConfig {
    pub fn fallback_screen(&self) -> ScreenGeometry {
        ScreenGeometry::with_size(self.fallback_width.max(1), self.fallback_height.max(1))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Deskpet\config`
/// On macOS: `~/Library/Application Support/io.deskpet.Deskpet`
/// On Linux: `~/.config/deskpet`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.deskpet", "", "Deskpet")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Parse a configuration file's contents.
pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return Config::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match parse(&content) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            Config::default()
        }
    }
}
