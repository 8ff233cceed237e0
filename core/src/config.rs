//! Configuration management (config.toml)
//!
//! Settings live in TOML in the platform-specific config directory. Every
//! key is optional and falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::DEFAULT_FRAME_RATE;
use crate::orchestrator::DEFAULT_STATS_LOG_INTERVAL;

/// Config file name inside [`config_dir`]
pub const CONFIG_FILE: &str = "config.toml";

/// Highest accepted frame rate
pub const MAX_FRAME_RATE: u32 = 240;

/// Largest accepted frame edge in pixels
pub const MAX_RENDER_SIZE: u32 = 8192;

/// Viewport width assumed when no monitor can be queried
pub const FALLBACK_VIEWPORT_WIDTH: f64 = 1280.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Frame production settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Target frames per second (default: 24, range: 1-240)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Edge of the square frame requested from the engine (default: 512)
    #[serde(default = "default_render_size")]
    pub render_size: u32,
    /// Rendered frames between stats log lines, 0 disables (default: 240)
    #[serde(default = "default_stats_log_interval")]
    pub stats_log_interval: u64,
}

/// Presentation window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Upper bound on the surface edge in logical pixels (default: 512)
    #[serde(default = "default_max_surface")]
    pub max_surface: u32,
    /// Space kept free beside the surface (default: 16)
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Linear memory cap in MiB (default: 64)
    #[serde(default = "default_ram_limit_mb")]
    pub ram_limit_mb: u32,
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}
fn default_render_size() -> u32 {
    512
}
fn default_stats_log_interval() -> u64 {
    DEFAULT_STATS_LOG_INTERVAL
}
fn default_max_surface() -> u32 {
    512
}
fn default_margin() -> u32 {
    16
}
fn default_title() -> String {
    "framestream".to_string()
}
fn default_true() -> bool {
    true
}
fn default_ram_limit_mb() -> u32 {
    64
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            render_size: default_render_size(),
            stats_log_interval: default_stats_log_interval(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_surface: default_max_surface(),
            margin: default_margin(),
            title: default_title(),
            vsync: default_true(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ram_limit_mb: default_ram_limit_mb(),
        }
    }
}

impl WindowConfig {
    /// Logical edge of the square surface for a viewport of the given width
    ///
    /// `min(max_surface, viewport_width - margin)`, never below one pixel.
    pub fn surface_size(&self, viewport_width: f64) -> f64 {
        let available = viewport_width - f64::from(self.margin);
        f64::from(self.max_surface).min(available).max(1.0)
    }
}

impl EngineConfig {
    pub fn ram_limit_bytes(&self) -> usize {
        (self.ram_limit_mb as usize).saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FRAME_RATE).contains(&self.stream.frame_rate) {
            return Err(ConfigError::Invalid(format!(
                "stream.frame_rate must be between 1 and {}, got {}",
                MAX_FRAME_RATE, self.stream.frame_rate
            )));
        }
        if !(1..=MAX_RENDER_SIZE).contains(&self.stream.render_size) {
            return Err(ConfigError::Invalid(format!(
                "stream.render_size must be between 1 and {}, got {}",
                MAX_RENDER_SIZE, self.stream.render_size
            )));
        }
        if self.window.max_surface == 0 {
            return Err(ConfigError::Invalid(
                "window.max_surface must be at least 1".to_string(),
            ));
        }
        if self.engine.ram_limit_mb == 0 {
            return Err(ConfigError::Invalid(
                "engine.ram_limit_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/framestream`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.framestream", "", "framestream")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Load `config.toml` from the platform config directory.
///
/// Falls back to defaults when the file is missing, unreadable, unparseable
/// or out of range.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config: {}", e);
            Config::default()
        }
    }
}

/// Load and validate a config file at an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
