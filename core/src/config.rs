//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for tuning values.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use retroview_anim::AnimParams;
use retroview_n64::BlinkParams;
use retroview_rail::RideParams;
use serde::{Deserialize, Serialize};

/// Errors from reading or writing a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Retroview configuration.
///
/// Every section is optional in the file; missing values take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub rail: RailConfig,
    #[serde(default)]
    pub blink: BlinkConfig,
    #[serde(default)]
    pub shader: ShaderConfigSection,
}

/// Bone animator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Multiplier for translation track values (default: 1.0)
    #[serde(default = "default_translation_scale")]
    pub translation_scale: f32,
    /// Bone animator frames per second (default: 30.0)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
}

/// Rail riding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailConfig {
    /// First parameter-space step of the arc-length search (default: 0.01)
    #[serde(default = "default_initial_step")]
    pub initial_step: f32,
    /// Accepted arc-length error (default: 0.1)
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    /// Smallest step before the search gives up (default: 1e-7)
    #[serde(default = "default_min_step")]
    pub min_step: f32,
    /// Arc length sampled ahead for heading (default: 5.0)
    #[serde(default = "default_heading_lookahead")]
    pub heading_lookahead: f32,
}

/// Eye blink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkConfig {
    /// Blink steps per second (default: 30.0)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Chance per frame to start a blink (default: 0.02)
    #[serde(default = "default_close_chance")]
    pub close_chance: f32,
    /// Number of eye frames (default: 4)
    #[serde(default = "default_max_eye")]
    pub max_eye: i32,
    /// Seed for the blink random stream (default: 0x5EED)
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Bilinear filter variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BilinearTaps {
    /// The RDP's three-sample filter
    #[default]
    Three,
}

/// Shader generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShaderConfigSection {
    #[serde(default)]
    pub bilinear_taps: BilinearTaps,
}

fn default_translation_scale() -> f32 {
    1.0
}
fn default_frame_rate() -> f32 {
    30.0
}
fn default_initial_step() -> f32 {
    0.01
}
fn default_tolerance() -> f32 {
    0.1
}
fn default_min_step() -> f32 {
    1e-7
}
fn default_heading_lookahead() -> f32 {
    5.0
}
fn default_close_chance() -> f32 {
    0.02
}
fn default_max_eye() -> i32 {
    4
}
fn default_seed() -> u64 {
    0x5EED
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            translation_scale: default_translation_scale(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            initial_step: default_initial_step(),
            tolerance: default_tolerance(),
            min_step: default_min_step(),
            heading_lookahead: default_heading_lookahead(),
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            close_chance: default_close_chance(),
            max_eye: default_max_eye(),
            seed: default_seed(),
        }
    }
}

impl AnimationConfig {
    pub fn params(&self) -> AnimParams {
        AnimParams {
            translation_scale: self.translation_scale,
            frame_rate: self.frame_rate,
        }
    }
}

impl RailConfig {
    pub fn params(&self) -> RideParams {
        RideParams {
            initial_step: self.initial_step,
            tolerance: self.tolerance,
            min_step: self.min_step,
            heading_lookahead: self.heading_lookahead,
        }
    }
}

impl BlinkConfig {
    pub fn params(&self) -> BlinkParams {
        BlinkParams {
            frame_rate: self.frame_rate,
            close_chance: self.close_chance,
            max_eye: self.max_eye,
            seed: self.seed,
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Retroview\config`
/// On macOS: `~/Library/Application Support/io.retroview.Retroview`
/// On Linux: `~/.config/retroview`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.retroview", "", "Retroview")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return Config::default();
    };
    match load_from_path(&path) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => {
            tracing::warn!("ignoring {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Parse a config file, surfacing any error
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

/// Parse config text, surfacing any error
pub fn load_from_str(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Saves the configuration to disk.
///
/// Writes `config.toml` to the platform's configuration directory.
/// Creates the directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = config_dir() {
        save_to_path(config, &dir.join("config.toml"))?;
    }
    Ok(())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
