//! TOML-based configuration for the relay.
//!
//! The file is looked up at the platform-appropriate location unless a path
//! is given explicitly:
//! - Windows:  `%APPDATA%\TouchMouse\config.toml`
//! - Linux:    `~/.config/touchmouse/config.toml` (or `$XDG_CONFIG_HOME`)
//! - macOS:    `~/Library/Application Support/TouchMouse/config.toml`
//!
//! ```toml
//! [relay]
//! remote_address = "192.168.25.9:2501"
//! log_level = "info"
//!
//! [gesture]
//! tap_threshold_ms = 1000
//! velocity_factor = 4
//! strict_phases = false
//!
//! [queue]
//! capacity = 256
//!
//! [input]
//! pixels_per_pt = 1.0
//! ```
//!
//! Every field has a `#[serde(default = ...)]` helper, so a partial file (or
//! no file at all) is valid.  The one exception is `remote_address`: it has
//! no sensible default and [`RelayConfig::validate`] rejects a config without
//! one.  Command-line flags are applied on top of the file by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touchmouse_core::GestureConfig;

use crate::application::event_queue::DEFAULT_QUEUE_CAPACITY;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Neither the file nor the command line named a listener.
    #[error("no remote address configured (set [relay] remote_address or pass --remote)")]
    MissingRemoteAddress,

    /// A field holds a value the relay cannot run with.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelayConfig {
    #[serde(default)]
    pub relay: RelaySection,
    #[serde(default)]
    pub gesture: GestureSection,
    #[serde(default)]
    pub queue: QueueSection,
    #[serde(default)]
    pub input: InputSection,
}

/// Where to send actions and how loudly to log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelaySection {
    /// Listener address as `host:port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Gesture classification tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureSection {
    /// A press shorter than this is a click.
    #[serde(default = "default_tap_threshold_ms")]
    pub tap_threshold_ms: u64,
    /// Multiplier applied to every drag delta.
    #[serde(default = "default_velocity_factor")]
    pub velocity_factor: i32,
    /// Ignore Move/End samples that arrive without a Begin.
    #[serde(default)]
    pub strict_phases: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueSection {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSection {
    /// Physical pixels per logical point on the touch surface.
    #[serde(default = "default_pixels_per_pt")]
    pub pixels_per_pt: f32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_tap_threshold_ms() -> u64 {
    1000
}
fn default_velocity_factor() -> i32 {
    touchmouse_core::domain::gesture::DEFAULT_VELOCITY_FACTOR
}
fn default_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
fn default_pixels_per_pt() -> f32 {
    1.0
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            remote_address: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for GestureSection {
    fn default() -> Self {
        Self {
            tap_threshold_ms: default_tap_threshold_ms(),
            velocity_factor: default_velocity_factor(),
            strict_phases: false,
        }
    }
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            pixels_per_pt: default_pixels_per_pt(),
        }
    }
}

impl RelayConfig {
    /// Checks that the relay can start with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRemoteAddress`] or
    /// [`ConfigError::InvalidValue`] for the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.remote_address()?;
        if self.queue.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue.capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.gesture.velocity_factor <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "gesture.velocity_factor",
                reason: format!("must be positive, got {}", self.gesture.velocity_factor),
            });
        }
        let ppp = self.input.pixels_per_pt;
        if !(ppp.is_finite() && ppp > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "input.pixels_per_pt",
                reason: format!("must be a positive number, got {ppp}"),
            });
        }
        Ok(())
    }

    /// The configured listener address, trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRemoteAddress`] if it is unset or blank.
    pub fn remote_address(&self) -> Result<&str, ConfigError> {
        self.relay
            .remote_address
            .as_deref()
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .ok_or(ConfigError::MissingRemoteAddress)
    }

    /// Classifier settings derived from the `[gesture]` section.
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            tap_threshold: Duration::from_millis(self.gesture.tap_threshold_ms),
            velocity_factor: self.gesture.velocity_factor,
            strict_phases: self.gesture.strict_phases,
        }
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the platform location, returning
/// `RelayConfig::default()` if the file does not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<RelayConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RelayConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Loads the config from an explicitly chosen file.
///
/// Unlike [`load_config`], a missing file is an error here.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchMouse"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchmouse"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchMouse")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
