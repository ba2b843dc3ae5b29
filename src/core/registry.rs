//! Mode configuration records and the registry that owns them.
//!
//! Each [`SystemMode`] maps to exactly one immutable [`ModeConfig`]. The
//! registry has one field per mode, so a registry missing a mode cannot be
//! constructed, whether in code or when deserialized from JSON.

use super::mode::SystemMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading a registry from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid mode configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Settings for one reconfigurable subsystem within a mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemConfig {
    /// Whether the subsystem's worker should be running in this mode
    #[serde(default)]
    pub enabled: bool,
    /// Operating parameter handed to the worker, e.g. a resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl SubsystemConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled(parameter: impl Into<String>) -> Self {
        Self {
            enabled: true,
            parameter: Some(parameter.into()),
        }
    }
}

/// Configuration payload of a single mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Subsystem settings keyed by subsystem name
    #[serde(default)]
    pub subsystems: BTreeMap<String, SubsystemConfig>,
    /// Free-form settings for subscriber kinds this crate does not know about
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ModeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a subsystem entry.
    pub fn with_subsystem(mut self, name: impl Into<String>, config: SubsystemConfig) -> Self {
        self.subsystems.insert(name.into(), config);
        self
    }

    /// Add or replace a free-form setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn subsystem(&self, name: &str) -> Option<&SubsystemConfig> {
        self.subsystems.get(name)
    }

    /// A subsystem absent from the record counts as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.subsystem(name).is_some_and(|s| s.enabled)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.subsystem(name).and_then(|s| s.parameter.as_deref())
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Immutable mapping from every [`SystemMode`] to its configuration.
///
/// # Example
///
/// ```rust
/// use modeshift::core::{ModeRegistry, SystemMode};
///
/// let registry = ModeRegistry::standard();
/// let auto = registry.config_of(SystemMode::Auto);
///
/// assert!(auto.is_enabled("camera"));
/// assert_eq!(auto.parameter("camera"), Some("480p"));
/// assert!(!registry.config_of(SystemMode::Default).is_enabled("camera"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeRegistry {
    default: ModeConfig,
    auto: ModeConfig,
    new_mode: ModeConfig,
}

impl ModeRegistry {
    pub const CAMERA: &'static str = "camera";

    /// Build a registry from one configuration per mode.
    pub fn new(default: ModeConfig, auto: ModeConfig, new_mode: ModeConfig) -> Self {
        Self {
            default,
            auto,
            new_mode,
        }
    }

    /// The stock device profile: camera off by default, 480p in auto,
    /// 720p in the new mode.
    pub fn standard() -> Self {
        Self::new(
            ModeConfig::new().with_subsystem(Self::CAMERA, SubsystemConfig::disabled()),
            ModeConfig::new().with_subsystem(Self::CAMERA, SubsystemConfig::enabled("480p")),
            ModeConfig::new().with_subsystem(Self::CAMERA, SubsystemConfig::enabled("720p")),
        )
    }

    /// Load a registry from JSON keyed by snake_case mode names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modeshift::core::{ModeRegistry, SystemMode};
    ///
    /// let registry = ModeRegistry::from_json_str(r#"{
    ///     "default":  { "subsystems": { "camera": { "enabled": false } } },
    ///     "auto":     { "subsystems": { "camera": { "enabled": true, "parameter": "480p" } } },
    ///     "new_mode": { "subsystems": { "camera": { "enabled": true, "parameter": "1080p" } } }
    /// }"#).unwrap();
    ///
    /// assert_eq!(registry.config_of(SystemMode::NewMode).parameter("camera"), Some("1080p"));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Look up the configuration of a mode (pure, total).
    pub fn config_of(&self, mode: SystemMode) -> &ModeConfig {
        match mode {
            SystemMode::Default => &self.default,
            SystemMode::Auto => &self.auto,
            SystemMode::NewMode => &self.new_mode,
        }
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
