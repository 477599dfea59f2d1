//! TOML-based application configuration.
//!
//! Two sections:
//! - `[rules]` feeds the stat engine arithmetic (hygiene decay, weekly rest
//!   reward cap, low-sleep threshold)
//! - `[targets]` is read only by the dashboard summary
//!
//! Configuration is stored at `~/.config/questlog/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Knobs the stat engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Hygiene lost per calendar day without a shower, in percent.
    #[serde(default = "default_hygiene_decay")]
    pub hygiene_decay_per_day: f64,
    /// Rest days per ISO week that still earn WIS.
    #[serde(default = "default_wisdom_max_per_week")]
    pub wisdom_max_per_week: u32,
    /// Nights below this many hours count toward the low-sleep streak.
    #[serde(default = "default_min_sleep_hours")]
    pub min_sleep_hours: f64,
}

/// Presentation targets. The engine never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default = "default_maintenance_calories")]
    pub maintenance_calories: u32,
    #[serde(default = "default_protein_target")]
    pub protein_target: u32,
    #[serde(default = "default_water_target_oz")]
    pub water_target_oz: u32,
    #[serde(default = "default_workout_days_per_week")]
    pub workout_days_per_week: u32,
    #[serde(default = "default_rest_days_per_week")]
    pub rest_days_per_week: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/questlog/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
}

fn default_hygiene_decay() -> f64 {
    20.0
}
fn default_wisdom_max_per_week() -> u32 {
    3
}
fn default_min_sleep_hours() -> f64 {
    6.0
}
fn default_maintenance_calories() -> u32 {
    2000
}
fn default_protein_target() -> u32 {
    120
}
fn default_water_target_oz() -> u32 {
    64
}
fn default_workout_days_per_week() -> u32 {
    4
}
fn default_rest_days_per_week() -> u32 {
    3
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hygiene_decay_per_day: default_hygiene_decay(),
            wisdom_max_per_week: default_wisdom_max_per_week(),
            min_sleep_hours: default_min_sleep_hours(),
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            maintenance_calories: default_maintenance_calories(),
            protein_target: default_protein_target(),
            water_target_oz: default_water_target_oz(),
            workout_days_per_week: default_workout_days_per_week(),
            rest_days_per_week: default_rest_days_per_week(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(n) => {
                        if n.is_f64() {
                            value
                                .parse::<f64>()
                                .ok()
                                .and_then(serde_json::Number::from_f64)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            value
                                .parse::<u64>()
                                .map(|n| serde_json::Value::Number(n.into()))
                                .map_err(|_| {
                                    invalid(format!("cannot parse '{value}' as whole number"))
                                })?
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when it does not exist.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse as
    /// the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
