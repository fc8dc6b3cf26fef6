//! TOML-based application configuration.
//!
//! Stores:
//! - The default scheduling policy (buffer, bedtime, timezone)
//! - Request throttling limits for the reasoning-service endpoints
//!
//! Configuration is stored at `~/.config/timebox/config.toml`.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::policy::{default_buffer_minutes, default_sleep_start, default_timezone, UserPolicy};

/// Default scheduling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
    #[serde(default = "default_sleep_start")]
    pub sleep_start: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Longest accepted throttle window (one day)
pub const MAX_THROTTLE_WINDOW_SECONDS: u64 = 86_400;

/// Per-user request budget for proposal generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timebox/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

fn default_limit() -> u32 {
    10
}
fn default_window_seconds() -> u64 {
    60
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            sleep_start: default_sleep_start(),
            timezone: default_timezone(),
        }
    }
}

impl ThrottleConfig {
    /// Window length as a duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is zero or longer than
    /// [`MAX_THROTTLE_WINDOW_SECONDS`].
    pub fn window(&self) -> Result<TimeDelta, ConfigError> {
        let out_of_range = || ConfigError::InvalidValue {
            key: "throttle.window_seconds".into(),
            message: format!(
                "{} is outside 1..={MAX_THROTTLE_WINDOW_SECONDS}",
                self.window_seconds
            ),
        };
        if !(1..=MAX_THROTTLE_WINDOW_SECONDS).contains(&self.window_seconds) {
            return Err(out_of_range());
        }
        let seconds = i64::try_from(self.window_seconds).map_err(|_| out_of_range())?;
        TimeDelta::try_seconds(seconds).ok_or_else(out_of_range)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_seconds: default_window_seconds(),
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let unparsable = |what: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as {what}"),
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|_| unparsable("bool"))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value.parse::<u64>().map_err(|_| unparsable("number"))?.into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|_| unparsable("json"))?
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

    /// Default config location inside [`data_dir`].
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
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
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Reject values the scheduling core cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.user_policy()
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "policy".into(),
                message: e.to_string(),
            })?;
        if self.throttle.limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "throttle.limit".into(),
                message: "must be positive".into(),
            });
        }
        self.throttle.window()?;
        Ok(())
    }

    /// Policy section as a [`UserPolicy`].
    pub fn user_policy(&self) -> UserPolicy {
        UserPolicy {
            buffer_minutes: self.policy.buffer_minutes,
            sleep_start: self.policy.sleep_start.clone(),
            timezone: self.policy.timezone.clone(),
        }
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }
}
