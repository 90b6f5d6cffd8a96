//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Week bucketing (start day, UTC offset)
//! - Payment link template (note, deep-link scheme, web fallback)
//! - Feedback cues
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::alarm::LocalZone;
use crate::error::ConfigError;
use crate::ledger::WeekCalendar;
use crate::payment::PaymentLinks;

/// How charges are bucketed into weeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Fixed UTC offset in minutes; unset means the host's local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Feedback cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell when the alarm goes off.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub payment: PaymentLinks,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

fn default_week_start() -> String {
    "sunday".into()
}
fn default_true() -> bool {
    true
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            utc_offset_minutes: None,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl CalendarConfig {
    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        self.week_start
            .parse::<Weekday>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "calendar.week_start".into(),
                message: format!("'{}' is not a weekday", self.week_start),
            })
    }

    /// A configured offset pins every date to it; otherwise dates follow
    /// the host's time zone, daylight saving included.
    pub fn zone(&self) -> Result<LocalZone, ConfigError> {
        match self.utc_offset_minutes {
            None => Ok(LocalZone::Host),
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(LocalZone::Fixed)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "calendar.utc_offset_minutes".into(),
                    message: format!("{minutes} is outside -1439..=1439"),
                }),
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
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) if value == "null" => serde_json::Value::Null,
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
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

    /// Set a config value by key without saving. Rejects unknown keys and
    /// values that would leave the config unusable.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.week_start()?;
        self.calendar.zone()?;
        Ok(())
    }

    pub fn week_calendar(&self) -> Result<WeekCalendar, ConfigError> {
        Ok(WeekCalendar::new(
            self.calendar.week_start()?,
            self.calendar.zone()?,
        ))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
