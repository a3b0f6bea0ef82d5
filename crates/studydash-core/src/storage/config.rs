//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Pomodoro durations, long-break cadence and auto-start rules
//! - Notification preferences
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::TimerConfiguration;

/// Completion notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 0..=100; 0 keeps the notice but mutes the bell.
    #[serde(default = "default_50")]
    pub volume: u32,
}

impl NotificationsConfig {
    pub const MAX_VOLUME: u32 = 100;

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.volume > Self::MAX_VOLUME {
            return Err(ConfigError::invalid("volume", "must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfiguration,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
        }
    }
}

impl Config {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.timer.validate()?;
        self.notifications.validate()
    }

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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let parse_failed = |message: String| ConfigError::ParseFailed {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
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
                        value.parse::<bool>().map_err(|e| parse_failed(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| parse_failed("expected a non-negative integer".into()))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| parse_failed(e.to_string()))?
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

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds an invalid timer configuration, or if the default config cannot
    /// be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    /// Apply a dot-separated key in memory without saving.
    ///
    /// The whole configuration is rebuilt and validated before `self` is
    /// replaced, so a rejected value leaves `self` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::apply`] rejects the value or the config
    /// cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("timer.auto_start_breaks").as_deref(), Some("false"));
        assert_eq!(cfg.get("notifications.volume").as_deref(), Some("50"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("timer.work_minutes", "50").unwrap();
        assert_eq!(cfg.timer.work_minutes, 50);
    }

    #[test]
    fn apply_updates_nested_bool() {
        let mut cfg = Config::default();
        cfg.apply("timer.auto_start_work", "true").unwrap();
        assert!(cfg.timer.auto_start_work);
    }

    #[test]
    fn apply_caps_notification_volume() {
        let mut cfg = Config::default();
        cfg.apply("notifications.volume", "100").unwrap();
        assert_eq!(cfg.notifications.volume, 100);

        let err = cfg.apply("notifications.volume", "101").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidConfiguration { ref key, .. }) if key == "volume"
        ));
        assert_eq!(cfg.notifications.volume, 100);
    }

    #[test]
    fn apply_toggles_notifications() {
        let mut cfg = Config::default();
        cfg.apply("notifications.enabled", "false").unwrap();
        assert!(!cfg.notifications.enabled);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("timer.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_unparseable_value() {
        let mut cfg = Config::default();
        assert!(cfg.apply("timer.auto_start_breaks", "not_a_bool").is_err());
        assert!(cfg.apply("timer.work_minutes", "-5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_rejects_invalid_timer_and_keeps_previous() {
        let mut cfg = Config::default();
        let err = cfg.apply("timer.sessions_before_long_break", "0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidConfiguration { .. })
        ));
        assert_eq!(cfg.timer.sessions_before_long_break, 4);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nwork_minutes = 45\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.work_minutes, 45);
        assert_eq!(cfg.timer.long_break_minutes, 15);
        assert!(cfg.notifications.enabled);
    }

    #[test]
    fn load_from_rejects_invalid_timer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nshort_break_minutes = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidConfiguration { .. }))
        ));
    }

    #[test]
    fn load_from_rejects_loud_volume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notifications]\nvolume = 250\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidConfiguration { .. }))
        ));
    }

    #[test]
    fn save_to_then_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("timer.long_break_minutes", "20").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.long_break_minutes, 20);
    }
}
