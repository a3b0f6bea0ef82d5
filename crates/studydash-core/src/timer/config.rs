use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::error::ConfigError;

/// Durations and auto-start rules for one engine.
///
/// Replaced wholesale whenever settings are saved; there is no partial merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_work: bool,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

impl TimerConfiguration {
    /// Check the invariants: every duration is positive and the long-break
    /// cadence is at least one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        for (key, minutes) in durations {
            if minutes == 0 {
                return Err(ConfigError::invalid(key, "duration must be greater than 0"));
            }
        }
        if self.sessions_before_long_break < 1 {
            return Err(ConfigError::invalid(
                "sessions_before_long_break",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Configured length of `mode` in minutes.
    pub fn duration_minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.duration_minutes(mode)).saturating_mul(60)
    }

    /// Whether finishing into `next` should start ticking without a `start()`.
    pub fn auto_starts(&self, next: TimerMode) -> bool {
        if next.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let cfg = TimerConfiguration::default();
        assert_eq!(cfg.work_minutes, 25);
        assert_eq!(cfg.short_break_minutes, 5);
        assert_eq!(cfg.long_break_minutes, 15);
        assert_eq!(cfg.sessions_before_long_break, 4);
        assert!(!cfg.auto_start_breaks);
        assert!(!cfg.auto_start_work);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_durations_are_rejected() {
        for key in ["work_minutes", "short_break_minutes", "long_break_minutes"] {
            let mut cfg = TimerConfiguration::default();
            match key {
                "work_minutes" => cfg.work_minutes = 0,
                "short_break_minutes" => cfg.short_break_minutes = 0,
                _ => cfg.long_break_minutes = 0,
            }
            match cfg.validate() {
                Err(ConfigError::InvalidConfiguration { key: got, .. }) => assert_eq!(got, key),
                other => panic!("expected InvalidConfiguration for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let cfg = TimerConfiguration {
            sessions_before_long_break: 0,
            ..TimerConfiguration::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn duration_lookup_per_mode() {
        let cfg = TimerConfiguration::default();
        assert_eq!(cfg.duration_secs(TimerMode::Work), 1500);
        assert_eq!(cfg.duration_secs(TimerMode::ShortBreak), 300);
        assert_eq!(cfg.duration_secs(TimerMode::LongBreak), 900);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: TimerConfiguration = toml::from_str("work_minutes = 50\nauto_start_breaks = true").unwrap();
        assert_eq!(cfg.work_minutes, 50);
        assert_eq!(cfg.short_break_minutes, 5);
        assert!(cfg.auto_start_breaks);
        assert!(!cfg.auto_start_work);
    }
}
