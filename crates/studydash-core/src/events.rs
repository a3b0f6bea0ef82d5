use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::SessionRecord;
use crate::timer::{TimerConfiguration, TimerMode};

/// Every state change in the engine produces an Event.
/// The presentation layer renders them; observers persist completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero. `record` is the finished interval;
    /// `next_mode` is what the engine switched to.
    IntervalCompleted {
        record: SessionRecord,
        next_mode: TimerMode,
        completed_work_sessions: u32,
        auto_started: bool,
    },
    ConfigUpdated {
        config: TimerConfiguration,
        at: DateTime<Utc>,
    },
    /// A configuration update was refused; the engine kept its previous one.
    ConfigRejected {
        key: String,
        message: String,
        at: DateTime<Utc>,
    },
    /// Work-session counter cleared by the "new day" action.
    SessionsReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        label: String,
        remaining_seconds: u64,
        /// `MM:SS`
        remaining_display: String,
        total_seconds: u64,
        is_running: bool,
        completed_work_sessions: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn config_rejected(error: &ConfigError) -> Self {
        let (key, message) = match error {
            ConfigError::InvalidConfiguration { key, message } => (key.clone(), message.clone()),
            other => ("timer".to_string(), other.to_string()),
        };
        Event::ConfigRejected {
            key,
            message,
            at: Utc::now(),
        }
    }

    /// The finished interval, if this event reports one.
    pub fn completed_record(&self) -> Option<&SessionRecord> {
        match self {
            Event::IntervalCompleted { record, .. } => Some(record),
            _ => None,
        }
    }
}
