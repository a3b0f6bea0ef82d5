//! Pomodoro engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or read the clock to count down - the caller delivers one `tick()`
//! per elapsed second while the timer is running.
//!
//! ## Transitions
//!
//! ```text
//! Work --(complete)--> ShortBreak | LongBreak (every Nth work session)
//! ShortBreak | LongBreak --(complete)--> Work
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(TimerConfiguration::default())?;
//! engine.start();
//! // Once per second while engine.is_running():
//! if let Some(event) = engine.tick() { /* IntervalCompleted */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::TimerConfiguration;
use super::mode::TimerMode;
use crate::error::ConfigError;
use crate::events::Event;
use crate::session::SessionRecord;

/// Mutable timer state, owned by exactly one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub completed_work_sessions: u32,
}

/// Core Pomodoro engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroEngine {
    config: TimerConfiguration,
    state: TimerState,
}

impl PomodoroEngine {
    /// Create an engine in `Work` mode, paused, with a full work interval.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` if any duration is zero or
    /// the long-break cadence is below one.
    pub fn new(config: TimerConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: TimerState {
                mode: TimerMode::Work,
                remaining_seconds: config.duration_secs(TimerMode::Work),
                is_running: false,
                completed_work_sessions: 0,
            },
            config,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.state.completed_work_sessions
    }

    /// Full length of the current mode in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.config.duration_secs(self.state.mode)
    }

    /// 0.0 .. 100.0 progress within the current interval.
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 || self.state.remaining_seconds >= total {
            return 0.0;
        }
        let elapsed = total - self.state.remaining_seconds;
        (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn remaining_display(&self) -> String {
        format_mm_ss(self.state.remaining_seconds)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            label: self.state.mode.label().to_string(),
            remaining_seconds: self.state.remaining_seconds,
            remaining_display: self.remaining_display(),
            total_seconds: self.total_seconds(),
            is_running: self.state.is_running,
            completed_work_sessions: self.state.completed_work_sessions,
            progress_pct: self.progress_percent(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `None` if already running or if the countdown sits at zero.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.state.is_running = true;
        tracing::debug!(mode = %self.state.mode, remaining = self.state.remaining_seconds, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let was_running = self.state.is_running;
        self.state.is_running = false;
        if !was_running {
            return None;
        }
        tracing::debug!(mode = %self.state.mode, remaining = self.state.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Rewind the current interval. The completed-session counter is kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.state.is_running = false;
        self.state.remaining_seconds = self.total_seconds();
        tracing::debug!(mode = %self.state.mode, "timer reset");
        Some(Event::TimerReset {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Manual override. Neither the completed-session counter nor the
    /// long-break cadence is affected.
    pub fn switch_mode(&mut self, target: TimerMode) -> Option<Event> {
        let from = self.state.mode;
        self.state.mode = target;
        self.state.remaining_seconds = self.config.duration_secs(target);
        self.state.is_running = false;
        tracing::debug!(%from, to = %target, "mode switched");
        Some(Event::ModeSwitched {
            from,
            to: target,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Call once per elapsed second. Returns `Some(Event::IntervalCompleted)`
    /// on the tick that brings the countdown to zero.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// `tick()` with an explicit completion timestamp.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.state.remaining_seconds -= 1;
        if self.state.remaining_seconds == 0 {
            return Some(self.on_interval_complete(now));
        }
        None
    }

    /// Replace the configuration wholesale.
    ///
    /// The current interval is paused and rewound to the new duration; the
    /// completed-session counter is kept.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` and leaves the engine
    /// untouched if `config` is invalid.
    pub fn update_config(&mut self, config: TimerConfiguration) -> Result<Option<Event>, ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.is_running = false;
        self.state.remaining_seconds = self.total_seconds();
        tracing::debug!(?config, "timer configuration replaced");
        Ok(Some(Event::ConfigUpdated {
            config,
            at: Utc::now(),
        }))
    }

    /// Start a new day: clears the completed work-session counter.
    pub fn reset_sessions(&mut self) -> Option<Event> {
        self.state.completed_work_sessions = 0;
        Some(Event::SessionsReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_interval_complete(&mut self, now: DateTime<Utc>) -> Event {
        self.state.is_running = false;
        let finished = self.state.mode;
        let record = SessionRecord {
            mode: finished,
            duration_minutes: self.config.duration_minutes(finished),
            completed_at: now,
        };

        let next = match finished {
            TimerMode::Work => {
                self.state.completed_work_sessions = self.state.completed_work_sessions.saturating_add(1);
                if self.state.completed_work_sessions % self.config.sessions_before_long_break == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        };

        self.state.mode = next;
        self.state.remaining_seconds = self.config.duration_secs(next);
        let auto_started = self.config.auto_starts(next);
        self.state.is_running = auto_started;

        tracing::info!(
            finished = %finished,
            next = %next,
            completed_work_sessions = self.state.completed_work_sessions,
            auto_started,
            "interval completed"
        );

        Event::IntervalCompleted {
            record,
            next_mode: next,
            completed_work_sessions: self.state.completed_work_sessions,
            auto_started,
        }
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
