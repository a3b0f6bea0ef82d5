//! Async tick driver for the Pomodoro engine.
//!
//! `Ticker` owns the engine inside one task and multiplexes a periodic
//! `tokio::time::interval` with a command channel, so ticks and commands are
//! applied strictly one at a time. Ticks are only delivered while the engine
//! is running; pausing stops tick delivery. A configuration the engine
//! refuses comes back on the event channel as `Event::ConfigRejected`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::events::Event;
use crate::timer::{PomodoroEngine, TimerConfiguration, TimerMode};

/// Commands forwarded from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    SwitchMode(TimerMode),
    UpdateConfig(TimerConfiguration),
    ResetSessions,
    Shutdown,
}

pub struct Ticker {
    engine: PomodoroEngine,
    period: Duration,
    stop_when_idle: bool,
}

impl Ticker {
    /// `period` is the length of one tick, nominally one second.
    pub fn new(engine: PomodoroEngine, period: Duration) -> Self {
        Self {
            engine,
            period,
            stop_when_idle: false,
        }
    }

    /// Return from [`Ticker::run`] as soon as the engine stops running on
    /// its own (an interval completed without auto-start).
    pub fn stop_when_idle(mut self, stop: bool) -> Self {
        self.stop_when_idle = stop;
        self
    }

    pub fn engine(&self) -> &PomodoroEngine {
        &self.engine
    }

    /// Drive the engine until `Shutdown` arrives, either channel closes, or
    /// (with `stop_when_idle`) the engine goes idle. Returns the engine.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<TimerCommand>,
        events: mpsc::UnboundedSender<Event>,
    ) -> PomodoroEngine {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.reset();

        if self.stop_when_idle && !self.engine.is_running() {
            return self.engine;
        }

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    let cmd = match cmd {
                        None | Some(TimerCommand::Shutdown) => break,
                        Some(cmd) => cmd,
                    };
                    let was_running = self.engine.is_running();
                    let event = self.apply(cmd);
                    if !was_running && self.engine.is_running() {
                        // A full period must elapse before the first decrement.
                        interval.reset();
                    }
                    if let Some(event) = event {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    if self.stop_when_idle && !self.engine.is_running() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    if !self.engine.is_running() {
                        continue;
                    }
                    if let Some(event) = self.engine.tick() {
                        if events.send(event).is_err() {
                            break;
                        }
                        if self.stop_when_idle && !self.engine.is_running() {
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!(remaining = self.engine.remaining_seconds(), "ticker stopped");
        self.engine
    }

    fn apply(&mut self, cmd: TimerCommand) -> Option<Event> {
        match cmd {
            TimerCommand::Start => self.engine.start(),
            TimerCommand::Pause => self.engine.pause(),
            TimerCommand::Reset => self.engine.reset(),
            TimerCommand::SwitchMode(mode) => self.engine.switch_mode(mode),
            TimerCommand::ResetSessions => self.engine.reset_sessions(),
            TimerCommand::UpdateConfig(config) => match self.engine.update_config(config) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "rejected timer configuration");
                    Some(Event::config_rejected(&e))
                }
            },
            TimerCommand::Shutdown => None,
        }
    }
}
