//! # studydash Core Library
//!
//! Core business logic for the studydash Pomodoro timer. Every operation is
//! available through the standalone `studydash` CLI; any other front end is a
//! thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven work/break state machine; the caller
//!   delivers one `tick()` per elapsed second while it runs
//! - **Sessions**: completed intervals are emitted as events and handed to
//!   observers, the engine keeps no history
//! - **Driver**: a tokio task that supplies the periodic tick and serialises
//!   user commands with it
//! - **Storage**: SQLite-based session storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: Core timer state machine
//! - [`TimerConfiguration`]: Durations, cadence and auto-start rules
//! - [`SessionObserver`]: Trait for anything that records completed intervals
//! - [`Database`]: Session and statistics persistence
//! - [`Config`]: Application configuration management

pub mod driver;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use driver::{Ticker, TimerCommand};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use session::{dispatch, SessionLog, SessionObserver, SessionRecord};
pub use stats::SessionStats;
pub use storage::{Config, Database};
pub use timer::{PomodoroEngine, TimerConfiguration, TimerMode, TimerState};
