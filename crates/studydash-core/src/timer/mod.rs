mod config;
mod engine;
mod mode;

pub use config::TimerConfiguration;
pub use engine::{format_mm_ss, PomodoroEngine, TimerState};
pub use mode::TimerMode;
