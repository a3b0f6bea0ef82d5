use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Display label for the mode badge.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TimerMode::Work => "Time to focus and be productive!",
            TimerMode::ShortBreak => "Take a quick break and relax",
            TimerMode::LongBreak => "Time for a longer rest",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "short_break" | "short-break" | "shortbreak" => Ok(TimerMode::ShortBreak),
            "long_break" | "long-break" | "longbreak" => Ok(TimerMode::LongBreak),
            other => Err(format!(
                "unknown timer mode '{other}' (expected work, short-break or long-break)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_cli_spellings() {
        assert_eq!("Work".parse::<TimerMode>().unwrap(), TimerMode::Work);
        assert_eq!("short-break".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert_eq!("LONG_BREAK".parse::<TimerMode>().unwrap(), TimerMode::LongBreak);
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for mode in TimerMode::ALL {
            assert_eq!(mode.as_str().parse::<TimerMode>().unwrap(), mode);
        }
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TimerMode::ShortBreak).unwrap(),
            "\"short_break\""
        );
    }
}
