//! Statistics over completed Pomodoro intervals.
//!
//! Aggregates are computed from a slice of `SessionRecord`s so the same code
//! serves the in-memory `SessionLog` and rows loaded from SQLite.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;
use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionStats {
    pub total_sessions: u64,
    pub work_sessions: u64,
    pub short_breaks: u64,
    pub long_breaks: u64,
    pub total_work_minutes: u64,
    pub total_break_minutes: u64,
    /// Focus time in hours, rounded to one decimal.
    pub total_work_hours: f64,
    /// Work sessions per UTC day with any completed interval, one decimal.
    pub average_sessions_per_day: f64,
    /// Longest run of consecutive UTC calendar days with at least one
    /// completed work interval.
    pub longest_streak_days: u64,
}

impl SessionStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut ordered: Vec<&SessionRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.completed_at);

        let mut stats = SessionStats::default();
        let mut work_days: Vec<NaiveDate> = Vec::new();
        let mut active_days = 0u64;
        let mut last_active: Option<NaiveDate> = None;
        for record in ordered {
            stats.total_sessions += 1;
            let day = record.completed_at.date_naive();
            if last_active != Some(day) {
                active_days += 1;
                last_active = Some(day);
            }
            let minutes = u64::from(record.duration_minutes);
            match record.mode {
                TimerMode::Work => {
                    stats.work_sessions += 1;
                    stats.total_work_minutes += minutes;
                    if work_days.last() != Some(&day) {
                        work_days.push(day);
                    }
                }
                TimerMode::ShortBreak => {
                    stats.short_breaks += 1;
                    stats.total_break_minutes += minutes;
                }
                TimerMode::LongBreak => {
                    stats.long_breaks += 1;
                    stats.total_break_minutes += minutes;
                }
            }
        }
        stats.longest_streak_days = longest_day_run(&work_days);
        stats.total_work_hours = round_tenths(stats.total_work_minutes as f64 / 60.0);
        if active_days > 0 {
            let per_day = stats.work_sessions as f64 / active_days as f64;
            stats.average_sessions_per_day = round_tenths(per_day);
        }
        stats
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `days` must be sorted ascending and deduplicated.
fn longest_day_run(days: &[NaiveDate]) -> u64 {
    let mut longest = 0u64;
    let mut run = 0u64;
    let mut prev: Option<NaiveDate> = None;
    for &day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

/// The `limit` most recent records, newest first. Records sharing a
/// timestamp keep reverse insertion order.
pub fn recent(records: &[SessionRecord], limit: usize) -> Vec<SessionRecord> {
    let mut sorted: Vec<SessionRecord> = records.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    sorted.truncate(limit);
    sorted
}
