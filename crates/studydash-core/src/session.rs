//! Completed-interval records and the observers that receive them.
//!
//! The engine never stores history. Each `Event::IntervalCompleted` carries a
//! `SessionRecord`; hosts forward it to whatever observers they keep (the
//! in-memory `SessionLog`, the SQLite `Database`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::events::Event;
use crate::stats::SessionStats;
use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub mode: TimerMode,
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

/// Receives every completed interval.
pub trait SessionObserver {
    /// # Errors
    ///
    /// Implementations backed by storage return the storage error.
    fn on_session(&mut self, record: &SessionRecord) -> Result<(), CoreError>;
}

/// Append-only, in-memory session history.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<SessionRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_records(&self.records)
    }

    /// The `limit` most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SessionRecord> {
        crate::stats::recent(&self.records, limit)
    }
}

impl SessionObserver for SessionLog {
    fn on_session(&mut self, record: &SessionRecord) -> Result<(), CoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Forward the record carried by `event` (if any) to every observer.
///
/// All observers are notified even if one fails; the first failure is returned.
///
/// # Errors
///
/// Returns the first observer error.
pub fn dispatch(event: &Event, observers: &mut [&mut dyn SessionObserver]) -> Result<(), CoreError> {
    let Some(record) = event.completed_record() else {
        return Ok(());
    };
    let mut first_err = None;
    for observer in observers.iter_mut() {
        if let Err(e) = observer.on_session(record) {
            tracing::warn!(error = %e, mode = %record.mode, "session observer failed");
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
