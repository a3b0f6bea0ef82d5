//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed Pomodoro intervals
//! - Session statistics (daily and all-time)
//! - Key-value store for application state (the persisted engine)

use chrono::{DateTime, Local, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::session::{SessionObserver, SessionRecord};
use crate::stats::SessionStats;
use crate::timer::TimerMode;

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/studydash.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("studydash.db"))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                mode         TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(mode);",
        )?;
        Ok(())
    }

    /// Record a completed interval.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, record: &SessionRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (mode, duration_min, completed_at) VALUES (?1, ?2, ?3)",
            params![
                record.mode.as_str(),
                record.duration_minutes,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All recorded intervals in completion order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        self.query_sessions(
            "SELECT mode, duration_min, completed_at FROM sessions ORDER BY completed_at ASC, id ASC",
            params![],
        )
    }

    /// Intervals completed at or after `since`, in completion order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn sessions_since(&self, since: DateTime<Utc>) -> Result<Vec<SessionRecord>> {
        self.query_sessions(
            "SELECT mode, duration_min, completed_at FROM sessions
             WHERE completed_at >= ?1 ORDER BY completed_at ASC, id ASC",
            params![since.to_rfc3339()],
        )
    }

    /// The `limit` most recent intervals, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_sessions(
            "SELECT mode, duration_min, completed_at FROM sessions
             ORDER BY completed_at DESC, id DESC LIMIT ?1",
            params![limit],
        )
    }

    /// Stats since local midnight.
    pub fn stats_today(&self) -> Result<SessionStats> {
        let midnight = start_of_day(&Local::now());
        Ok(SessionStats::from_records(&self.sessions_since(midnight)?))
    }

    pub fn stats_all(&self) -> Result<SessionStats> {
        Ok(SessionStats::from_records(&self.sessions()?))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn query_sessions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (mode, duration_minutes, completed_at) = row?;
            records.push(decode_session(&mode, duration_minutes, &completed_at)?);
        }
        Ok(records)
    }
}

fn decode_session(mode: &str, duration_minutes: u32, completed_at: &str) -> Result<SessionRecord> {
    let corrupt = |message: String| DatabaseError::CorruptRow {
        table: "sessions".into(),
        message,
    };
    let mode: TimerMode = mode.parse().map_err(corrupt)?;
    let completed_at = DateTime::parse_from_rfc3339(completed_at)
        .map_err(|e| corrupt(e.to_string()))?
        .with_timezone(&Utc);
    Ok(SessionRecord {
        mode,
        duration_minutes,
        completed_at,
    })
}

impl SessionObserver for Database {
    fn on_session(&mut self, record: &SessionRecord) -> std::result::Result<(), CoreError> {
        self.record_session(record)?;
        Ok(())
    }
}

/// Midnight of `now`'s calendar day in its own time zone, as UTC. Falls back
/// to `now` when midnight does not exist locally (DST gap).
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}
