//! Completion notice written to the terminal when an interval finishes.

use std::io::Write;

use studydash_core::storage::NotificationsConfig;
use studydash_core::{CoreError, SessionObserver, SessionRecord};

/// Writes one line per completed interval, prefixed with a terminal bell
/// unless the volume is 0. Silent when notifications are disabled.
pub struct Notifier<W: Write> {
    settings: NotificationsConfig,
    out: W,
}

impl<W: Write> Notifier<W> {
    pub fn new(settings: NotificationsConfig, out: W) -> Self {
        Self { settings, out }
    }
}

impl<W: Write> SessionObserver for Notifier<W> {
    fn on_session(&mut self, record: &SessionRecord) -> Result<(), CoreError> {
        if !self.settings.enabled {
            return Ok(());
        }
        let bell = if self.settings.volume > 0 { "\x07" } else { "" };
        writeln!(
            self.out,
            "{bell}{} complete ({} min)",
            record.mode.label(),
            record.duration_minutes
        )?;
        self.out.flush()?;
        Ok(())
    }
}
