//! Reading-session timing.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Tracks when the current document (or the "nothing open" state) was first
/// observed.
///
/// The start time is reset exactly when the observed file changes from one
/// observation to the next, including transitions into and out of "nothing
/// open". The first observation always starts a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingSession {
    started_at: Option<DateTime<Utc>>,
    last_open_file: Option<PathBuf>,
}

impl ReadingSession {
    /// Records the file open at `now` (`None` when nothing is open) and
    /// returns the start of the session it belongs to.
    pub fn observe(&mut self, open_file: Option<&Path>, now: DateTime<Utc>) -> DateTime<Utc> {
        let changed = self.last_open_file.as_deref() != open_file;
        let started_at = match self.started_at {
            Some(started_at) if !changed => started_at,
            _ => now,
        };
        self.started_at = Some(started_at);
        if changed {
            self.last_open_file = open_file.map(Path::to_path_buf);
        }
        started_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn last_open_file(&self) -> Option<&Path> {
        self.last_open_file.as_deref()
    }
}
