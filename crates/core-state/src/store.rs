//! Incomplete-session store.
//!
//! When a new (initially empty) message is cancelled, its text is parked in
//! `<data_dir>/oxcommit/<project>` so the next session for the same project
//! can pick it up. The file is consumed on every load attempt, whether or not
//! it was fresh enough to use.

use crate::SessionError;
use core_breadcrumbs::write_atomic;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteSessionStore {
    path: PathBuf,
}

impl IncompleteSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `project` under the platform data directory.
    pub fn for_project(project: &str) -> Option<Self> {
        dirs::data_dir().map(|dir| Self::in_dir(dir.join("oxcommit"), project))
    }

    pub fn in_dir(dir: impl AsRef<Path>, project: &str) -> Self {
        Self::new(dir.as_ref().join(project))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and remove the saved message. Returns `None` when absent, older
    /// than `max_age` (relative to `now`), dated in the future, or unreadable.
    pub fn take(&self, max_age: Duration, now: SystemTime) -> Option<String> {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                self.log_failure("store_stat_failed", &err);
                self.remove();
                return None;
            }
        };
        let fresh = now
            .duration_since(modified)
            .is_ok_and(|age| age <= max_age);
        let saved = if fresh {
            match std::fs::read_to_string(&self.path) {
                Ok(text) => Some(text),
                Err(err) => {
                    self.log_failure("store_read_failed", &err);
                    None
                }
            }
        } else {
            debug!(target: "session", path = %self.path.display(), "store_expired");
            None
        };
        self.remove();
        saved
    }

    /// Drop any saved message without reading it.
    pub fn discard(&self) {
        self.remove();
    }

    pub fn save(&self, text: &str) -> Result<(), SessionError> {
        let store_err = |source| SessionError::Store {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(store_err)?;
        }
        write_atomic(&self.path, text.as_bytes()).map_err(store_err)?;
        debug!(target: "session", path = %self.path.display(), len = text.len(), "store_saved");
        Ok(())
    }

    fn remove(&self) {
        if let Err(err) = std::fs::remove_file(&self.path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            self.log_failure("store_remove_failed", &err);
        }
    }

    fn log_failure(&self, event: &'static str, err: &std::io::Error) {
        warn!(target: "session", path = %self.path.display(), error = %err, "{event}");
    }
}
