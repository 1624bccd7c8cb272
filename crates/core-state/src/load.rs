//! Commit file IO.
//!
//! Reads are strict (the whole file must be UTF-8); writes go through a
//! sibling temp file that is persisted over the original, so the invoking
//! tool never sees a half-written message.

use crate::SessionError;
use core_breadcrumbs::write_atomic;
use std::path::Path;
use tracing::{debug, error};

/// Read the commit file and apply the load policy.
pub fn read_commit_file(path: &Path) -> Result<String, SessionError> {
    let bytes = std::fs::read(path).map_err(|source| {
        error!(target: "io", path = %path.display(), error = %source, "commit_file_read_failed");
        SessionError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let content = String::from_utf8(bytes).map_err(|source| SessionError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "io", path = %path.display(), len = content.len(), "commit_file_read");
    Ok(ensure_line_break(content))
}

/// Content without any line break gets a trailing `\n` so the buffer always
/// has at least two lines.
pub fn ensure_line_break(mut content: String) -> String {
    if !content.contains(['\n', '\r']) {
        content.push('\n');
    }
    content
}

pub fn write_commit_file(path: &Path, content: &str) -> Result<(), SessionError> {
    write_atomic(path, content.as_bytes()).map_err(|source| {
        error!(target: "io", path = %path.display(), error = %source, "commit_file_write_failed");
        SessionError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(target: "io", path = %path.display(), len = content.len(), "commit_file_written");
    Ok(())
}
