//! Session audit record ("breadcrumbs").
//!
//! A flat JSON document describing what the last annotation pass found and
//! how the session ended. It is rebuilt from every [`Annotations`] value and
//! written exactly once, at exit, when a sink is configured. External test
//! harnesses read it back to assert highlight offsets without screen
//! scraping.

use core_classify::{Annotations, TextRange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum BreadcrumbsError {
    #[error("failed to write breadcrumbs to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read breadcrumbs from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed breadcrumbs")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Breadcrumbs {
    pub text_overflow_ranges: Vec<TextRange>,
    pub comment_line_ranges: Vec<TextRange>,
    pub diff_header_line_ranges: Vec<TextRange>,
    pub diff_add_line_ranges: Vec<TextRange>,
    pub diff_remove_line_ranges: Vec<TextRange>,
    pub exit_status: i32,
    pub spell_checking: bool,
}

impl Breadcrumbs {
    /// Replace every range list with the lists of `annotations`.
    pub fn record(&mut self, annotations: &Annotations) {
        self.text_overflow_ranges = annotations.text_overflow_ranges.clone();
        self.comment_line_ranges = annotations.comment_line_ranges.clone();
        self.diff_header_line_ranges = annotations.diff_header_line_ranges.clone();
        self.diff_add_line_ranges = annotations.diff_add_line_ranges.clone();
        self.diff_remove_line_ranges = annotations.diff_remove_line_ranges.clone();
    }

    pub fn to_json(&self) -> Result<String, BreadcrumbsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn read_from(path: &Path) -> Result<Self, BreadcrumbsError> {
        let raw = fs::read_to_string(path).map_err(|source| BreadcrumbsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Where breadcrumbs go at exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbsSink {
    pub path: PathBuf,
    /// Write to a sibling temp file and rename over `path`.
    pub atomic: bool,
}

impl BreadcrumbsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: false,
        }
    }

    pub fn write(&self, breadcrumbs: &Breadcrumbs) -> Result<(), BreadcrumbsError> {
        let json = breadcrumbs.to_json()?;
        let result = if self.atomic {
            write_atomic(&self.path, json.as_bytes())
        } else {
            fs::write(&self.path, json.as_bytes())
        };
        result.map_err(|source| BreadcrumbsError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            target: "breadcrumbs",
            path = %self.path.display(),
            atomic = self.atomic,
            exit_status = breadcrumbs.exit_status,
            "breadcrumbs_written"
        );
        Ok(())
    }

    /// Write and log failures. Breadcrumbs never decide the exit status.
    pub fn write_or_log(&self, breadcrumbs: &Breadcrumbs) {
        if let Err(err) = self.write(breadcrumbs) {
            error!(
                target: "breadcrumbs",
                path = %self.path.display(),
                error = %err,
                "breadcrumbs_write_failed"
            );
        }
    }
}

/// Write `bytes` to a temp file next to `path` and persist it over `path`.
/// Readers see either the old content or the new, never a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
