//! Dialect and message-kind detection from the commit file path and content.

use crate::Dialect;
use std::path::Path;
use tracing::debug;

/// Inputs to [`detect`]. Settings-derived flags are passed in so this stays
/// independent of the configuration crate.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub path: &'a Path,
    pub content: &'a str,
    /// Dialect forced by the environment, bypassing path heuristics.
    pub forced: Option<Dialect>,
    pub assume_version_controlled: bool,
    pub detect_squash: bool,
    pub hg_uses_git_comment_style: bool,
}

/// Result of detection, fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Dialect of the invoking tool.
    pub branch_dialect: Dialect,
    /// Dialect used for comment classification.
    pub comment_dialect: Dialect,
    pub version_controlled: bool,
    pub squash: bool,
    /// Repository directory name when the file sits directly in `.git/`.
    pub repository_name: Option<String>,
}

fn path_heuristic(path: &Path) -> Option<(Dialect, Option<String>)> {
    let parent = path.parent();
    if parent.and_then(Path::file_name).is_some_and(|name| name == ".git") {
        let repo = parent
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned());
        return Some((Dialect::Git, repo));
    }
    let file_name = path.file_name()?.to_string_lossy();
    if file_name.starts_with("hg-") {
        Some((Dialect::Hg, None))
    } else if file_name.starts_with("svn-") {
        Some((Dialect::Svn, None))
    } else if path.extension().is_some_and(|ext| ext == "jjdescription") {
        Some((Dialect::Jj, None))
    } else {
        None
    }
}

/// Squash/rebase heuristic covering git rebase and hg histedit templates.
pub fn is_squash_message(path: &Path, content: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains("rebase"))
        || content.contains("= use commit")
}

pub fn detect(input: DetectionInput<'_>) -> Detection {
    let heuristic = path_heuristic(input.path);
    let matched = heuristic.is_some();
    let (detected, repository_name) = heuristic.unwrap_or((Dialect::Git, None));
    let branch_dialect = input.forced.unwrap_or(detected);
    let version_controlled =
        matched || input.forced.is_some() || input.assume_version_controlled;
    let squash = input.detect_squash && is_squash_message(input.path, input.content);
    let comment_dialect =
        if squash && branch_dialect == Dialect::Hg && input.hg_uses_git_comment_style {
            Dialect::Git
        } else {
            branch_dialect
        };

    debug!(
        target: "session",
        branch = %branch_dialect,
        comment = %comment_dialect,
        version_controlled,
        squash,
        "dialect_detected"
    );

    Detection {
        branch_dialect,
        comment_dialect,
        version_controlled,
        squash,
        repository_name,
    }
}

/// Project name used to key the incomplete-session store: the last
/// component of the working directory.
pub fn project_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_string())
}
