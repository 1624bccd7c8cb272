//! File-change labels inside the comment section.
//!
//! `git status`-style comment lines (`#\tmodified:   src/lib.rs`) carry a
//! label that the annotation pass maps to a semantic class. Parsing returns
//! the label and the length of the prefix up to the path so callers can
//! colour the two parts separately.

use crate::{Dialect, LabelSyntax};
use regex::Regex;
use std::sync::LazyLock;

/// Semantic class of a file-change comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
}

/// A recognised file-change label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChangeLabel<'a> {
    pub label: &'a str,
    /// Byte length of everything before the path.
    pub prefix_len: usize,
}

static GIT_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\t([a-z ]+):\s+").expect("valid git status pattern"));
static HG_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HG: ([a-z]+) ").expect("valid hg status pattern"));
static JJ_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^JJ:\s+([A-Z]) ").expect("valid jj status pattern"));

fn pattern(syntax: LabelSyntax) -> Option<&'static Regex> {
    match syntax {
        LabelSyntax::None => None,
        LabelSyntax::GitStatus => Some(&GIT_STATUS),
        LabelSyntax::HgStatus => Some(&HG_STATUS),
        LabelSyntax::JjStatus => Some(&JJ_STATUS),
    }
}

/// Extract the label of a file-change comment line, if it has the dialect's shape.
pub fn parse_file_change(dialect: Dialect, line: &str) -> Option<FileChangeLabel<'_>> {
    let caps = pattern(dialect.rules().label_syntax)?.captures(line)?;
    let label = caps.get(1)?.as_str();
    let prefix_len = caps.get(0)?.end();
    Some(FileChangeLabel { label, prefix_len })
}

impl Dialect {
    /// Map a parsed label through this dialect's table.
    pub fn change_kind(self, label: &str) -> Option<ChangeKind> {
        self.rules()
            .labels
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, kind)| *kind)
    }

    /// Parse and classify in one step. Unmapped labels yield `None`.
    pub fn classify_file_change(self, line: &str) -> Option<(ChangeKind, FileChangeLabel<'_>)> {
        let parsed = parse_file_change(self, line)?;
        let kind = self.change_kind(parsed.label)?;
        Some((kind, parsed))
    }
}
