//! Version-control comment dialects.
//!
//! Each dialect is described by one constant [`DialectRules`] entry: the
//! comment marker, whether the first marker ends all scanning, the scissor
//! rule, whether scissored content is a diff, and the file-change label
//! table. Classification never switches on the dialect outside this table,
//! so adding a dialect touches one place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod detect;
pub mod file_change;

pub use detect::{Detection, DetectionInput, detect, is_squash_message, project_name};
pub use file_change::{ChangeKind, FileChangeLabel, parse_file_change};

/// The comment dialect of a commit message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Git,
    Hg,
    Svn,
    Jj,
}

/// Scissor line rule: a line below which everything belongs to the comment section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scissor {
    None,
    /// `prefix ... contains ... suffix`, e.g. git's `# ---- >8 ----`.
    CutMarker {
        prefix: &'static str,
        suffix: &'static str,
        contains: &'static str,
    },
    /// The whole line must equal this text.
    Exact(&'static str),
}

/// How file-change comment lines are laid out for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSyntax {
    /// No file-change lines are recognised.
    None,
    /// `#\t<label>:<spaces><path>`
    GitStatus,
    /// `HG: <label> <path>`
    HgStatus,
    /// `JJ:<spaces><L> <path>`
    JjStatus,
}

/// Per-dialect constant table.
#[derive(Debug, Clone, Copy)]
pub struct DialectRules {
    pub comment_prefix: &'static str,
    pub comment_suffix: &'static str,
    /// The first comment line starts a comment section running to the end of the buffer.
    pub single_comment_marker: bool,
    pub scissor: Scissor,
    /// Non-comment lines inside the comment section are diff content.
    pub scissored_diff: bool,
    pub label_syntax: LabelSyntax,
    pub labels: &'static [(&'static str, ChangeKind)],
}

const GIT: DialectRules = DialectRules {
    comment_prefix: "#",
    comment_suffix: "",
    single_comment_marker: false,
    scissor: Scissor::CutMarker {
        prefix: "# --",
        suffix: "--",
        contains: ">8",
    },
    scissored_diff: true,
    label_syntax: LabelSyntax::GitStatus,
    labels: &[
        ("modified", ChangeKind::Modified),
        ("renamed", ChangeKind::Modified),
        ("copied", ChangeKind::Modified),
        ("new file", ChangeKind::Added),
        ("deleted", ChangeKind::Deleted),
    ],
};

const HG: DialectRules = DialectRules {
    comment_prefix: "HG:",
    comment_suffix: "",
    single_comment_marker: false,
    scissor: Scissor::None,
    scissored_diff: false,
    label_syntax: LabelSyntax::HgStatus,
    labels: &[
        ("changed", ChangeKind::Modified),
        ("added", ChangeKind::Added),
        ("removed", ChangeKind::Deleted),
    ],
};

const SVN: DialectRules = DialectRules {
    comment_prefix: "--",
    comment_suffix: "--",
    single_comment_marker: true,
    scissor: Scissor::None,
    scissored_diff: false,
    label_syntax: LabelSyntax::None,
    labels: &[],
};

const JJ: DialectRules = DialectRules {
    comment_prefix: "JJ:",
    comment_suffix: "",
    single_comment_marker: false,
    scissor: Scissor::Exact("JJ: ignore-rest"),
    scissored_diff: true,
    label_syntax: LabelSyntax::JjStatus,
    labels: &[
        ("M", ChangeKind::Modified),
        ("R", ChangeKind::Modified),
        ("C", ChangeKind::Modified),
        ("A", ChangeKind::Added),
        ("D", ChangeKind::Deleted),
    ],
};

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::Git, Dialect::Hg, Dialect::Svn, Dialect::Jj];

    pub const fn rules(self) -> &'static DialectRules {
        match self {
            Dialect::Git => &GIT,
            Dialect::Hg => &HG,
            Dialect::Svn => &SVN,
            Dialect::Jj => &JJ,
        }
    }

    /// Whether `line` (terminator excluded) is a comment line.
    ///
    /// A line must be at least as long as prefix plus suffix, so svn's `--`
    /// alone does not satisfy both ends with the same two characters.
    pub fn is_comment_line(self, line: &str) -> bool {
        let rules = self.rules();
        line.starts_with(rules.comment_prefix)
            && line.ends_with(rules.comment_suffix)
            && line.len() >= rules.comment_prefix.len() + rules.comment_suffix.len()
    }

    pub fn is_scissor_line(self, line: &str) -> bool {
        match self.rules().scissor {
            Scissor::None => false,
            Scissor::CutMarker {
                prefix,
                suffix,
                contains,
            } => line.starts_with(prefix) && line.ends_with(suffix) && line.contains(contains),
            Scissor::Exact(marker) => line == marker,
        }
    }

    pub fn has_single_comment_marker(self) -> bool {
        self.rules().single_comment_marker
    }

    /// Whether non-comment lines in the comment section are highlighted as a diff.
    pub fn highlights_scissored_diff(self) -> bool {
        self.rules().scissored_diff
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Git => "git",
            Dialect::Hg => "hg",
            Dialect::Svn => "svn",
            Dialect::Jj => "jj",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown version control dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Ok(Dialect::Git),
            "hg" | "mercurial" => Ok(Dialect::Hg),
            "svn" | "subversion" => Ok(Dialect::Svn),
            "jj" | "jujutsu" => Ok(Dialect::Jj),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}
