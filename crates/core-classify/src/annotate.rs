//! Single-pass line annotation.
//!
//! `annotate` walks every line once and sorts it into the highlight classes a
//! commit editor needs: overflow past the subject/body length limits, comment
//! lines above the protected section, scissored diff lines, and file-change
//! labels inside the comment section. The result is a fresh [`Annotations`]
//! value; nothing is patched incrementally.

use crate::TextRange;
use core_text::{Line, grapheme, scan_lines, utf16};
use core_vcs::{ChangeKind, Dialect};
use serde::Serialize;
use tracing::debug;

/// Buffers above this many UTF-16 units that are not version-controlled are
/// styled flat instead of line by line.
pub const LARGE_BUFFER_UTF16_THRESHOLD: usize = 132_690;

/// Optional line-length limits in grapheme clusters. `None` disables a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub subject: Option<usize>,
    pub body: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            subject: Some(69),
            body: Some(72),
        }
    }
}

/// Everything the annotation pass needs besides the text.
#[derive(Debug, Clone, Copy)]
pub struct AnnotateOptions {
    pub dialect: Dialect,
    pub comment_len: usize,
    pub version_controlled: bool,
    pub squash: bool,
    pub limits: Limits,
    pub highlight_file_changes: bool,
}

impl AnnotateOptions {
    pub fn new(dialect: Dialect, comment_len: usize) -> Self {
        Self {
            dialect,
            comment_len,
            version_controlled: true,
            squash: false,
            limits: Limits::default(),
            highlight_file_changes: true,
        }
    }
}

/// A file-change comment line split into its comment prefix and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeSpan {
    pub kind: ChangeKind,
    pub prefix: TextRange,
    pub path: TextRange,
}

/// Result of one annotation pass, every list in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    pub text_overflow_ranges: Vec<TextRange>,
    pub comment_line_ranges: Vec<TextRange>,
    pub diff_header_line_ranges: Vec<TextRange>,
    pub diff_add_line_ranges: Vec<TextRange>,
    pub diff_remove_line_ranges: Vec<TextRange>,
    pub file_changes: Vec<FileChangeSpan>,
    /// Set when the large-buffer short-circuit skipped line classification.
    pub flat: bool,
}

const DIFF_HEADER_PREFIXES: &[&str] = &[
    "@@",
    "+++",
    "---",
    "diff ",
    "deleted file mode",
    "new file mode",
    "copy from",
    "copy to",
    "rename from",
    "rename to",
    "similarity index",
    "dissimilarity index",
    "old mode",
    "new mode",
];

fn is_diff_header(line: &str) -> bool {
    DIFF_HEADER_PREFIXES.iter().any(|p| line.starts_with(p))
        || (line.starts_with("index ") && line.contains(".."))
}

pub fn annotate(text: &str, opts: &AnnotateOptions) -> Annotations {
    let total = utf16::len(text);
    let mut out = Annotations::default();

    if !opts.version_controlled && total > LARGE_BUFFER_UTF16_THRESHOLD {
        out.flat = true;
        debug!(target: "classify", len_utf16 = total, "annotate_flat");
        return out;
    }

    let comment_start = total.saturating_sub(opts.comment_len);
    let single_marker = opts.dialect.has_single_comment_marker();

    for line in scan_lines(text) {
        let in_comment_section = line.utf16_start >= comment_start;
        let comment_line = opts.dialect.is_comment_line(line.text);
        let content = TextRange::from_bounds(line.utf16_start, line.utf16_content_end);

        if comment_line || (single_marker && in_comment_section) {
            if in_comment_section {
                if let Some(span) = file_change(&line, opts) {
                    out.file_changes.push(span);
                }
            } else {
                out.comment_line_ranges.push(content);
            }
            continue;
        }

        if !opts.version_controlled {
            continue;
        }

        if in_comment_section && opts.dialect.highlights_scissored_diff() {
            if is_diff_header(line.text) {
                out.diff_header_line_ranges.push(content);
            } else if line.text.starts_with('+') {
                out.diff_add_line_ranges.push(content);
            } else if line.text.starts_with('-') {
                out.diff_remove_line_ranges.push(content);
            }
            continue;
        }

        let limit = if line.utf16_start == 0 {
            opts.limits.subject
        } else if opts.squash {
            None
        } else {
            opts.limits.body
        };
        if let Some(overflow) = limit.and_then(|limit| overflow(&line, limit)) {
            out.text_overflow_ranges.push(overflow);
        }
    }

    debug!(
        target: "classify",
        overflow = out.text_overflow_ranges.len(),
        comments = out.comment_line_ranges.len(),
        diff_headers = out.diff_header_line_ranges.len(),
        diff_adds = out.diff_add_line_ranges.len(),
        diff_removes = out.diff_remove_line_ranges.len(),
        file_changes = out.file_changes.len(),
        "annotated"
    );
    out
}

/// The part of `line` past its first `limit` grapheme clusters, if any.
fn overflow(line: &Line<'_>, limit: usize) -> Option<TextRange> {
    if grapheme::count(line.text) <= limit {
        return None;
    }
    let kept = grapheme::byte_after(line.text, limit);
    let start = line.utf16_start + utf16::len(&line.text[..kept]);
    Some(TextRange::from_bounds(start, line.utf16_content_end))
}

fn file_change(line: &Line<'_>, opts: &AnnotateOptions) -> Option<FileChangeSpan> {
    if !opts.version_controlled || !opts.highlight_file_changes {
        return None;
    }
    let (kind, label) = opts.dialect.classify_file_change(line.text)?;
    let split = line.utf16_start + utf16::len(&line.text[..label.prefix_len]);
    Some(FileChangeSpan {
        kind,
        prefix: TextRange::from_bounds(line.utf16_start, split),
        path: TextRange::from_bounds(split, line.utf16_content_end),
    })
}
