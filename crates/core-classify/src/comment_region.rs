//! Locating the trailing comment section.
//!
//! The comment section begins at a line that starts a run of comment lines
//! reaching the end of the buffer. Non-comment lines inside the run abandon
//! the candidate, except a blank final line. A scissor line inside the run
//! ends scanning: everything after it belongs to the section even if it is
//! not comment-prefixed (diffs under `git commit -v`). Single-marker dialects
//! stop at the first comment line.
//!
//! The length is computed once at load; edits can never reach it afterwards.

use core_text::{scan_lines, utf16};
use core_vcs::Dialect;
use tracing::trace;

/// Length in UTF-16 units of the comment section, measured back from the end.
/// Zero when the buffer has no comment section.
pub fn comment_section_length(text: &str, dialect: Dialect) -> usize {
    let mut candidate: Option<usize> = None;

    for line in scan_lines(text) {
        let comment = dialect.is_comment_line(line.text);
        if !comment {
            if candidate.is_some() && (!line.is_last(text.len()) || !line.is_blank()) {
                candidate = None;
            }
            continue;
        }
        match candidate {
            None => {
                candidate = Some(line.utf16_start);
                if dialect.has_single_comment_marker() {
                    break;
                }
            }
            Some(_) if dialect.is_scissor_line(line.text) => break,
            Some(_) => {}
        }
    }

    let length = candidate.map_or(0, |start| utf16::len(text) - start);
    trace!(target: "classify", dialect = %dialect, length, "comment_section_located");
    length
}

/// UTF-16 offset of the first line that is not a comment line, or `None` when
/// every line is a comment (or the buffer is empty).
pub fn first_content_line_start(text: &str, dialect: Dialect) -> Option<usize> {
    scan_lines(text)
        .find(|line| !dialect.is_comment_line(line.text))
        .map(|line| line.utf16_start)
}
