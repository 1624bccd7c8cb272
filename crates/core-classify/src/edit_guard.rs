//! Edit veto and spell-check gating around the protected comment section.

use crate::TextRange;
use core_text::{scan_lines, utf16};
use core_vcs::Dialect;

/// Whether an edit touching `affected` may proceed.
///
/// With a comment section, any range ending at or past its start is
/// rejected, so even an insertion right at the boundary is refused. Without
/// one, everything is allowed, including appending at the end.
pub fn edit_allowed(affected: &[TextRange], comment_start: usize, comment_len: usize) -> bool {
    if comment_len == 0 {
        return true;
    }
    affected.iter().all(|range| range.end() < comment_start)
}

/// Whether spelling marks may be set on `range`: never inside the comment
/// section or on a comment line.
pub fn spell_check_allowed(
    text: &str,
    range: TextRange,
    comment_len: usize,
    dialect: Dialect,
) -> bool {
    let comment_start = utf16::len(text).saturating_sub(comment_len);
    if range.location >= comment_start {
        return false;
    }
    scan_lines(text)
        .find(|line| range.location < line.utf16_end)
        .is_none_or(|line| !dialect.is_comment_line(line.text))
}
