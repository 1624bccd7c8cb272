//! The editable commit range: the buffer prefix before the comment section,
//! allowing at most one blank separator line before the comments.

use core_text::utf16;
use std::ops::Range;

/// Commit range expressed both in UTF-16 units (for reporting and selection)
/// and in bytes (for slicing). Both start at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub utf16: Range<usize>,
    pub bytes: Range<usize>,
}

impl CommitRange {
    pub fn utf16_end(&self) -> usize {
        self.utf16.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.bytes.clone()]
    }
}

/// Walk back from the comment-section start over at most two `\n`.
///
/// A `\r\n` pair is one grapheme that is not `\n`, so it stops the walk.
pub fn commit_text_range(text: &str, comment_len: usize) -> CommitRange {
    let total = utf16::len(text);
    let mut end_units = total.saturating_sub(comment_len);
    let mut end = utf16::to_byte(text, end_units);
    let bytes = text.as_bytes();

    for _ in 0..2 {
        if end == 0 || bytes[end - 1] != b'\n' {
            break;
        }
        if end >= 2 && bytes[end - 2] == b'\r' {
            break;
        }
        end -= 1;
        end_units -= 1;
    }

    CommitRange {
        utf16: 0..end_units,
        bytes: 0..end,
    }
}

/// Commit range text with leading and trailing newlines removed.
pub fn commit_message_content(text: &str, comment_len: usize) -> &str {
    commit_text_range(text, comment_len)
        .slice(text)
        .trim_matches(|c| c == '\n' || c == '\r')
}
