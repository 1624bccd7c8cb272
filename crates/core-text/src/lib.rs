//! Rope-based commit buffer with UTF-16 addressing.
//!
//! Every range that leaves this crate is expressed in UTF-16 code units, the
//! unit native text views and the breadcrumbs audit format use. Internally the
//! buffer is a `ropey::Rope`, which already tracks UTF-16 counts per chunk, so
//! offset conversion stays logarithmic even for large templates.

use ropey::Rope;
use std::ops::Range;

pub mod lines;
pub mod utf16;

pub use lines::{Line, LineScanner, scan_lines};

/// The commit message buffer owned by an editing session.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl std::fmt::Debug for Buffer {
    // Content is deliberately left out: commit messages never go to logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("len_utf16", &self.len_utf16())
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Length of the buffer in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Full plain text. Classification passes run over this snapshot.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Clamp a UTF-16 offset into the buffer, rounding down to a char boundary
    /// when it falls between the two halves of a surrogate pair.
    pub fn clamp_utf16(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_utf16());
        let ch = self.rope.utf16_cu_to_char(offset);
        self.rope.char_to_utf16_cu(ch)
    }

    /// Text inside the UTF-16 range `[start,end)` (clamped).
    pub fn slice_utf16(&self, range: Range<usize>) -> String {
        let (start, end) = self.char_range(range);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replace the UTF-16 range `[start,end)` with `text`.
    ///
    /// Returns the UTF-16 offset immediately after the inserted text, which is
    /// where a caret lands after typing.
    pub fn replace_utf16(&mut self, range: Range<usize>, text: &str) -> usize {
        let (start, end) = self.char_range(range);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.rope.char_to_utf16_cu(start) + utf16::len(text)
    }

    /// Previous grapheme boundary before `offset` (UTF-16), or 0.
    pub fn prev_grapheme_utf16(&self, offset: usize) -> usize {
        let text = self.text();
        let byte = utf16::to_byte(&text, offset);
        let prev = grapheme::prev_boundary(&text, byte);
        utf16::from_byte(&text, prev)
    }

    fn char_range(&self, range: Range<usize>) -> (usize, usize) {
        let total = self.len_utf16();
        let start = range.start.min(total);
        let end = range.end.min(total).max(start);
        (
            self.rope.utf16_cu_to_char(start),
            self.rope.utf16_cu_to_char(end),
        )
    }
}

/// Grapheme helpers. Line-length limits count user-perceived characters, so
/// every length comparison goes through here rather than `chars()`.
pub mod grapheme {
    use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

    /// Number of extended grapheme clusters in `s`.
    pub fn count(s: &str) -> usize {
        s.graphemes(true).count()
    }

    /// Byte offset just past the first `n` grapheme clusters of `s`
    /// (or `s.len()` when `s` is shorter).
    pub fn byte_after(s: &str, n: usize) -> usize {
        s.grapheme_indices(true)
            .nth(n)
            .map(|(idx, _)| idx)
            .unwrap_or(s.len())
    }

    /// Previous grapheme boundary (returns 0 if already at or below the first boundary).
    pub fn prev_boundary(text: &str, byte: usize) -> usize {
        if byte == 0 || byte > text.len() {
            return 0;
        }
        let mut cursor = GraphemeCursor::new(byte, text.len(), true);
        match cursor.prev_boundary(text, 0) {
            Ok(Some(prev)) => prev,
            _ => 0,
        }
    }

    /// Next grapheme boundary (returns `text.len()` if at or beyond the end).
    pub fn next_boundary(text: &str, byte: usize) -> usize {
        if byte >= text.len() {
            return text.len();
        }
        let mut cursor = GraphemeCursor::new(byte, text.len(), true);
        match cursor.next_boundary(text, 0) {
            Ok(Some(next)) => next,
            _ => text.len(),
        }
    }
}
