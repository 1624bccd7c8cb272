//! Line scanner.
//!
//! Splits a buffer into `(start, content_end, end)` spans. `content_end`
//! excludes the terminator (`\n` or `\r\n`), `end` includes it. Offsets are
//! carried both as UTF-8 bytes (for slicing) and UTF-16 code units (for
//! reporting). No zero-length line is synthesised after a trailing
//! terminator, and an empty buffer yields nothing.
//!
//! The scanner holds no state beyond its cursor, so a fresh scan after every
//! edit is cheap and cannot observe stale data.

/// One line of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content without the terminator.
    pub text: &'a str,
    pub start: usize,
    pub content_end: usize,
    pub end: usize,
    pub utf16_start: usize,
    pub utf16_content_end: usize,
    pub utf16_end: usize,
}

impl<'a> Line<'a> {
    /// UTF-16 length of the content (terminator excluded).
    pub fn utf16_len(&self) -> usize {
        self.utf16_content_end - self.utf16_start
    }

    /// True for the last line of a buffer of `total_bytes` bytes.
    pub fn is_last(&self, total_bytes: usize) -> bool {
        self.end == total_bytes
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Lazy iterator over the lines of a text.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    text: &'a str,
    byte: usize,
    utf16: usize,
}

/// Scan `text` from the start.
pub fn scan_lines(text: &str) -> LineScanner<'_> {
    LineScanner {
        text,
        byte: 0,
        utf16: 0,
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.byte >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.byte..];
        let (content_len, terminator_len) = match rest.find('\n') {
            Some(nl) if nl > 0 && rest.as_bytes()[nl - 1] == b'\r' => (nl - 1, 2),
            Some(nl) => (nl, 1),
            None => (rest.len(), 0),
        };
        let content = &rest[..content_len];
        let content_units = crate::utf16::len(content);

        let line = Line {
            text: content,
            start: self.byte,
            content_end: self.byte + content_len,
            end: self.byte + content_len + terminator_len,
            utf16_start: self.utf16,
            utf16_content_end: self.utf16 + content_units,
            // Terminator bytes are ASCII: one UTF-16 unit each.
            utf16_end: self.utf16 + content_units + terminator_len,
        };
        self.byte = line.end;
        self.utf16 = line.utf16_end;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(text: &str) -> Vec<(usize, usize, usize)> {
        scan_lines(text)
            .map(|l| (l.utf16_start, l.utf16_content_end, l.utf16_end))
            .collect()
    }

    #[test]
    fn empty_buffer_has_no_lines() {
        assert_eq!(scan_lines("").count(), 0);
    }

    #[test]
    fn no_trailing_empty_line_after_terminator() {
        assert_eq!(spans("a\nbc\n"), vec![(0, 1, 2), (2, 4, 5)]);
    }

    #[test]
    fn unterminated_final_line() {
        assert_eq!(spans("a\nbc"), vec![(0, 1, 2), (2, 4, 4)]);
    }

    #[test]
    fn blank_lines_are_zero_length_content() {
        assert_eq!(spans("\n\nx"), vec![(0, 0, 1), (1, 1, 2), (2, 3, 3)]);
    }

    #[test]
    fn crlf_terminator_excluded_from_content() {
        let lines: Vec<_> = scan_lines("ab\r\ncd").collect();
        assert_eq!(lines[0].text, "ab");
        assert_eq!(lines[0].content_end, 2);
        assert_eq!(lines[0].end, 4);
        assert_eq!(lines[1].utf16_start, 4);
    }

    #[test]
    fn lone_carriage_return_stays_in_content() {
        let lines: Vec<_> = scan_lines("a\rb\n").collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "a\rb");
    }

    #[test]
    fn utf16_offsets_track_astral_chars() {
        let lines: Vec<_> = scan_lines("😀x\né\n").collect();
        assert_eq!(lines[0].utf16_content_end, 3);
        assert_eq!(lines[0].utf16_len(), 3);
        assert_eq!(lines[1].utf16_start, 4);
        assert_eq!(lines[1].utf16_end, 6);
        assert_eq!(lines[1].start, "😀x\n".len());
    }

    #[test]
    fn last_line_detection() {
        let text = "a\n\n";
        let lines: Vec<_> = scan_lines(text).collect();
        assert!(!lines[0].is_last(text.len()));
        assert!(lines[1].is_last(text.len()));
        assert!(lines[1].is_blank());
    }

    #[test]
    fn scan_is_restartable() {
        let text = "one\ntwo\n";
        let first: Vec<_> = scan_lines(text).collect();
        let second: Vec<_> = scan_lines(text).collect();
        assert_eq!(first, second);
    }
}
