//! UTF-8 byte offset <-> UTF-16 code unit offset conversion over `&str`.
//!
//! These are linear scans; the classification passes avoid calling them per
//! line by carrying running UTF-16 counters in [`crate::LineScanner`].

/// Length of `s` in UTF-16 code units.
pub fn len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// UTF-16 offset of the byte offset `byte` (clamped to `text.len()`; a byte
/// offset inside a multi-byte char counts that char as not yet reached).
pub fn from_byte(text: &str, byte: usize) -> usize {
    let byte = byte.min(text.len());
    text.char_indices()
        .take_while(|(idx, _)| *idx < byte)
        .map(|(_, c)| c.len_utf16())
        .sum()
}

/// Byte offset of the UTF-16 offset `offset`, rounded down to the enclosing
/// char boundary. Offsets past the end clamp to `text.len()`.
pub fn to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0usize;
    for (idx, c) in text.char_indices() {
        let next = units + c.len_utf16();
        if next > offset {
            return idx;
        }
        units = next;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_are_identity() {
        let s = "hello";
        assert_eq!(len(s), 5);
        assert_eq!(to_byte(s, 3), 3);
        assert_eq!(from_byte(s, 3), 3);
    }

    #[test]
    fn astral_chars_count_two_units() {
        let s = "a😀b";
        assert_eq!(len(s), 4);
        assert_eq!(from_byte(s, 5), 3);
        assert_eq!(to_byte(s, 3), 5);
        // Inside the surrogate pair rounds down to the emoji start.
        assert_eq!(to_byte(s, 2), 1);
    }

    #[test]
    fn bmp_multibyte_is_one_unit() {
        let s = "é漢";
        assert_eq!(len(s), 2);
        assert_eq!(to_byte(s, 1), 2);
        assert_eq!(from_byte(s, 5), 2);
    }

    #[test]
    fn past_end_clamps() {
        assert_eq!(to_byte("ab", 10), 2);
        assert_eq!(from_byte("ab", 10), 2);
    }
}
