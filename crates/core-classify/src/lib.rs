//! Commit-message classification engine.
//!
//! Everything here is a pure function of the buffer text and a small options
//! value. Callers rerun the whole pipeline after every edit:
//!
//! 1. [`comment_section_length`] locates the protected trailing comments.
//! 2. [`commit_text_range`] derives the editable commit range.
//! 3. [`annotate`] produces the highlight ranges for one pass.
//!
//! All reported offsets are UTF-16 code units.

pub mod annotate;
pub mod comment_region;
pub mod commit_range;
pub mod edit_guard;

pub use annotate::{
    AnnotateOptions, Annotations, FileChangeSpan, LARGE_BUFFER_UTF16_THRESHOLD, Limits, annotate,
};
pub use comment_region::{comment_section_length, first_content_line_start};
pub use commit_range::{CommitRange, commit_message_content, commit_text_range};
pub use edit_guard::{edit_allowed, spell_check_allowed};
pub use core_vcs::Dialect;

/// Half-open UTF-16 range `[location, location + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            location: start,
            length: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.location + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}
