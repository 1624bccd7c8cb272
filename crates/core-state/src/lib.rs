//! Editing session: one commit file, one buffer, one exit.
//!
//! A [`Session`] owns the buffer and everything fixed at load time (dialect
//! detection, comment-section length, resolved settings). Every edit goes
//! through [`Session::replace`], which enforces the comment-section veto and
//! re-runs the annotation pass over the whole buffer. There is no
//! incremental state to invalidate: the annotation set after an edit depends
//! only on the new text.
//!
//! Typing semantics mirror an interactive editor closely enough for headless
//! drivers (the binary, integration tests):
//! - text runs replace the current selection and leave a caret after them;
//! - Enter goes through [`Session::insert_newline`], which may insert a blank
//!   separator line after the subject and then debounce the next Enter;
//! - select-all never selects into the comment section.
//!
//! Exit is explicit. [`Session::commit`] writes the buffer atomically;
//! [`Session::cancel`] leaves the file untouched and parks unfinished new
//! messages in the incomplete-session store. Breadcrumbs are written once,
//! whichever path is taken.

use core_breadcrumbs::{Breadcrumbs, BreadcrumbsSink};
use core_classify::{
    AnnotateOptions, Annotations, CommitRange, Limits, TextRange, annotate,
    comment_section_length, commit_message_content, commit_text_range, edit_allowed,
    first_content_line_start, spell_check_allowed,
};
use core_config::Settings;
use core_text::{Buffer, Line, scan_lines};
use core_vcs::{Detection, DetectionInput, Dialect, detect};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};
use tracing::{debug, info, trace, warn};

pub mod error;
pub mod guard;
pub mod load;
pub mod store;

pub use error::SessionError;
pub use guard::{NEWLINE_GUARD_DELAY, NewlineGuard};
pub use load::{ensure_line_break, read_commit_file, write_commit_file};
pub use store::IncompleteSessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// Vetoed because it would touch the comment section.
    Rejected,
    /// Nothing to do (e.g. backspace at offset 0).
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineOutcome {
    /// A single `\n`.
    Inserted,
    /// `\n\n` after the subject; the guard is now armed.
    AutoInserted,
    /// Enter arrived while the guard was armed.
    Swallowed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Committed,
    /// Cancelled a message that was empty at load.
    Cancelled,
    /// Cancelled a message that had content at load (amend, reword).
    Aborted,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Committed | ExitStatus::Cancelled => 0,
            ExitStatus::Aborted => 1,
        }
    }
}

/// Everything [`Session::open`] needs besides the path.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub settings: Settings,
    /// `None` disables resume and save regardless of settings.
    pub store: Option<IncompleteSessionStore>,
    /// Reference time for the store's freshness check.
    pub now: SystemTime,
}

impl OpenOptions {
    /// Options with the default store location for the configured (or
    /// working-directory) project name.
    pub fn new(settings: Settings) -> Self {
        let project = settings.project_name.clone().unwrap_or_else(|| {
            std::env::current_dir()
                .map(|cwd| core_vcs::project_name(&cwd))
                .unwrap_or_else(|_| "default".to_string())
        });
        let store = IncompleteSessionStore::for_project(&project);
        Self {
            settings,
            store,
            now: SystemTime::now(),
        }
    }

    pub fn with_store(mut self, store: Option<IncompleteSessionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn at(mut self, now: SystemTime) -> Self {
        self.now = now;
        self
    }
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    buffer: Buffer,
    settings: Settings,
    detection: Detection,
    /// Fixed at load. Edits can never reach the section, so it stays valid.
    comment_len: usize,
    selection: Range<usize>,
    initially_empty: bool,
    resumed: bool,
    spell_checking: bool,
    guard: NewlineGuard,
    annotations: Annotations,
    breadcrumbs: Breadcrumbs,
    sink: Option<BreadcrumbsSink>,
    store: Option<IncompleteSessionStore>,
    exit: Option<ExitStatus>,
}

impl Session {
    /// Load `path` and set up the session. Only the commit file read can fail.
    pub fn open(path: &Path, opts: OpenOptions) -> Result<Self, SessionError> {
        let OpenOptions {
            settings,
            store,
            now,
        } = opts;
        let loaded = read_commit_file(path)?;
        let detection = detect(DetectionInput {
            path,
            content: &loaded,
            forced: settings.forced_dialect,
            assume_version_controlled: settings.assume_version_controlled,
            detect_squash: settings.detect_squash,
            hg_uses_git_comment_style: settings.hg_uses_git_comment_style,
        });
        let dialect = detection.comment_dialect;
        let loaded_comment_len = comment_section_length(&loaded, dialect);
        let initially_empty = commit_message_content(&loaded, loaded_comment_len).is_empty();

        let store = store.filter(|_| settings.resume_incomplete);
        let saved = match &store {
            Some(store) if initially_empty => store.take(settings.resume_timeout, now),
            Some(store) => {
                store.discard();
                None
            }
            None => None,
        };

        let (text, comment_len, resumed) = match saved {
            Some(saved) => {
                let text = saved + &loaded;
                let len = comment_section_length(&text, dialect);
                (text, len, true)
            }
            None => (loaded, loaded_comment_len, false),
        };

        let range = commit_text_range(&text, comment_len);
        let selection = if !detection.version_controlled {
            0..0
        } else if resumed {
            range.utf16.clone()
        } else {
            range.utf16_end()..range.utf16_end()
        };
        let spell_checking = settings.continuous_spell_checking
            && !((detection.squash || !detection.version_controlled)
                && settings.disable_spell_checking_for_squash);
        let sink = settings.breadcrumbs.as_ref().map(|target| BreadcrumbsSink {
            path: target.path.clone(),
            atomic: target.atomic,
        });
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut session = Self {
            path: path.to_path_buf(),
            buffer: Buffer::from_str(name, &text),
            settings,
            detection,
            comment_len,
            selection,
            initially_empty,
            resumed,
            spell_checking,
            guard: NewlineGuard::default(),
            annotations: Annotations::default(),
            breadcrumbs: Breadcrumbs::default(),
            sink,
            store,
            exit: None,
        };
        session.reannotate();

        info!(
            target: "session",
            path = %session.path.display(),
            dialect = %dialect,
            comment_len,
            initially_empty,
            resumed,
            spell_checking,
            "session_opened"
        );
        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn dialect(&self) -> Dialect {
        self.detection.comment_dialect
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn comment_len(&self) -> usize {
        self.comment_len
    }

    /// UTF-16 offset where the comment section starts (buffer end when there
    /// is none).
    pub fn comment_start(&self) -> usize {
        self.buffer.len_utf16().saturating_sub(self.comment_len)
    }

    pub fn commit_range(&self) -> CommitRange {
        commit_text_range(&self.buffer.text(), self.comment_len)
    }

    /// Commit text with surrounding newlines trimmed.
    pub fn commit_message(&self) -> String {
        commit_message_content(&self.buffer.text(), self.comment_len).to_string()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, clamping into the buffer and ordering the ends.
    pub fn set_selection(&mut self, range: Range<usize>) {
        let a = self.buffer.clamp_utf16(range.start);
        let b = self.buffer.clamp_utf16(range.end);
        self.selection = a.min(b)..a.max(b);
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    pub fn spell_checking(&self) -> bool {
        self.spell_checking
    }

    pub fn is_initially_empty(&self) -> bool {
        self.initially_empty
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit
    }

    /// Whether spelling marks may be placed on `range`.
    pub fn spell_check_allowed(&self, range: TextRange) -> bool {
        self.spell_checking
            && spell_check_allowed(&self.buffer.text(), range, self.comment_len, self.dialect())
    }

    fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            dialect: self.dialect(),
            comment_len: self.comment_len,
            version_controlled: self.detection.version_controlled,
            squash: self.detection.squash,
            limits: Limits {
                subject: self.settings.subject_limit,
                body: self.settings.body_limit,
            },
            highlight_file_changes: self.settings.highlight_file_changes,
        }
    }

    fn reannotate(&mut self) {
        self.annotations = annotate(&self.buffer.text(), &self.annotate_options());
        self.breadcrumbs.record(&self.annotations);
    }

    /// Replace `range` with `text`, leaving a caret after the insertion.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> EditOutcome {
        let start = self.buffer.clamp_utf16(range.start);
        let end = self.buffer.clamp_utf16(range.end).max(start);
        let affected = TextRange::from_bounds(start, end);
        if !edit_allowed(&[affected], self.comment_start(), self.comment_len) {
            trace!(
                target: "session",
                location = affected.location,
                length = affected.length,
                comment_start = self.comment_start(),
                "edit_rejected"
            );
            return EditOutcome::Rejected;
        }
        let caret = self.buffer.replace_utf16(start..end, text);
        self.selection = caret..caret;
        self.reannotate();
        EditOutcome::Applied
    }

    /// Type `text` at the selection as a user would: each `\n` is an Enter
    /// press and every other run disarms the newline guard, so only an Enter
    /// directly after the automatic separator is swallowed. Returns
    /// `Rejected` if any part was vetoed.
    pub fn type_text(&mut self, text: &str, now: Instant) -> EditOutcome {
        let mut outcome = EditOutcome::Unchanged;
        let mut merge = |next: EditOutcome| {
            outcome = match (outcome, next) {
                (EditOutcome::Rejected, _) | (_, EditOutcome::Rejected) => EditOutcome::Rejected,
                (EditOutcome::Applied, _) | (_, EditOutcome::Applied) => EditOutcome::Applied,
                _ => EditOutcome::Unchanged,
            };
        };
        for (i, run) in text.split('\n').enumerate() {
            if i > 0 {
                merge(match self.insert_newline(now) {
                    NewlineOutcome::Inserted | NewlineOutcome::AutoInserted => {
                        EditOutcome::Applied
                    }
                    NewlineOutcome::Swallowed => EditOutcome::Unchanged,
                    NewlineOutcome::Rejected => EditOutcome::Rejected,
                });
            }
            if !run.is_empty() {
                let selection = self.selection();
                merge(self.replace(selection, run));
                self.guard.disarm();
            }
        }
        outcome
    }

    fn automatic_newline_enabled(&self) -> bool {
        self.detection.version_controlled
            && self.settings.automatic_newline_insertion
            && !(self.detection.squash && self.settings.disable_automatic_newline_for_squash)
    }

    /// Enter at the selection.
    pub fn insert_newline(&mut self, now: Instant) -> NewlineOutcome {
        if self.automatic_newline_enabled() {
            if self.guard.is_armed(now) {
                trace!(target: "session", "newline_swallowed");
                return NewlineOutcome::Swallowed;
            }
            if self.wants_separator_line() {
                let selection = self.selection();
                return match self.replace(selection, "\n\n") {
                    EditOutcome::Applied => {
                        self.guard.arm(now);
                        debug!(target: "session", caret = self.selection.start, "newline_auto_inserted");
                        NewlineOutcome::AutoInserted
                    }
                    _ => NewlineOutcome::Rejected,
                };
            }
        }
        let selection = self.selection();
        match self.replace(selection, "\n") {
            EditOutcome::Applied => NewlineOutcome::Inserted,
            _ => NewlineOutcome::Rejected,
        }
    }

    /// The selection sits on the first non-empty content line, and that line
    /// ends at the comment section or right before an empty line.
    fn wants_separator_line(&self) -> bool {
        let text = self.buffer.text();
        let Some(first) = first_content_line_start(&text, self.dialect()) else {
            return false;
        };
        let lines: Vec<Line<'_>> = scan_lines(&text).collect();
        let Range { start, end } = self.selection();
        let last = if end > start { end - 1 } else { end };
        let (Some(start_line), Some(end_line)) = (line_at(&lines, start), line_at(&lines, last))
        else {
            return false;
        };
        if start_line.utf16_start != first || end_line.utf16_content_end <= start_line.utf16_start
        {
            return false;
        }
        end_line.utf16_end == self.comment_start() || text[end_line.end..].starts_with(['\n', '\r'])
    }

    /// Delete the selection, or the grapheme before the caret.
    pub fn delete_backward(&mut self) -> EditOutcome {
        let Range { start, end } = self.selection();
        if start != end {
            return self.replace(start..end, "");
        }
        if start == 0 {
            return EditOutcome::Unchanged;
        }
        let prev = self.buffer.prev_grapheme_utf16(start);
        self.replace(prev..start, "")
    }

    /// Select the commit range, or the whole buffer without a comment section.
    pub fn select_all(&mut self) {
        self.selection = if self.comment_len > 0 {
            self.commit_range().utf16
        } else {
            0..self.buffer.len_utf16()
        };
    }

    /// Write the buffer to the commit file and finish with exit status 0.
    ///
    /// A write failure leaves the session open; the caller decides whether to
    /// retry or cancel.
    pub fn commit(&mut self) -> Result<ExitStatus, SessionError> {
        if let Some(status) = self.exit {
            return Ok(status);
        }
        write_commit_file(&self.path, &self.buffer.text())?;
        Ok(self.finish(ExitStatus::Committed))
    }

    /// Leave the commit file untouched. A new message with content is saved
    /// for the next session when resuming is enabled.
    pub fn cancel(&mut self) -> ExitStatus {
        if let Some(status) = self.exit {
            return status;
        }
        if !self.initially_empty {
            return self.finish(ExitStatus::Aborted);
        }
        if let Some(store) = &self.store {
            let content = self.commit_message();
            if !content.is_empty()
                && let Err(err) = store.save(&content)
            {
                warn!(target: "session", path = %err.path().display(), error = %err, "store_save_failed");
            }
        }
        self.finish(ExitStatus::Cancelled)
    }

    fn finish(&mut self, status: ExitStatus) -> ExitStatus {
        self.exit = Some(status);
        self.breadcrumbs.exit_status = status.code();
        self.breadcrumbs.spell_checking = self.spell_checking;
        if let Some(sink) = &self.sink {
            sink.write_or_log(&self.breadcrumbs);
        }
        info!(target: "session", ?status, code = status.code(), "session_finished");
        status
    }
}

/// Line containing UTF-16 `offset`. The buffer end belongs to the last line
/// only when that line has no terminator.
fn line_at<'a>(lines: &[Line<'a>], offset: usize) -> Option<Line<'a>> {
    lines
        .iter()
        .copied()
        .find(|line| offset < line.utf16_end)
        .or_else(|| {
            lines
                .last()
                .copied()
                .filter(|line| line.utf16_content_end == line.utf16_end && offset == line.utf16_end)
        })
}
