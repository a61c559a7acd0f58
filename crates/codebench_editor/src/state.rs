//! Rope-backed editor text with fold, cursor and scroll state.

use codebench_core::constants::DEFAULT_LINE_HEIGHT_PX;
use ropey::Rope;
use std::collections::BTreeSet;
use std::ops::Range;

/// Live editor buffer mutated by [`crate::sync::apply_text`].
///
/// Lines follow the rope's definition, so `"a\n"` has two lines. Folding is a
/// per-line flag; the cursor is a char offset; the scroll anchor is the first
/// visible line.
#[derive(Clone, Debug)]
pub struct EditorTextState {
    rope: Rope,
    revision: u64,
    folded: BTreeSet<usize>,
    cursor: usize,
    scroll_line: usize,
    line_height: f32,
    modified: bool,
}

impl Default for EditorTextState {
    fn default() -> Self {
        Self::new("")
    }
}

impl EditorTextState {
    /// Create an unmodified buffer with the cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            revision: 0,
            folded: BTreeSet::new(),
            cursor: 0,
            scroll_line: 0,
            line_height: DEFAULT_LINE_HEIGHT_PX,
            modified: false,
        }
    }

    /// Use `line_height` pixels per line; non-positive values are ignored.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        if line_height.is_finite() && line_height > 0.0 {
            self.line_height = line_height;
        }
        self
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Full text snapshot.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Counter bumped by every content mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Line containing `char_index` (clamped to the text end).
    pub fn line_of_char(&self, char_index: usize) -> usize {
        self.rope.char_to_line(char_index.min(self.rope.len_chars()))
    }

    /// Text of `line` without its trailing line break.
    pub fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let text = self.rope.line(line).to_string();
        let trimmed = text
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(&text);
        trimmed.to_string()
    }

    /// Snapshot of the chars in `range`, clamped to the text.
    pub fn slice_chars(&self, range: Range<usize>) -> String {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at `char_index` (clamped).
    pub fn insert(&mut self, char_index: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = char_index.min(self.rope.len_chars());
        self.rope.insert(at, text);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Remove the chars in `range` (clamped).
    pub fn remove(&mut self, range: Range<usize>) {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        self.rope.remove(start..end);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replace everything, dropping folds and resetting cursor and scroll.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.folded.clear();
        self.cursor = 0;
        self.scroll_line = 0;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the text length.
    pub fn set_cursor(&mut self, char_index: usize) {
        self.cursor = char_index.min(self.rope.len_chars());
    }

    /// Folded line numbers in ascending order.
    pub fn folded_lines(&self) -> Vec<usize> {
        self.folded.iter().copied().collect()
    }

    pub fn is_folded(&self, line: usize) -> bool {
        self.folded.contains(&line)
    }

    /// Fold `line`; returns `false` when the line does not exist.
    pub fn fold(&mut self, line: usize) -> bool {
        if line >= self.line_count() {
            return false;
        }
        self.folded.insert(line);
        true
    }

    pub fn unfold(&mut self, line: usize) {
        self.folded.remove(&line);
    }

    /// Unfold every line, returning what was folded.
    pub fn unfold_all(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.folded).into_iter().collect()
    }

    /// First visible line.
    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    pub fn set_scroll_line(&mut self, line: usize) {
        self.scroll_line = line.min(self.line_count() - 1);
    }

    /// Shift the scroll anchor by `lines`, saturating at the buffer edges.
    pub fn scroll_by(&mut self, lines: isize) {
        let target = if lines < 0 {
            self.scroll_line.saturating_sub(lines.unsigned_abs())
        } else {
            self.scroll_line.saturating_add(lines.unsigned_abs())
        };
        self.set_scroll_line(target);
    }

    /// Vertical pixel offset of the cursor line relative to the viewport top.
    pub fn cursor_y(&self) -> f32 {
        let line = self.line_of_char(self.cursor) as f32;
        (line - self.scroll_line as f32) * self.line_height
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}
