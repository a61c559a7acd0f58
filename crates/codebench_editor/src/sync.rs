//! Incremental application of new text to an editor state.
//!
//! Replacing a buffer wholesale loses the cursor, folds and scroll position.
//! [`apply_text`] instead diffs the current text against the target and
//! replays the runs, tracking where the cursor and folded lines end up.

use crate::diff::{diff_runs, DiffRun};
use crate::state::EditorTextState;
use serde::Serialize;
use tracing::debug;

/// Summary of one [`apply_text`] pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SyncOutcome {
    /// `false` when the text was already equal and nothing was touched.
    pub changed: bool,
    pub runs: usize,
    pub inserted_chars: usize,
    pub deleted_chars: usize,
    pub cursor: usize,
    pub folded_lines: Vec<usize>,
    /// Lines the scroll anchor moved to keep the cursor line in place.
    pub scroll_delta: isize,
}

/// Replace the content of `state` with `new_text` through a minimal diff.
///
/// The cursor keeps pointing at the same surrounding text, folded lines are
/// remapped across inserted and deleted line breaks, and the scroll anchor
/// moves with the cursor line. Equal text is a no-op that leaves the
/// modified flag alone; any real change marks the buffer modified.
///
/// The diff is computed against `state`'s current text, so callers that
/// produced `new_text` asynchronously must check the buffer did not change
/// in the meantime.
pub fn apply_text(state: &mut EditorTextState, new_text: &str) -> SyncOutcome {
    let old_text = state.text();
    if old_text == new_text {
        return SyncOutcome {
            changed: false,
            cursor: state.cursor(),
            folded_lines: state.folded_lines(),
            ..SyncOutcome::default()
        };
    }
    let runs = diff_runs(&old_text, new_text);
    apply_runs(state, &runs)
}

/// Replay precomputed `runs` against `state`.
///
/// `runs` must describe a diff whose old side is the current text of `state`.
/// The chars-in-front-of-cursor counter is measured in old-text chars, so
/// inserted runs move the new cursor but never that counter.
pub fn apply_runs(state: &mut EditorTextState, runs: &[DiffRun]) -> SyncOutcome {
    let mut folded = state.unfold_all();
    let cursor_y_before = state.cursor_y();

    let mut outcome = SyncOutcome {
        changed: true,
        runs: runs.len(),
        ..SyncOutcome::default()
    };
    // Old-text chars left between the walk position and the original cursor.
    let mut chars_in_front = state.cursor() as isize;
    let mut new_cursor = chars_in_front;
    let mut position = 0usize;

    for run in runs {
        let len = run.char_len();
        match run {
            DiffRun::Insert(text) => {
                if chars_in_front > 0 {
                    new_cursor += len as isize;
                }
                let line = state.line_of_char(position);
                let lines_before = state.line_count();
                state.insert(position, text);
                let added = state.line_count().saturating_sub(lines_before);
                if added > 0 {
                    for folded_line in folded.iter_mut().filter(|folded_line| **folded_line > line) {
                        *folded_line += added;
                    }
                }
                position += len;
                outcome.inserted_chars += len;
            }
            DiffRun::Delete(_) => {
                if chars_in_front > 0 {
                    chars_in_front -= len as isize;
                    new_cursor -= len as isize;
                    if chars_in_front < 0 {
                        // Cursor sat inside the deleted span.
                        new_cursor -= chars_in_front;
                    }
                }
                let line = state.line_of_char(position);
                let lines_before = state.line_count();
                state.remove(position..position + len);
                let removed = lines_before.saturating_sub(state.line_count());
                if removed > 0 {
                    folded.retain_mut(|folded_line| {
                        if *folded_line <= line {
                            return true;
                        }
                        match folded_line.checked_sub(removed) {
                            Some(shifted) if shifted > line => {
                                *folded_line = shifted;
                                true
                            }
                            _ => false,
                        }
                    });
                }
                outcome.deleted_chars += len;
            }
            DiffRun::Equal(_) => {
                chars_in_front -= len as isize;
                position += len;
            }
        }
    }

    state.set_cursor(new_cursor.max(0) as usize);

    let cursor_y_after = state.cursor_y();
    let scroll_delta = ((cursor_y_after - cursor_y_before) / state.line_height()) as isize;
    state.scroll_by(scroll_delta);

    folded.sort_unstable();
    folded.dedup();
    for line in folded {
        state.fold(line);
    }
    state.set_modified(true);

    outcome.cursor = state.cursor();
    outcome.folded_lines = state.folded_lines();
    outcome.scroll_delta = scroll_delta;
    debug!(
        runs = outcome.runs,
        inserted = outcome.inserted_chars,
        deleted = outcome.deleted_chars,
        cursor = outcome.cursor,
        folds = outcome.folded_lines.len(),
        scroll_delta = outcome.scroll_delta,
        "applied incremental text sync"
    );
    outcome
}
