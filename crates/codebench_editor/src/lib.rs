//! Editor-side text synchronization for external formatter output.
//!
//! [`EditorTextState`] is a rope-backed buffer with folds, a cursor and a
//! scroll anchor. [`sync::apply_text`] replaces its content with new text by
//! applying a minimal diff, so the cursor, folded lines and scroll position
//! survive a formatting pass. [`format`] and [`worker`] describe and run the
//! formatter itself, synchronously or on a background thread.

/// Char-level diff runs between two texts.
pub mod diff;
/// Formatter commands, requests, output handling and errors.
pub mod format;
/// Rope-backed editor text with fold, cursor and scroll state.
pub mod state;
/// Incremental application of new text to an editor state.
pub mod sync;
/// Synchronous and background formatter execution.
pub mod worker;

pub use diff::{diff_runs, DiffRun};
pub use format::{
    flash_message, normalize_output, resolve_formatted_text, FormatCommand, FormatError,
    FormatRequest, Formatter, Processing,
};
pub use state::EditorTextState;
pub use sync::{apply_runs, apply_text, SyncOutcome};
pub use worker::{
    format_now, spawn_format_worker, CancelToken, FormatDone, FormatJob, FormatWorker,
    PendingFormat,
};
