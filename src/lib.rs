//! Root crate facade for codebench register formatting and editor text sync.

pub use codebench_core::{
    config, constants, error, register, Config, CoreError, Register, RegisterEntry, RegisterFile,
    RegisterFormat, RegisterGroup, RegisterKind, RegisterValue, SubView,
};
pub use codebench_editor::{
    apply_runs, apply_text, diff, diff_runs, format, format_now, spawn_format_worker, state, sync,
    worker, CancelToken, DiffRun, EditorTextState, FormatCommand, FormatError, FormatRequest,
    Formatter, PendingFormat, Processing, SyncOutcome,
};
