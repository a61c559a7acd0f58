//! Shared constants used across codebench crates.

/// Display text for a register whose value could not be read.
pub const INACCESSIBLE_REGISTER_TEXT: &str = "[inaccessible]";

/// Group that receives registers which do not report any group.
pub const ALL_REGISTERS_GROUP: &str = "all";

/// Default time budget for one external formatter run, in milliseconds.
pub const DEFAULT_FORMAT_TIMEOUT_MS: u64 = 5_000;

/// Default editor line height in pixels.
pub const DEFAULT_LINE_HEIGHT_PX: f32 = 16.0;

/// Prefix used for user-facing formatter failures.
pub const FORMAT_ERROR_PREFIX: &str = "Error in text formatting";
