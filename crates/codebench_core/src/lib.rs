//! Core domain library for codebench (register values, register model, config).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across codebench crates.
pub mod constants;
/// Core error types.
pub mod error;
/// Debugger register values, metadata and grouping.
pub mod register;

pub use config::Config;
pub use constants::{ALL_REGISTERS_GROUP, INACCESSIBLE_REGISTER_TEXT};
pub use error::CoreError;
pub use register::{
    Register, RegisterEntry, RegisterFile, RegisterFormat, RegisterGroup, RegisterKind,
    RegisterValue, SubView,
};
