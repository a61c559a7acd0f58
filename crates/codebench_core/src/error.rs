//! Error types for core parsing and configuration.
use thiserror::Error;

/// Top-level error type for `codebench_core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown {what}: {name}")]
    UnknownName { what: &'static str, name: String },
}
