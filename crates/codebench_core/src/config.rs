//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_FORMAT_TIMEOUT_MS, DEFAULT_LINE_HEIGHT_PX};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the formatter timeout in milliseconds.
pub const FORMAT_TIMEOUT_ENV: &str = "CODEBENCH_FORMAT_TIMEOUT_MS";
/// Environment variable holding the editor line height in pixels.
pub const LINE_HEIGHT_ENV: &str = "CODEBENCH_LINE_HEIGHT";
/// Environment flag enabling per-job format worker tracing.
pub const FORMAT_TRACE_ENV: &str = "CODEBENCH_FORMAT_TRACE";

/// Runtime configuration for codebench.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub format_timeout_ms: u64,
    pub line_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format_timeout_ms: DEFAULT_FORMAT_TIMEOUT_MS,
            line_height: DEFAULT_LINE_HEIGHT_PX,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn parse_line_height(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|height| height.is_finite() && *height > 0.0)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or malformed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead so
    /// they never mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let format_timeout_ms = match lookup(FORMAT_TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = raw.as_str(), "ignoring malformed {}", FORMAT_TIMEOUT_ENV);
                defaults.format_timeout_ms
            }),
            None => defaults.format_timeout_ms,
        };
        let line_height = match lookup(LINE_HEIGHT_ENV) {
            Some(raw) => parse_line_height(&raw).unwrap_or_else(|| {
                warn!(value = raw.as_str(), "ignoring malformed {}", LINE_HEIGHT_ENV);
                defaults.line_height
            }),
            None => defaults.line_height,
        };
        Self {
            format_timeout_ms,
            line_height,
        }
    }

    /// Formatter time budget as a [`Duration`].
    pub fn format_timeout(&self) -> Duration {
        Duration::from_millis(self.format_timeout_ms)
    }
}
