//! Formatter commands, requests, output handling and errors.
//!
//! Running the external tool is left to a [`Formatter`] implementation; this
//! module covers what happens around it: placeholder expansion, cleaning up
//! the tool's output and turning it into the buffer's new text.

use crate::state::EditorTextState;
use codebench_core::constants::FORMAT_ERROR_PREFIX;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How source text reaches the formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Processing {
    /// Source goes to stdin, formatted text comes back on stdout.
    #[default]
    Pipe,
    /// Source is written to a temporary file that the tool rewrites in place.
    File,
}

/// External formatter invocation settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatCommand {
    pub executable: PathBuf,
    /// Arguments; `%file` and (for pipes) `%filename` are placeholders.
    pub options: Vec<String>,
    pub processing: Processing,
    /// The tool appends a newline to piped output that should be dropped.
    pub pipe_adds_newline: bool,
    /// The tool writes CRLF line endings on its pipe.
    pub returns_crlf: bool,
}

impl FormatCommand {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_processing(mut self, processing: Processing) -> Self {
        self.processing = processing;
        self
    }

    /// Executable as shown to the user.
    pub fn display_name(&self) -> String {
        self.executable.display().to_string()
    }

    /// Options with placeholders filled in for `file_path`.
    ///
    /// In file mode `file_path` is the temporary copy handed to the tool.
    pub fn expanded_options(&self, file_path: &Path) -> Vec<String> {
        let full = file_path.display().to_string();
        match self.processing {
            Processing::Pipe => {
                let name = file_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.options
                    .iter()
                    .map(|option| option.replace("%filename", &name).replace("%file", &full))
                    .collect()
            }
            Processing::File => self
                .options
                .iter()
                .map(|option| option.replace("%file", &full))
                .collect(),
        }
    }
}

/// Text submitted for formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatRequest {
    pub file_path: PathBuf,
    pub source: String,
    /// Char range of the buffer being formatted; `None` means the whole text.
    pub range: Option<Range<usize>>,
}

impl FormatRequest {
    /// Capture the text to format from `state`.
    ///
    /// # Returns
    /// `None` for an inverted range or when there is nothing to format.
    pub fn from_state(
        state: &EditorTextState,
        file_path: impl Into<PathBuf>,
        range: Option<Range<usize>>,
    ) -> Option<Self> {
        let source = match &range {
            Some(range) if range.start > range.end => return None,
            Some(range) => state.slice_chars(range.clone()),
            None => state.text(),
        };
        if source.is_empty() {
            return None;
        }
        Some(Self {
            file_path: file_path.into(),
            source,
            range,
        })
    }

    /// File name shown in messages.
    pub fn display_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Failures on the formatting path. None of them touch the buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("No formatter executable is configured.")]
    MissingExecutable,

    #[error("Failed to format: {0}.")]
    Failed(String),

    #[error(
        "Cannot call {executable} or some other error occurred. Timeout reached while formatting file {file}."
    )]
    Timeout { executable: String, file: String },

    #[error("{executable}: {message}")]
    Stderr { executable: String, message: String },

    #[error("Could not format file {file}.")]
    EmptyOutput { file: String },

    #[error("File was modified.")]
    Modified,
}

/// Runs an external formatter.
///
/// Implementations own process spawning and the file/pipe transport and
/// return the tool's raw output.
pub trait Formatter: Send + Sync {
    fn format(&self, command: &FormatCommand, request: &FormatRequest)
        -> Result<String, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(&FormatCommand, &FormatRequest) -> Result<String, FormatError> + Send + Sync,
{
    fn format(
        &self,
        command: &FormatCommand,
        request: &FormatRequest,
    ) -> Result<String, FormatError> {
        self(command, request)
    }
}

/// Clean up raw pipe output according to the command's quirks.
pub fn normalize_output(command: &FormatCommand, raw: String) -> String {
    if command.processing != Processing::Pipe {
        return raw;
    }
    let mut text = raw;
    if command.pipe_adds_newline && text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    if command.returns_crlf {
        text = text.replace("\r\n", "\n");
    }
    text
}

/// Build the buffer's new full text from formatter output.
///
/// Range requests splice `output` over the requested chars of
/// `current_text`.
///
/// # Errors
/// [`FormatError::EmptyOutput`] when the formatter produced nothing.
pub fn resolve_formatted_text(
    current_text: &str,
    request: &FormatRequest,
    output: String,
) -> Result<String, FormatError> {
    if output.is_empty() {
        return Err(FormatError::EmptyOutput {
            file: request.display_name(),
        });
    }
    let Some(range) = &request.range else {
        return Ok(output);
    };
    let mut text = String::with_capacity(current_text.len() + output.len());
    text.extend(current_text.chars().take(range.start));
    text.push_str(&output);
    text.extend(current_text.chars().skip(range.end));
    Ok(text)
}

/// Message shown to the user for a failed formatting pass.
pub fn flash_message(err: &FormatError) -> String {
    format!("{}: {}", FORMAT_ERROR_PREFIX, err.to_string().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe_command() -> FormatCommand {
        FormatCommand::new("/usr/bin/fmt-tool")
    }

    #[test]
    fn pipe_options_expand_file_name_before_file() {
        let command = pipe_command().with_options(["--assume=%filename", "%file", "-q"]);
        assert_eq!(
            command.expanded_options(Path::new("/src/lib/main.qml")),
            ["--assume=main.qml", "/src/lib/main.qml", "-q"]
        );
    }

    #[test]
    fn file_options_only_expand_file() {
        let command = pipe_command()
            .with_processing(Processing::File)
            .with_options(["-i", "%file", "%filename"]);
        assert_eq!(
            command.expanded_options(Path::new("/tmp/x_format_1.rs")),
            ["-i", "/tmp/x_format_1.rs", "/tmp/x_format_1.rsname"]
        );
    }

    #[test]
    fn normalize_output_trims_added_newline_and_crlf() {
        let mut command = pipe_command();
        command.pipe_adds_newline = true;
        command.returns_crlf = true;
        assert_eq!(normalize_output(&command, "a\r\nb\r\n".to_string()), "a\nb");

        let plain = pipe_command();
        assert_eq!(normalize_output(&plain, "a\r\n".to_string()), "a\r\n");

        let mut file = pipe_command().with_processing(Processing::File);
        file.pipe_adds_newline = true;
        assert_eq!(normalize_output(&file, "a\n".to_string()), "a\n");
    }

    #[test]
    fn request_from_state_handles_ranges() {
        let state = EditorTextState::new("aé bbb");
        let whole = FormatRequest::from_state(&state, "/src/a.rs", None).expect("whole");
        assert_eq!(whole.source, "aé bbb");
        assert_eq!(whole.display_name(), "a.rs");

        let part = FormatRequest::from_state(&state, "/src/a.rs", Some(1..3)).expect("part");
        assert_eq!(part.source, "é ");

        assert!(FormatRequest::from_state(&state, "/src/a.rs", Some(3..1)).is_none());
        assert!(FormatRequest::from_state(&state, "/src/a.rs", Some(2..2)).is_none());
        assert!(FormatRequest::from_state(&EditorTextState::new(""), "/src/a.rs", None).is_none());
    }

    #[test]
    fn resolve_splices_range_output() {
        let request = FormatRequest {
            file_path: PathBuf::from("a.rs"),
            source: "ébb".to_string(),
            range: Some(4..7),
        };
        assert_eq!(
            resolve_formatted_text("aaa ébb ccc", &request, "BBB".to_string()),
            Ok("aaa BBB ccc".to_string())
        );
    }

    #[test]
    fn resolve_rejects_empty_output() {
        let request = FormatRequest {
            file_path: PathBuf::from("/src/a.rs"),
            source: "x".to_string(),
            range: None,
        };
        let err = resolve_formatted_text("x", &request, String::new()).expect_err("empty");
        assert_eq!(
            err,
            FormatError::EmptyOutput {
                file: "a.rs".to_string()
            }
        );
        assert_eq!(
            flash_message(&err),
            "Error in text formatting: Could not format file a.rs."
        );
    }

    #[test]
    fn flash_message_trims_tool_output() {
        let err = FormatError::Stderr {
            executable: "clang-format".to_string(),
            message: "bad style\n".to_string(),
        };
        assert_eq!(
            flash_message(&err),
            "Error in text formatting: clang-format: bad style"
        );
    }

    #[test]
    fn closures_act_as_formatters() {
        let upper = |_: &FormatCommand, request: &FormatRequest| {
            Ok::<_, FormatError>(request.source.to_uppercase())
        };
        let request = FormatRequest {
            file_path: PathBuf::from("a.txt"),
            source: "abc".to_string(),
            range: None,
        };
        assert_eq!(upper.format(&pipe_command(), &request), Ok("ABC".to_string()));
    }
}
