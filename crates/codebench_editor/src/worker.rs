//! Synchronous and background formatter execution.
//!
//! The background path mirrors how an editor formats without blocking the UI:
//! the job runs on a worker thread while the foreground keeps the buffer. A
//! [`CancelToken`] plus the buffer revision recorded at submission make sure a
//! result computed against stale text is never applied.

use crate::format::{
    flash_message, normalize_output, resolve_formatted_text, FormatCommand, FormatError,
    FormatRequest, Formatter,
};
use crate::state::EditorTextState;
use crate::sync::{apply_text, SyncOutcome};
use codebench_core::config::{env_flag_enabled, FORMAT_TRACE_ENV};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Shared flag telling a pending job its result is no longer wanted.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Work item sent to the format worker.
#[derive(Debug)]
pub struct FormatJob {
    pub id: u64,
    pub command: FormatCommand,
    pub request: FormatRequest,
    pub cancel: CancelToken,
}

/// Worker reply for one [`FormatJob`].
#[derive(Debug)]
pub struct FormatDone {
    pub id: u64,
    /// Normalized formatter output.
    pub result: Result<String, FormatError>,
}

/// Channel endpoints of a running format worker.
pub struct FormatWorker {
    pub tx: Sender<FormatJob>,
    pub rx: Receiver<FormatDone>,
}

fn run_formatter<F>(
    formatter: &F,
    command: &FormatCommand,
    request: &FormatRequest,
) -> Result<String, FormatError>
where
    F: Formatter + ?Sized,
{
    if command.executable.as_os_str().is_empty() {
        return Err(FormatError::MissingExecutable);
    }
    let raw = formatter.format(command, request)?;
    Ok(normalize_output(command, raw))
}

fn log_failure(err: &FormatError) {
    warn!(
        target: "codebench_editor::format",
        error = %err,
        "{}",
        flash_message(err)
    );
}

/// Format `request` on the calling thread and apply the result to `state`.
///
/// # Errors
/// Any [`FormatError`] from the formatter or from empty output; `state` is
/// left untouched in that case.
pub fn format_now<F>(
    state: &mut EditorTextState,
    formatter: &F,
    command: &FormatCommand,
    request: &FormatRequest,
) -> Result<SyncOutcome, FormatError>
where
    F: Formatter + ?Sized,
{
    let result = run_formatter(formatter, command, request)
        .and_then(|output| resolve_formatted_text(&state.text(), request, output));
    match result {
        Ok(text) => Ok(apply_text(state, &text)),
        Err(err) => {
            log_failure(&err);
            Err(err)
        }
    }
}

/// Spawn the background format worker and return its channel endpoints.
///
/// Jobs whose token is already cancelled when dequeued are answered with
/// [`FormatError::Modified`] without running the formatter. The worker exits
/// once the job sender is dropped.
///
/// # Errors
/// Returns the OS error when the thread cannot be spawned.
pub fn spawn_format_worker<F>(formatter: F) -> io::Result<FormatWorker>
where
    F: Formatter + 'static,
{
    let (tx, rx_cmd) = unbounded::<FormatJob>();
    let (tx_evt, rx_evt) = unbounded();
    let trace_enabled = env_flag_enabled(FORMAT_TRACE_ENV);

    thread::Builder::new()
        .name("codebench-format".to_string())
        .spawn(move || {
            for job in rx_cmd.iter() {
                let started = Instant::now();
                let result = if job.cancel.is_cancelled() {
                    Err(FormatError::Modified)
                } else {
                    run_formatter(&formatter, &job.command, &job.request)
                };
                if trace_enabled {
                    info!(
                        target: "codebench_editor::format",
                        event = "worker_done",
                        job = job.id,
                        file = %job.request.file_path.display(),
                        source_len = job.request.source.len(),
                        ok = result.is_ok(),
                        elapsed_ms = started.elapsed().as_secs_f32() * 1000.0,
                        "format worker pass"
                    );
                }
                if tx_evt.send(FormatDone { id: job.id, result }).is_err() {
                    break;
                }
            }
        })?;

    Ok(FormatWorker { tx, rx: rx_evt })
}

/// Foreground record of a job submitted to a [`FormatWorker`].
#[derive(Debug)]
pub struct PendingFormat {
    job_id: u64,
    baseline_revision: u64,
    executable: String,
    request: FormatRequest,
    cancel: CancelToken,
}

impl PendingFormat {
    /// Submit a job formatting `request`, remembering `state`'s revision.
    ///
    /// # Errors
    /// [`FormatError::Failed`] when the worker is gone.
    pub fn begin(
        worker: &FormatWorker,
        state: &EditorTextState,
        job_id: u64,
        command: FormatCommand,
        request: FormatRequest,
    ) -> Result<Self, FormatError> {
        let cancel = CancelToken::new();
        let pending = Self {
            job_id,
            baseline_revision: state.revision(),
            executable: command.display_name(),
            request: request.clone(),
            cancel: cancel.clone(),
        };
        worker
            .tx
            .send(FormatJob {
                id: job_id,
                command,
                request,
                cancel,
            })
            .map_err(|_| FormatError::Failed("format worker is not running".to_string()))?;
        Ok(pending)
    }

    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Call whenever the buffer content changes while the job is in flight.
    pub fn note_content_changed(&self) {
        self.cancel.cancel();
    }

    /// Apply a worker reply for this job.
    ///
    /// # Errors
    /// [`FormatError::Modified`] when the job was cancelled or the buffer
    /// moved past the baseline revision, otherwise the formatter's error.
    pub fn finish(
        self,
        state: &mut EditorTextState,
        done: FormatDone,
    ) -> Result<SyncOutcome, FormatError> {
        let result = if self.cancel.is_cancelled() || state.revision() != self.baseline_revision {
            Err(FormatError::Modified)
        } else {
            done.result
                .and_then(|output| resolve_formatted_text(&state.text(), &self.request, output))
        };
        match result {
            Ok(text) => Ok(apply_text(state, &text)),
            Err(err) => {
                log_failure(&err);
                Err(err)
            }
        }
    }

    /// Block until this job's reply arrives, then [`finish`](Self::finish).
    ///
    /// Replies for other job ids are discarded. Running out of `timeout`
    /// cancels the job.
    ///
    /// # Errors
    /// [`FormatError::Timeout`] on timeout, [`FormatError::Failed`] when the
    /// worker stopped, or whatever `finish` reports.
    pub fn wait(
        self,
        worker: &FormatWorker,
        state: &mut EditorTextState,
        timeout: Duration,
    ) -> Result<SyncOutcome, FormatError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match worker.rx.recv_timeout(remaining) {
                Ok(done) if done.id == self.job_id => return self.finish(state, done),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    self.cancel.cancel();
                    let err = FormatError::Timeout {
                        executable: self.executable,
                        file: self.request.display_name(),
                    };
                    log_failure(&err);
                    return Err(err);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let err = FormatError::Failed("format worker stopped".to_string());
                    log_failure(&err);
                    return Err(err);
                }
            }
        }
    }
}
