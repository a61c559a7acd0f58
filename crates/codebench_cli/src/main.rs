//! Command-line front end for codebench register formatting and text sync.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use codebench_core::{Config, Register, RegisterFormat, RegisterKind, RegisterValue};
use codebench_editor::{
    apply_text, spawn_format_worker, EditorTextState, FormatCommand, FormatError, FormatRequest,
    PendingFormat, SyncOutcome,
};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codebench", about = "Register formatting and editor text sync", version)]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Parse a register value and print it in another radix
    Reg {
        value: String,
        /// Radix of the input text
        #[arg(short, long, default_value = "hex")]
        input: RegisterFormat,
        /// Radix used for output
        #[arg(short, long, default_value = "hex")]
        format: RegisterFormat,
        #[arg(short, long, default_value = "int")]
        kind: RegisterKind,
        /// Register width in bytes
        #[arg(short, long, default_value = "8")]
        size: usize,
        /// Also print the sub-views derived from the register size
        #[arg(long)]
        views: bool,
    },
    /// Apply the contents of NEW to a buffer holding OLD, keeping view state
    Sync {
        old: PathBuf,
        new: PathBuf,
        #[arg(short, long, default_value = "0")]
        cursor: usize,
        /// Folded line (0-based); repeat for several
        #[arg(long = "fold")]
        folds: Vec<usize>,
        #[arg(long, default_value = "0")]
        scroll: usize,
        /// Route the new text through the background format worker
        #[arg(long)]
        background: bool,
        /// Print the resulting text after the summary
        #[arg(long)]
        print_text: bool,
    },
}

#[derive(Debug, Serialize)]
struct ViewReport {
    name: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegReport {
    kind: RegisterKind,
    size: usize,
    format: RegisterFormat,
    text: String,
    write_back: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    views: Vec<ViewReport>,
}

#[derive(Debug, Serialize)]
struct SyncReport {
    #[serde(flatten)]
    outcome: SyncOutcome,
    scroll_line: usize,
    text: String,
}

const DEFAULT_LOG_FILTER: &str =
    "codebench=warn,codebench_core=warn,codebench_editor=info,codebench_cli=info";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn register_report(
    value: &str,
    input: RegisterFormat,
    format: RegisterFormat,
    kind: RegisterKind,
    size: usize,
    views: bool,
) -> Result<RegReport> {
    if size == 0 || size > 16 {
        bail!("register size must be between 1 and 16 bytes, got {}", size);
    }
    let mut register = Register::new("value", size, RegisterValue::parse(value, input));
    register.kind = kind;

    let views = if views {
        register
            .sub_views()
            .into_iter()
            .map(|view| ViewReport {
                name: view.name(),
                text: view.render(&register.value),
                description: view.description(),
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(RegReport {
        kind,
        size,
        format,
        text: register.value.to_text(kind, size, format, false),
        write_back: register.write_back_text(),
        views,
    })
}

fn format_reg_output(report: &RegReport, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("encoding register report");
    }
    let mut lines = vec![report.text.clone()];
    let width = report
        .views
        .iter()
        .map(|view| view.name.len())
        .max()
        .unwrap_or(0);
    for view in &report.views {
        lines.push(format!("{:<width$} {}", view.name, view.text, width = width));
    }
    Ok(lines.join("\n"))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn prepare_state(
    text: &str,
    config: &Config,
    cursor: usize,
    folds: &[usize],
    scroll: usize,
) -> EditorTextState {
    let mut state = EditorTextState::new(text).with_line_height(config.line_height);
    state.set_cursor(cursor);
    for line in folds {
        state.fold(*line);
    }
    state.set_scroll_line(scroll);
    state.set_modified(false);
    state
}

fn sync_in_background(
    state: &mut EditorTextState,
    path: &Path,
    new_text: String,
    config: &Config,
) -> Result<SyncOutcome> {
    let Some(request) = FormatRequest::from_state(state, path, None) else {
        return Ok(apply_text(state, &new_text));
    };
    let worker = spawn_format_worker(move |_: &FormatCommand, _: &FormatRequest| {
        Ok::<_, FormatError>(new_text.clone())
    })
    .context("starting format worker")?;
    let command = FormatCommand::new("codebench-sync");
    let pending = PendingFormat::begin(&worker, state, 1, command, request)?;
    Ok(pending.wait(&worker, state, config.format_timeout())?)
}

fn run_sync(
    old: &Path,
    new: &Path,
    cursor: usize,
    folds: &[usize],
    scroll: usize,
    background: bool,
    config: &Config,
) -> Result<SyncReport> {
    let old_text = read_text(old)?;
    let new_text = read_text(new)?;
    let mut state = prepare_state(&old_text, config, cursor, folds, scroll);
    debug!(
        old = %old.display(),
        new = %new.display(),
        background,
        "replaying text sync"
    );

    let outcome = if background {
        sync_in_background(&mut state, old, new_text, config)?
    } else {
        apply_text(&mut state, &new_text)
    };

    Ok(SyncReport {
        outcome,
        scroll_line: state.scroll_line(),
        text: state.text(),
    })
}

fn format_sync_output(report: &SyncReport, json: bool, print_text: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("encoding sync report");
    }
    let outcome = &report.outcome;
    let mut out = if outcome.changed {
        format!(
            "changed: +{} -{} chars in {} runs\ncursor: {}\nfolded: {:?}\nscroll: {} ({:+})",
            outcome.inserted_chars,
            outcome.deleted_chars,
            outcome.runs,
            outcome.cursor,
            outcome.folded_lines,
            report.scroll_line,
            outcome.scroll_delta
        )
    } else {
        "unchanged".to_string()
    };
    if print_text {
        out.push('\n');
        out.push_str(&report.text);
    }
    Ok(out)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "codebench", &mut io::stdout());
        }
        Commands::Reg {
            value,
            input,
            format,
            kind,
            size,
            views,
        } => {
            let report = register_report(&value, input, format, kind, size, views)?;
            println!("{}", format_reg_output(&report, cli.json)?);
        }
        Commands::Sync {
            old,
            new,
            cursor,
            folds,
            scroll,
            background,
            print_text,
        } => {
            let config = Config::from_env();
            let report = run_sync(&old, &new, cursor, &folds, scroll, background, &config)?;
            println!("{}", format_sync_output(&report, cli.json, print_text)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
