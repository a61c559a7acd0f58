//! Unit tests for the `codebench` CLI entrypoint module.

use super::{
    format_reg_output, format_sync_output, prepare_state, register_report, run_sync, Cli,
    Commands, DEFAULT_LOG_FILTER,
};
use clap::Parser;
use codebench_core::{Config, RegisterFormat, RegisterKind};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn write_pair(dir: &TempDir, old: &str, new: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let old_path = dir.path().join("old.rs");
    let new_path = dir.path().join("new.rs");
    fs::write(&old_path, old).expect("write old");
    fs::write(&new_path, new).expect("write new");
    (old_path, new_path)
}

#[test]
fn cli_parses_reg_subcommand_with_aliases() {
    let cli = Cli::try_parse_from([
        "codebench", "reg", "ff", "--format", "signed", "--size", "1", "--json",
    ])
    .expect("parse");
    assert!(cli.json);
    match cli.command {
        Commands::Reg {
            value,
            input,
            format,
            kind,
            size,
            views,
        } => {
            assert_eq!(value, "ff");
            assert_eq!(input, RegisterFormat::Hexadecimal);
            assert_eq!(format, RegisterFormat::SignedDecimal);
            assert_eq!(kind, RegisterKind::Integer);
            assert_eq!(size, 1);
            assert!(!views);
        }
        _ => panic!("expected reg command"),
    }
}

#[test]
fn cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["codebench", "reg", "1", "--format", "base64"]).is_err());
}

#[test]
fn cli_collects_repeated_folds() {
    let cli = Cli::try_parse_from([
        "codebench", "sync", "a", "b", "--fold", "2", "--fold", "5", "--cursor", "3",
    ])
    .expect("parse");
    match cli.command {
        Commands::Sync { folds, cursor, .. } => {
            assert_eq!(folds, vec![2, 5]);
            assert_eq!(cursor, 3);
        }
        _ => panic!("expected sync command"),
    }
}

#[test]
fn register_report_formats_signed_byte() {
    let report = register_report(
        "ff",
        RegisterFormat::Hexadecimal,
        RegisterFormat::SignedDecimal,
        RegisterKind::Integer,
        1,
        false,
    )
    .expect("report");
    assert_eq!(report.text, "-1");
    assert_eq!(report.write_back, "0xff");
    assert_eq!(format_reg_output(&report, false).expect("text"), "-1");
}

#[test]
fn register_report_rejects_bad_size() {
    let err = register_report(
        "1",
        RegisterFormat::Hexadecimal,
        RegisterFormat::Hexadecimal,
        RegisterKind::Integer,
        0,
        false,
    )
    .expect_err("size 0");
    assert!(err.to_string().contains("between 1 and 16"));
}

#[test]
fn register_report_json_lists_views() {
    let report = register_report(
        "0102",
        RegisterFormat::Hexadecimal,
        RegisterFormat::Hexadecimal,
        RegisterKind::Integer,
        2,
        true,
    )
    .expect("report");
    assert!(!report.views.is_empty());
    let json: Value =
        serde_json::from_str(&format_reg_output(&report, true).expect("json")).expect("parse");
    assert_eq!(json["text"], "0102");
    assert_eq!(json["kind"], "integer");
    assert!(json["views"].as_array().is_some_and(|views| !views.is_empty()));
}

#[test]
fn prepare_state_starts_unmodified() {
    let config = Config::default();
    let state = prepare_state("a\nb\nc\n", &config, 2, &[1, 40], 1);
    assert_eq!(state.cursor(), 2);
    assert_eq!(state.folded_lines(), vec![1]);
    assert_eq!(state.scroll_line(), 1);
    assert!(!state.is_modified());
}

#[test]
fn run_sync_reports_cursor_and_text() {
    let dir = TempDir::new().expect("tempdir");
    let (old, new) = write_pair(&dir, "abc\ndef\n", "abcX\ndef\n");
    let report = run_sync(&old, &new, 5, &[], 0, false, &Config::default()).expect("sync");
    assert!(report.outcome.changed);
    assert_eq!(report.outcome.cursor, 6);
    assert_eq!(report.text, "abcX\ndef\n");

    let summary = format_sync_output(&report, false, false).expect("text");
    assert!(summary.contains("cursor: 6"));
    let json: Value =
        serde_json::from_str(&format_sync_output(&report, true, false).expect("json"))
            .expect("parse");
    assert_eq!(json["cursor"], 6);
    assert_eq!(json["changed"], true);
}

#[test]
fn run_sync_background_matches_direct_path() {
    let dir = TempDir::new().expect("tempdir");
    let (old, new) = write_pair(&dir, "a\nb\nc\nd\n", "a\nc\nd\n");
    let config = Config::default();
    let direct = run_sync(&old, &new, 0, &[3], 0, false, &config).expect("direct");
    let background = run_sync(&old, &new, 0, &[3], 0, true, &config).expect("background");
    assert_eq!(direct.text, background.text);
    assert_eq!(background.outcome.folded_lines, vec![2]);
}

#[test]
fn run_sync_unchanged_prints_text_on_request() {
    let dir = TempDir::new().expect("tempdir");
    let (old, new) = write_pair(&dir, "same\n", "same\n");
    let report = run_sync(&old, &new, 0, &[], 0, false, &Config::default()).expect("sync");
    assert!(!report.outcome.changed);
    assert_eq!(
        format_sync_output(&report, false, true).expect("text"),
        "unchanged\nsame\n"
    );
}

#[test]
fn run_sync_missing_file_names_path() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.rs");
    let err = run_sync(&missing, &missing, 0, &[], 0, false, &Config::default())
        .expect_err("missing");
    assert!(format!("{:#}", err).contains("missing.rs"));
}

#[test]
fn default_log_filter_names_every_crate() {
    let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).expect("filter");
    let rendered = filter.to_string();
    for target in ["codebench_core", "codebench_editor", "codebench_cli"] {
        assert!(
            DEFAULT_LOG_FILTER
                .split(',')
                .any(|directive| directive.starts_with(&format!("{target}="))),
            "missing {target} in {rendered}"
        );
    }
}
