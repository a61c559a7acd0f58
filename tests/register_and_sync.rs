use codebench::{
    apply_text, format_now, spawn_format_worker, EditorTextState, FormatCommand, FormatError,
    FormatRequest, PendingFormat, Register, RegisterFile, RegisterFormat, RegisterKind,
    RegisterValue,
};
use crossbeam_channel::bounded;
use std::time::Duration;

fn rustfmt_like(_: &FormatCommand, request: &FormatRequest) -> Result<String, FormatError> {
    Ok(request
        .source
        .lines()
        .map(|line| line.trim_end().replace("){", ") {"))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n")
}

#[test]
fn register_file_tracks_changes_across_stops() {
    let mut file = RegisterFile::new();
    let mut rax = Register::new("rax", 8, RegisterValue::from_u64(0x10));
    rax.reported_type = "int".to_string();
    assert!(!file.update_register(&rax));

    rax.value = RegisterValue::parse("ffffffffffffffff", RegisterFormat::Hexadecimal);
    assert!(file.update_register(&rax));

    let group = file.all_registers().expect("catch-all group");
    let entry = group.entry("rax").expect("rax entry");
    assert_eq!(entry.register.kind, RegisterKind::Integer);
    assert_eq!(entry.register.previous_value, RegisterValue::from_u64(0x10));
    assert_eq!(
        entry
            .register
            .value
            .to_text(RegisterKind::Integer, 8, RegisterFormat::SignedDecimal, false),
        "              -1"
    );
}

#[test]
fn register_edit_round_trips_through_write_back() {
    let mut file = RegisterFile::new();
    let mut reg = Register::new("r8", 8, RegisterValue::from_u64(0));
    reg.reported_type = "int".to_string();
    file.update_register(&reg);

    let group = file
        .group_mut(codebench::constants::ALL_REGISTERS_GROUP)
        .expect("group");
    let entry = group.entry_mut("r8").expect("entry");
    entry.set_format(RegisterFormat::Decimal);
    let write_back = entry.edit("255");
    assert_eq!(write_back, "0x00000000000000ff");
}

#[test]
fn synchronous_format_keeps_folds_and_cursor() {
    let source = "fn a(){   \n    1\n}\nfn b(){\n    2\n}\n";
    let mut state = EditorTextState::new(source);
    state.fold(3);
    let cursor = source.find("2").expect("digit");
    state.set_cursor(cursor);

    let request = FormatRequest::from_state(&state, "lib.rs", None).expect("request");
    let outcome = format_now(
        &mut state,
        &rustfmt_like,
        &FormatCommand::new("rustfmt"),
        &request,
    )
    .expect("format");

    assert_eq!(state.text(), "fn a() {\n    1\n}\nfn b() {\n    2\n}\n");
    assert_eq!(state.folded_lines(), vec![3]);
    assert_eq!(state.text().chars().nth(state.cursor()), Some('2'));
    assert!(outcome.changed);
}

#[test]
fn background_format_is_dropped_after_user_edit() {
    let (gate_tx, gate_rx) = bounded::<()>(0);
    let worker = spawn_format_worker(move |command: &FormatCommand, request: &FormatRequest| {
        let _ = gate_rx.recv();
        rustfmt_like(command, request)
    })
    .expect("spawn");

    let mut state = EditorTextState::new("fn a(){}\n");
    let request = FormatRequest::from_state(&state, "lib.rs", None).expect("request");
    let pending = PendingFormat::begin(&worker, &state, 1, FormatCommand::new("rustfmt"), request)
        .expect("begin");

    state.insert(0, "// note\n");
    pending.note_content_changed();
    gate_tx.send(()).expect("release");

    let err = pending
        .wait(&worker, &mut state, Duration::from_secs(5))
        .expect_err("stale result");
    assert_eq!(err, FormatError::Modified);
    assert_eq!(state.text(), "// note\nfn a(){}\n");
}

#[test]
fn apply_text_is_idempotent() {
    let mut state = EditorTextState::new("x = 1\n");
    let first = apply_text(&mut state, "x = 2\n");
    let second = apply_text(&mut state, "x = 2\n");
    assert!(first.changed);
    assert!(!second.changed);
}
