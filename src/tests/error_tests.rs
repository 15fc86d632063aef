//! Error propagation and message tests across the pipeline.

use std::io::Cursor;

use crate::pipeline::{compile, CompileError};
use crate::regex;
use crate::spec::{LexSpec, SpecError};

fn read_spec(text: &str) -> Result<LexSpec, SpecError> {
    LexSpec::read(Cursor::new(text.to_string()))
}

/* ── Reader errors ─────────────────────────────────────────────────────── */

#[test]
fn test_invalid_line_reports_line_number() {
    let error = read_spec("A\n\"a\" {return A;}\nbroken line\n").unwrap_err();
    match &error {
        SpecError::InvalidLine { line } => assert_eq!(*line, 3),
        other => panic!("expected InvalidLine, got {other:?}"),
    }
    assert!(error.to_string().contains("line 3"));
}

#[test]
fn test_cannot_open_file_names_path() {
    let error = LexSpec::from_file("/no/such/lexgen.spec").unwrap_err();
    assert!(matches!(error, SpecError::CannotOpenFile { .. }));
    assert!(error.to_string().contains("/no/such/lexgen.spec"));
}

/* ── Parser errors through the pipeline ────────────────────────────────── */

#[test]
fn test_bad_pattern_names_rule_index() {
    let spec = read_spec("A B\n\"a\" {return A;}\n\"(b\" {return B;}\n").unwrap();
    let error = compile(&spec).unwrap_err();
    match &error {
        CompileError::Regex { rule, .. } => assert_eq!(*rule, 1),
        other => panic!("expected Regex error, got {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains("rule 1"), "message was: {message}");
    assert!(message.contains("')'"), "message was: {message}");
}

#[test]
fn test_first_bad_rule_aborts_compilation() {
    // Both rules are broken; only the first is reported.
    let spec = read_spec("A B\n\"[\" {return A;}\n\"*\" {return B;}\n").unwrap();
    match compile(&spec).unwrap_err() {
        CompileError::Regex { rule, .. } => assert_eq!(rule, 0),
        other => panic!("expected Regex error, got {other:?}"),
    }
}

#[test]
fn test_out_of_alphabet_escape_rejected() {
    // \xFF is outside the 1..=127 alphabet.
    let spec = read_spec("T\n\"\\xFF\" {return T;}\n").unwrap();
    let error = compile(&spec).unwrap_err();
    assert!(error.to_string().contains("outside the alphabet"), "got: {error}");
}

#[test]
fn test_parse_error_positions_point_into_pattern() {
    let error = regex::parse("ab(cd").unwrap_err();
    assert_eq!(error.position, 5); // reported at the missing ')'
    let error = regex::parse("a[b-").unwrap_err();
    assert!(error.position >= 3);
}

/* ── Emitter errors ────────────────────────────────────────────────────── */

#[test]
fn test_unbalanced_action_fails_emission() {
    // The reader accepts this line (first '{' to last '}'), but the action
    // text itself has a stray brace, so the emitted program cannot tokenize.
    let spec = read_spec("A\n\"a\" {return A; } {\"}\n").unwrap();
    match compile(&spec) {
        Err(CompileError::Emit { message }) => {
            assert!(message.contains("not valid Rust"), "got: {message}");
        },
        other => panic!("expected Emit error, got {other:?}"),
    }
}

/* ── Display formatting ────────────────────────────────────────────────── */

#[test]
fn test_display_names_the_stage() {
    let spec_error: CompileError = SpecError::InvalidLine { line: 7 }.into();
    assert!(spec_error.to_string().starts_with("spec reader:"));

    let regex_error = CompileError::Regex {
        rule: 2,
        source: regex::parse("(").unwrap_err(),
    };
    assert!(regex_error.to_string().starts_with("pattern for rule 2:"));

    let internal = CompileError::Internal("boom".to_string());
    assert!(internal.to_string().starts_with("internal error:"));
}

#[test]
fn test_error_sources_chain() {
    use std::error::Error;

    let error: CompileError = SpecError::InvalidLine { line: 1 }.into();
    assert!(error.source().is_some());

    let error = CompileError::Regex { rule: 0, source: regex::parse("]").unwrap_err() };
    assert!(error.source().is_some());
}
