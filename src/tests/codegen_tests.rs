//! Tests for the emitted scanner source: shape, determinism, validity.

use std::io::Cursor;

use crate::pipeline::compile;
use crate::spec::LexSpec;

fn compile_text(text: &str) -> String {
    let spec = LexSpec::read(Cursor::new(text.to_string())).expect("spec should parse");
    compile(&spec).expect("spec should compile").source
}

const KEYWORD_SPEC: &str = "KW ID\n\"if\" {return KW;}\n\"[a-z]+\" {return ID;}\n";

#[test]
fn test_constants_match_declaration_order() {
    let source = compile_text(KEYWORD_SPEC);
    assert!(source.contains("const KW: i32 = 0;"));
    assert!(source.contains("const ID: i32 = 1;"));
}

#[test]
fn test_action_text_inlined() {
    let source = compile_text(KEYWORD_SPEC);
    assert!(source.contains("{ return KW; }"));
    assert!(source.contains("{ return ID; }"));
}

#[test]
fn test_scanner_has_lex_and_main() {
    let source = compile_text(KEYWORD_SPEC);
    assert!(source.contains("fn lex(input: &[u8], pos: &mut usize) -> i32"));
    assert!(source.contains("fn main()"));
    assert!(source.contains("Usage: {} <input-file> <output-file>"));
}

#[test]
fn test_no_match_returns_minus_one() {
    let source = compile_text(KEYWORD_SPEC);
    // The dispatch falls through to -1 when no accepting state was recorded.
    assert!(source.contains("    -1\n}"));
    assert!(source.contains("if code == -1"));
}

#[test]
fn test_byte_dispatch_uses_raw_codes() {
    // 'i' is 105, 'f' is 102; the transition match works on byte values.
    let source = compile_text(KEYWORD_SPEC);
    assert!(source.contains("105 => "));
    assert!(source.contains("102 => "));
}

#[test]
fn test_determinism_across_runs() {
    // Byte-identical emitter output for repeated compilations.
    let first = compile_text(KEYWORD_SPEC);
    for _ in 0..3 {
        assert_eq!(first, compile_text(KEYWORD_SPEC));
    }
}

#[test]
fn test_emitted_source_parses_as_rust() {
    let source = compile_text(
        "NUM OP WS\n\"\\d+\" {return NUM;}\n\"\\x2B|\\x2D|\\x2A\" {return OP;}\n\"\\s+\" {return WS;}\n",
    );
    source
        .parse::<proc_macro2::TokenStream>()
        .expect("emitted scanner should tokenize as Rust");
}

#[test]
fn test_multiline_action_bodies() {
    let source =
        compile_text("A\n\"a\" {let n = 1; if n > 0 { return A; } return -1;}\n");
    assert!(source.contains("let n = 1; if n > 0 { return A; } return -1;"));
    source
        .parse::<proc_macro2::TokenStream>()
        .expect("nested-brace action should still tokenize");
}
