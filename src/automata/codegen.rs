//! Minimized DFA → scanner source code.
//!
//! Emits a standalone Rust program (plain `std`, no dependencies) that
//! tokenizes an input file with maximal munch over the DFA:
//!
//! - one `const` per declared token, value = declaration index,
//! - `fn lex(input: &[u8], pos: &mut usize) -> i32`: walks the transition
//!   `match`, remembers the last accepting state and offset, rewinds to it on
//!   a dead byte or end of input, and dispatches the accepting state's action
//!   text; returns `-1` when nothing matched,
//! - `fn main()`: `scanner <input-file> <output-file>`, writes the returned
//!   codes space-separated with a terminating newline.
//!
//! The transition `match` has an arm for every DFA state, and the dispatch
//! `match` an arm for every accepting state, so every rule's action is
//! reachable in the emitted text. Output is deterministic: states ascend,
//! bytes ascend, token constants follow declaration order.
//!
//! Code is built as one pre-sized `String` through small writer functions;
//! the pipeline validates the result by parsing it into a
//! `proc_macro2::TokenStream` once at the end.

use std::fmt::Write;

use super::{Dfa, StateId, DEAD_STATE};

/// Generate the complete scanner program for a minimized DFA.
///
/// `tokens` are the declared token names in order; their indices are the
/// codes the emitted constants expose.
pub fn emit_scanner(dfa: &Dfa, tokens: &[String]) -> String {
    let estimated = 2048 + dfa.states.len() * 96 + tokens.len() * 24;
    let mut buf = String::with_capacity(estimated);

    buf.push_str("// Generated scanner. Do not edit.\n\n");
    write_token_consts(&mut buf, tokens);
    write_lex_fn(&mut buf, dfa);
    write_main_fn(&mut buf);

    buf
}

/// One `const` per token: `const NAME: i32 = code;`
fn write_token_consts(buf: &mut String, tokens: &[String]) {
    for (code, name) in tokens.iter().enumerate() {
        writeln!(buf, "#[allow(dead_code)]\nconst {name}: i32 = {code};").unwrap();
    }
    if !tokens.is_empty() {
        buf.push('\n');
    }
}

/// The ids of all accepting states, ascending.
fn accepting_states(dfa: &Dfa) -> Vec<StateId> {
    dfa.states
        .iter()
        .enumerate()
        .filter(|(_, state)| state.accept.is_some())
        .map(|(id, _)| id as StateId)
        .collect()
}

/// The maximal-munch `lex` function.
fn write_lex_fn(buf: &mut String, dfa: &Dfa) {
    let accepting = accepting_states(dfa);

    buf.push_str("fn lex(input: &[u8], pos: &mut usize) -> i32 {\n");
    writeln!(buf, "    let mut state: u32 = {};", dfa.start).unwrap();
    buf.push_str("    let mut last_state: u32 = u32::MAX;\n");
    buf.push_str("    let mut last_pos: usize = *pos;\n");
    buf.push_str("    while *pos < input.len() {\n");
    buf.push_str("        let next: u32 = match state {\n");
    write_transition_arms(buf, dfa);
    buf.push_str("            _ => u32::MAX,\n");
    buf.push_str("        };\n");
    buf.push_str("        if next == u32::MAX {\n");
    buf.push_str("            break;\n");
    buf.push_str("        }\n");
    buf.push_str("        state = next;\n");
    buf.push_str("        *pos += 1;\n");
    if !accepting.is_empty() {
        write!(buf, "        if matches!(state, ").unwrap();
        for (i, id) in accepting.iter().enumerate() {
            if i > 0 {
                buf.push_str(" | ");
            }
            write!(buf, "{id}").unwrap();
        }
        buf.push_str(") {\n");
        buf.push_str("            last_state = state;\n");
        buf.push_str("            last_pos = *pos;\n");
        buf.push_str("        }\n");
    }
    buf.push_str("    }\n");
    buf.push_str("    *pos = last_pos;\n");
    if !accepting.is_empty() {
        buf.push_str("    match last_state {\n");
        write_action_arms(buf, dfa);
        buf.push_str("        _ => {}\n");
        buf.push_str("    }\n");
    }
    buf.push_str("    -1\n");
    buf.push_str("}\n\n");
}

/// One arm per DFA state: `id => match input[*pos] { byte => target, ... }`.
/// States without live transitions still get an arm so the state switch is
/// exhaustive over the DFA.
fn write_transition_arms(buf: &mut String, dfa: &Dfa) {
    for (id, state) in dfa.states.iter().enumerate() {
        let live: Vec<(usize, StateId)> = state
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, &target)| target != DEAD_STATE)
            .map(|(byte, &target)| (byte, target))
            .collect();

        if live.is_empty() {
            writeln!(buf, "            {id} => u32::MAX,").unwrap();
            continue;
        }

        writeln!(buf, "            {id} => match input[*pos] {{").unwrap();
        for (byte, target) in live {
            writeln!(buf, "                {byte} => {target},").unwrap();
        }
        buf.push_str("                _ => u32::MAX,\n");
        buf.push_str("            },\n");
    }
}

/// One arm per accepting state, inlining the rule's action text verbatim.
fn write_action_arms(buf: &mut String, dfa: &Dfa) {
    for (id, state) in dfa.states.iter().enumerate() {
        if let Some(tag) = &state.accept {
            writeln!(buf, "        {id} => {{ {} }}", tag.action).unwrap();
        }
    }
}

/// The driver: read the input file, call `lex` until it gives up, write the
/// codes to the output file.
fn write_main_fn(buf: &mut String) {
    buf.push_str(
        "fn main() {\n\
         \x20   let args: Vec<String> = std::env::args().collect();\n\
         \x20   if args.len() != 3 {\n\
         \x20       eprintln!(\"Usage: {} <input-file> <output-file>\", args[0]);\n\
         \x20       std::process::exit(1);\n\
         \x20   }\n\
         \x20   let input = match std::fs::read(&args[1]) {\n\
         \x20       Ok(data) => data,\n\
         \x20       Err(error) => {\n\
         \x20           eprintln!(\"cannot read {}: {}\", args[1], error);\n\
         \x20           std::process::exit(1);\n\
         \x20       }\n\
         \x20   };\n\
         \x20   let mut output = String::new();\n\
         \x20   let mut pos: usize = 0;\n\
         \x20   while pos < input.len() {\n\
         \x20       let code = lex(&input, &mut pos);\n\
         \x20       if code == -1 {\n\
         \x20           break;\n\
         \x20       }\n\
         \x20       output.push_str(&code.to_string());\n\
         \x20       output.push(' ');\n\
         \x20   }\n\
         \x20   output.push('\\n');\n\
         \x20   if let Err(error) = std::fs::write(&args[2], output) {\n\
         \x20       eprintln!(\"cannot write {}: {}\", args[2], error);\n\
         \x20       std::process::exit(1);\n\
         \x20   }\n\
         }\n",
    );
}
