//! # lexgen: table-driven lexer generator
//!
//! Compiles a lexer specification (a token list plus `"pattern" {action}`
//! rules) into the source text of a standalone Rust scanner that tokenizes
//! an input byte stream with maximal munch over a minimized DFA:
//!
//! ```text
//! spec file ──→ reader ──→ regex parser ──→ Thompson ε-NFA ──→ subset DFA
//!                                                                 │
//!     scanner source ←── emitter ←── partition-refined DFA ←─────┘
//! ```
//!
//! The pipeline is strictly linear: each stage consumes a borrowed handle to
//! its predecessor's output and returns a fresh owned value, so no stage ever
//! mutates upstream state. Compilation is deterministic: the same
//! specification always produces byte-identical scanner source.
//!
//! Rule declaration order is rule priority: when two rules match the same
//! longest prefix, the earlier-declared rule wins.

pub mod automata;
pub mod pipeline;
pub mod regex;
pub mod spec;

#[cfg(test)]
mod tests;

pub use pipeline::{compile, CompileError, Generated, PipelineStats};
pub use regex::{Regex, RegexParseError};
pub use spec::{LexRule, LexSpec, SpecError};

/// Highest byte code in the scanner alphabet.
///
/// The alphabet is 7-bit ASCII codes `1..=127`. Code 0 is reserved: it never
/// labels a transition and never appears in a pattern.
pub const MAX_BYTE: u8 = 127;
