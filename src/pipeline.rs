//! Compilation pipeline: specification → scanner source.
//!
//! Runs the stages strictly in order, each consuming a borrowed handle to
//! its predecessor's output and returning fresh owned output:
//!
//! 1. Parse every rule pattern into an AST
//! 2. Build the unioned ε-NFA (Thompson's construction)
//! 3. Subset construction (NFA → DFA)
//! 4. Minimize the DFA (partition refinement)
//! 5. Emit the scanner source and validate it tokenizes as Rust
//!
//! The first failing stage aborts compilation; nothing is emitted on error.
//! Per-stage state counts are collected into [`PipelineStats`] and logged.

use std::fmt;

use proc_macro2::TokenStream;
use tracing::debug;

use crate::automata::codegen::emit_scanner;
use crate::automata::minimize::minimize_dfa;
use crate::automata::nfa::build_nfa;
use crate::automata::subset::subset_construction;
use crate::automata::{Dfa, RuleTag, DEAD_STATE};
use crate::regex::{self, RegexParseError};
use crate::spec::{LexSpec, SpecError};

/// Per-stage size diagnostics from one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub num_tokens: usize,
    pub num_rules: usize,
    pub num_nfa_states: usize,
    pub num_dfa_states: usize,
    pub num_minimized_states: usize,
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Complete scanner program source text.
    pub source: String,
    pub stats: PipelineStats,
}

/// Error from any pipeline stage. Display names the originating stage.
#[derive(Debug)]
pub enum CompileError {
    /// The specification file was malformed or unreadable.
    Spec(SpecError),
    /// A rule's pattern failed to parse; `rule` is its declaration index.
    Regex { rule: usize, source: RegexParseError },
    /// The emitted scanner does not tokenize as Rust, almost always broken
    /// action text, since everything else the emitter writes is fixed shape.
    Emit { message: String },
    /// An internal invariant was violated; indicates a bug in the generator.
    Internal(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Spec(error) => write!(f, "spec reader: {error}"),
            CompileError::Regex { rule, source } => {
                write!(f, "pattern for rule {rule}: {source}")
            },
            CompileError::Emit { message } => write!(f, "code emitter: {message}"),
            CompileError::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Spec(error) => Some(error),
            CompileError::Regex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SpecError> for CompileError {
    fn from(error: SpecError) -> Self {
        CompileError::Spec(error)
    }
}

/// Compile a specification into scanner source.
///
/// # Errors
///
/// Returns the first stage failure; no partial output is produced.
pub fn compile(spec: &LexSpec) -> Result<Generated, CompileError> {
    let mut rules = Vec::with_capacity(spec.rules.len());
    for (index, rule) in spec.rules.iter().enumerate() {
        let ast = regex::parse(&rule.pattern)
            .map_err(|source| CompileError::Regex { rule: index, source })?;
        rules.push((ast, RuleTag { rule: index, action: rule.action.clone() }));
    }
    debug!(rules = rules.len(), "parsed rule patterns");

    let nfa = build_nfa(&rules);
    debug!(states = nfa.states.len(), "built NFA");

    let dfa = subset_construction(&nfa);
    debug!(states = dfa.states.len(), "built DFA");
    verify_dfa(&dfa)?;

    let min_dfa = minimize_dfa(&dfa);
    debug!(states = min_dfa.states.len(), "minimized DFA");
    verify_dfa(&min_dfa)?;

    let source = emit_scanner(&min_dfa, &spec.tokens);
    source.parse::<TokenStream>().map_err(|error| CompileError::Emit {
        message: format!("generated scanner is not valid Rust (check rule actions): {error}"),
    })?;

    Ok(Generated {
        source,
        stats: PipelineStats {
            num_tokens: spec.tokens.len(),
            num_rules: spec.rules.len(),
            num_nfa_states: nfa.states.len(),
            num_dfa_states: dfa.states.len(),
            num_minimized_states: min_dfa.states.len(),
        },
    })
}

/// Sanity sweep: every transition must target a known state. A violation is
/// a generator bug, never a user error.
fn verify_dfa(dfa: &Dfa) -> Result<(), CompileError> {
    let n = dfa.states.len();
    for (id, state) in dfa.states.iter().enumerate() {
        for &target in &state.transitions {
            if target != DEAD_STATE && target as usize >= n {
                return Err(CompileError::Internal(format!(
                    "transition from state {id} targets unknown state {target}"
                )));
            }
        }
    }
    Ok(())
}
