//! Automata infrastructure for scanner generation.
//!
//! Provides the NFA/DFA types and the compilation stages:
//! `AST list -> NFA -> DFA -> Minimize -> Codegen`
//!
//! State graphs are owned as flat `Vec`s indexed by dense ids, so the logical
//! graph may contain cycles while ownership stays acyclic. Transitions refer
//! to states by id, never by pointer, which also makes minimization's target
//! rewriting straightforward.

pub mod codegen;
pub mod minimize;
pub mod nfa;
pub mod subset;

use crate::MAX_BYTE;

/// Identifier for an automaton state.
pub type StateId = u32;

/// A sentinel value representing a non-existent / dead state.
pub const DEAD_STATE: StateId = u32::MAX;

/// Accept tag: which rule a state accepts for, and the action to run.
///
/// `rule` is the rule's declaration index; a lower index means higher
/// priority. The action text travels with the tag by value so downstream
/// stages never reach back into the specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTag {
    pub rule: usize,
    pub action: String,
}

/// NFA state with labeled and epsilon transitions.
///
/// Labels are byte codes 1..=127; epsilon edges live in their own list, so
/// the reserved code 0 can never appear as a label.
#[derive(Debug, Clone)]
pub struct NfaState {
    /// Labeled transitions: (byte, target state).
    pub transitions: Vec<(u8, StateId)>,
    /// Epsilon transitions: targets reachable without consuming input.
    pub epsilon: Vec<StateId>,
    /// If this is an accepting state, which rule it accepts for.
    pub accept: Option<RuleTag>,
}

impl NfaState {
    /// Create a new non-accepting NFA state with no transitions.
    pub fn new() -> Self {
        NfaState { transitions: Vec::new(), epsilon: Vec::new(), accept: None }
    }
}

impl Default for NfaState {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete NFA. State 0 is the shared start state; `add_state` is the
/// monotonic id allocator, so ids are globally unique across all rules.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: StateId,
}

impl Nfa {
    /// Create a new NFA with a single non-accepting start state.
    pub fn new() -> Self {
        Nfa { states: vec![NfaState::new()], start: 0 }
    }

    /// Add a new state and return its id.
    pub fn add_state(&mut self, state: NfaState) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(state);
        id
    }

    /// Add an epsilon transition from `from` to `to`.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].epsilon.push(to);
    }

    /// Add a labeled transition from `from` to `to` on `byte`.
    pub fn add_transition(&mut self, from: StateId, to: StateId, byte: u8) {
        debug_assert!(byte >= 1 && byte <= MAX_BYTE, "labels must be in 1..=127");
        self.states[from as usize].transitions.push((byte, to));
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

/// DFA state with deterministic transitions.
///
/// Transitions are a dense row indexed by byte: `transitions[byte]` is the
/// target state, or `DEAD_STATE` when no transition exists. Index 0 is always
/// `DEAD_STATE` (code 0 is not in the alphabet).
#[derive(Debug, Clone)]
pub struct DfaState {
    /// Dense transition row: `transitions[byte] = target_state`.
    pub transitions: Vec<StateId>,
    /// If this is an accepting state, which rule it accepts for.
    pub accept: Option<RuleTag>,
}

impl DfaState {
    /// Create a new non-accepting DFA state with all-dead transitions.
    pub fn new() -> Self {
        DfaState {
            transitions: vec![DEAD_STATE; MAX_BYTE as usize + 1],
            accept: None,
        }
    }
}

impl Default for DfaState {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete DFA. State 0 is the start state.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: StateId,
}

impl Dfa {
    /// Create a new DFA with a single non-accepting start state.
    pub fn new() -> Self {
        Dfa { states: vec![DfaState::new()], start: 0 }
    }

    /// Add a new state and return its id.
    pub fn add_state(&mut self, state: DfaState) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(state);
        id
    }

    /// O(1) transition lookup: returns the target state or `DEAD_STATE`.
    #[inline]
    pub fn transition(&self, state: StateId, byte: u8) -> StateId {
        self.states[state as usize].transitions[byte as usize]
    }

    /// Set a transition: `state --byte--> target`.
    #[inline]
    pub fn set_transition(&mut self, state: StateId, byte: u8, target: StateId) {
        self.states[state as usize].transitions[byte as usize] = target;
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

/// An NFA fragment with one designated start and one accept state.
/// Thompson's construction builds the NFA out of these.
#[derive(Debug, Clone, Copy)]
pub struct NfaFragment {
    pub start: StateId,
    pub accept: StateId,
}
