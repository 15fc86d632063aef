//! Thompson's construction: regex ASTs → ε-NFA.
//!
//! Each rule's AST compiles into a fragment with exactly one accept state.
//! `build_nfa` then unions the per-rule fragments under the shared start
//! state with ε-edges, tagging every fragment's accept state with its rule,
//! so one NFA carries every rule and remembers which accept belongs to whom.

use super::{Nfa, NfaFragment, NfaState, RuleTag, StateId};
use crate::regex::Regex;

/// Build the unioned NFA for a whole rule set.
///
/// Rules come in declaration order; each entry pairs the rule's parsed AST
/// with its accept tag. State ids are allocated by the shared `Nfa`, so they
/// are unique across rules.
pub fn build_nfa(rules: &[(Regex, RuleTag)]) -> Nfa {
    let mut nfa = Nfa::new();
    for (ast, tag) in rules {
        let frag = build_fragment(&mut nfa, ast);
        nfa.states[frag.accept as usize].accept = Some(tag.clone());
        nfa.add_epsilon(nfa.start, frag.start);
    }
    nfa
}

/// Compile one AST into an NFA fragment with a single accept state.
pub fn build_fragment(nfa: &mut Nfa, ast: &Regex) -> NfaFragment {
    match ast {
        Regex::Char(byte) => {
            let start = nfa.add_state(NfaState::new());
            let accept = nfa.add_state(NfaState::new());
            nfa.add_transition(start, accept, *byte);
            NfaFragment { start, accept }
        },
        Regex::Or(left, right) => {
            let l = build_fragment(nfa, left);
            let r = build_fragment(nfa, right);
            let start = nfa.add_state(NfaState::new());
            let accept = nfa.add_state(NfaState::new());
            nfa.add_epsilon(start, l.start);
            nfa.add_epsilon(start, r.start);
            nfa.add_epsilon(l.accept, accept);
            nfa.add_epsilon(r.accept, accept);
            NfaFragment { start, accept }
        },
        Regex::Concat(left, right) => {
            let l = build_fragment(nfa, left);
            let r = build_fragment(nfa, right);
            nfa.add_epsilon(l.accept, r.start);
            NfaFragment { start: l.start, accept: r.accept }
        },
        Regex::Star(inner) => {
            let c = build_fragment(nfa, inner);
            let start = nfa.add_state(NfaState::new());
            let accept = nfa.add_state(NfaState::new());
            nfa.add_epsilon(start, c.start);
            nfa.add_epsilon(c.accept, accept);
            nfa.add_epsilon(start, accept);
            nfa.add_epsilon(c.accept, c.start);
            NfaFragment { start, accept }
        },
        Regex::Plus(inner) => {
            // Star without the empty-match shortcut.
            let c = build_fragment(nfa, inner);
            let start = nfa.add_state(NfaState::new());
            let accept = nfa.add_state(NfaState::new());
            nfa.add_epsilon(start, c.start);
            nfa.add_epsilon(c.accept, accept);
            nfa.add_epsilon(c.accept, c.start);
            NfaFragment { start, accept }
        },
        Regex::Question(inner) => {
            // Star without the repeat back-edge.
            let c = build_fragment(nfa, inner);
            let start = nfa.add_state(NfaState::new());
            let accept = nfa.add_state(NfaState::new());
            nfa.add_epsilon(start, c.start);
            nfa.add_epsilon(c.accept, accept);
            nfa.add_epsilon(start, accept);
            NfaFragment { start, accept }
        },
    }
}

/// Compute the epsilon closure of a set of NFA states.
///
/// Returns all states reachable from `states` via zero or more epsilon
/// transitions, sorted and deduplicated.
pub fn epsilon_closure(nfa: &Nfa, states: &[StateId]) -> Vec<StateId> {
    let mut closure: Vec<StateId> = states.to_vec();
    let mut stack: Vec<StateId> = states.to_vec();
    let mut visited = vec![false; nfa.states.len()];

    for &s in states {
        visited[s as usize] = true;
    }

    while let Some(state) = stack.pop() {
        for &target in &nfa.states[state as usize].epsilon {
            if !visited[target as usize] {
                visited[target as usize] = true;
                closure.push(target);
                stack.push(target);
            }
        }
    }

    closure.sort_unstable();
    closure.dedup();
    closure
}
