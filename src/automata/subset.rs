//! Subset construction: ε-NFA → DFA.
//!
//! Standard powerset construction:
//! 1. The ε-closure of the NFA start becomes DFA state 0.
//! 2. For each unprocessed DFA state and each byte 1..=127, the ε-closure of
//!    the move set becomes (or maps to) a DFA state.
//! 3. A DFA state whose subset intersects the NFA accepting set inherits the
//!    tag of the *lowest* rule index in the subset; earlier-declared rules
//!    win ties.
//!
//! Subsets are identified by set equality through a hash map, and the
//! worklist is FIFO, so DFA ids come out in breadth-first order and the whole
//! construction is deterministic.

use std::collections::{HashMap, VecDeque};

use super::{nfa::epsilon_closure, Dfa, DfaState, Nfa, RuleTag, StateId};
use crate::MAX_BYTE;

/// Convert an NFA to a DFA using subset construction.
///
/// Every produced DFA state is reachable from state 0, no two DFA states
/// represent the same NFA subset, and each accepting state carries exactly
/// one rule tag.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::new();

    // Map from sorted NFA subset → DFA state id.
    let mut subset_ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut worklist: VecDeque<Vec<StateId>> = VecDeque::new();

    let start_set = epsilon_closure(nfa, &[nfa.start]);
    dfa.states[0].accept = resolve_accept(nfa, &start_set);
    subset_ids.insert(start_set.clone(), 0);
    worklist.push_back(start_set);

    while let Some(current_set) = worklist.pop_front() {
        let current_id = subset_ids[&current_set];

        for byte in 1..=MAX_BYTE {
            // move(current_set, byte): direct successors on this byte.
            let mut target_set: Vec<StateId> = Vec::new();
            for &nfa_state in &current_set {
                for &(label, target) in &nfa.states[nfa_state as usize].transitions {
                    if label == byte {
                        target_set.push(target);
                    }
                }
            }
            if target_set.is_empty() {
                continue;
            }
            target_set.sort_unstable();
            target_set.dedup();

            let target_set = epsilon_closure(nfa, &target_set);

            let target_id = match subset_ids.get(&target_set) {
                Some(&existing) => existing,
                None => {
                    let mut state = DfaState::new();
                    state.accept = resolve_accept(nfa, &target_set);
                    let id = dfa.add_state(state);
                    subset_ids.insert(target_set.clone(), id);
                    worklist.push_back(target_set);
                    id
                },
            };

            dfa.set_transition(current_id, byte, target_id);
        }
    }

    dfa
}

/// Resolve the accept tag for a set of NFA states.
///
/// When several NFA states in the set are accepting, the smallest rule index
/// wins. This is where rule priority is decided.
fn resolve_accept(nfa: &Nfa, states: &[StateId]) -> Option<RuleTag> {
    states
        .iter()
        .filter_map(|&s| nfa.states[s as usize].accept.as_ref())
        .min_by_key(|tag| tag.rule)
        .cloned()
}
