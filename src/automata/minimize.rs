//! DFA minimization by partition refinement.
//!
//! States start out grouped by accept tag: one group per distinct rule
//! index, plus one for the non-accepting states. Accepting states of
//! different rules never merge, so each merged state keeps exactly one
//! action. Groups are then split until every pair of states in a group
//! agrees, byte for byte, on which *group* it transitions into. Since a
//! split can make an already-inspected group splittable again, the sweep
//! repeats until a full pass splits nothing.
//!
//! The rebuilt DFA has one state per group reachable from the start group,
//! with ids assigned in breadth-first order so the new start is state 0.
//! Unreachable groups are dropped.

use std::collections::{BTreeMap, VecDeque};

use super::{Dfa, DfaState, StateId, DEAD_STATE};
use crate::MAX_BYTE;

/// Minimize a DFA, preserving per-state rule tags.
///
/// The result recognizes the same language, returns the same rule index for
/// every accepted string, and contains no two behaviorally equivalent states.
pub fn minimize_dfa(dfa: &Dfa) -> Dfa {
    let n = dfa.states.len();
    if n <= 1 {
        return dfa.clone();
    }

    // Initial partition: one group per accept tag. BTreeMap iteration gives a
    // deterministic group numbering (non-accepting first, then by rule index).
    let mut accept_groups: BTreeMap<Option<usize>, Vec<StateId>> = BTreeMap::new();
    for (id, state) in dfa.states.iter().enumerate() {
        accept_groups
            .entry(state.accept.as_ref().map(|tag| tag.rule))
            .or_default()
            .push(id as StateId);
    }

    let mut partition_of: Vec<usize> = vec![0; n];
    let mut groups: Vec<Vec<StateId>> = Vec::with_capacity(accept_groups.len());
    for (_tag, members) in accept_groups {
        let index = groups.len();
        for &s in &members {
            partition_of[s as usize] = index;
        }
        groups.push(members);
    }

    // Refine to a fixpoint. Each split grows `groups`, and group count is
    // bounded by the state count, so this terminates.
    loop {
        let mut split_any = false;
        for g in 0..groups.len() {
            if groups[g].len() <= 1 {
                continue; // singleton groups are stable by definition
            }

            // Bucket the members by their byte → group transition vector.
            let mut buckets: Vec<(Vec<usize>, Vec<StateId>)> = Vec::new();
            for &s in &groups[g] {
                let sig = move_signature(dfa, s, &partition_of);
                match buckets.iter_mut().find(|(existing, _)| *existing == sig) {
                    Some((_, members)) => members.push(s),
                    None => buckets.push((sig, vec![s])),
                }
            }
            if buckets.len() <= 1 {
                continue;
            }

            split_any = true;
            let mut subgroups = buckets.into_iter().map(|(_, members)| members);
            groups[g] = subgroups.next().expect("split produced at least two buckets");
            for members in subgroups {
                let index = groups.len();
                for &s in &members {
                    partition_of[s as usize] = index;
                }
                groups.push(members);
            }
        }
        if !split_any {
            break;
        }
    }

    // Rebuild: BFS from the start group, allocating new ids on discovery.
    // Transitions are lifted from each group's first member; after
    // refinement all members agree up to group identity.
    let start_group = partition_of[dfa.start as usize];
    let mut new_id_of: Vec<StateId> = vec![DEAD_STATE; groups.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    let mut new_dfa = Dfa::new();
    new_id_of[start_group] = 0;
    new_dfa.states[0].accept = dfa.states[groups[start_group][0] as usize].accept.clone();
    queue.push_back(start_group);

    while let Some(g) = queue.pop_front() {
        let from = new_id_of[g];
        let representative = groups[g][0];
        for byte in 1..=MAX_BYTE {
            let target = dfa.transition(representative, byte);
            if target == DEAD_STATE {
                continue;
            }
            let target_group = partition_of[target as usize];
            let to = if new_id_of[target_group] == DEAD_STATE {
                let mut state = DfaState::new();
                state.accept = dfa.states[groups[target_group][0] as usize].accept.clone();
                let id = new_dfa.add_state(state);
                new_id_of[target_group] = id;
                queue.push_back(target_group);
                id
            } else {
                new_id_of[target_group]
            };
            new_dfa.set_transition(from, byte, to);
        }
    }

    new_dfa
}

/// The byte → group vector used to compare states within a group.
/// Dead transitions map to `usize::MAX`, which no group index can collide
/// with.
fn move_signature(dfa: &Dfa, state: StateId, partition_of: &[usize]) -> Vec<usize> {
    let mut sig = Vec::with_capacity(MAX_BYTE as usize + 1);
    for byte in 0..=MAX_BYTE {
        let target = dfa.transition(state, byte);
        sig.push(if target == DEAD_STATE { usize::MAX } else { partition_of[target as usize] });
    }
    sig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::nfa::build_nfa;
    use crate::automata::subset::subset_construction;
    use crate::automata::RuleTag;
    use crate::regex::parse;

    fn build_pair(patterns: &[&str]) -> (Dfa, Dfa) {
        let rules: Vec<_> = patterns
            .iter()
            .enumerate()
            .map(|(rule, p)| {
                (parse(p).unwrap(), RuleTag { rule, action: format!("return {rule};") })
            })
            .collect();
        let dfa = subset_construction(&build_nfa(&rules));
        let min = minimize_dfa(&dfa);
        (dfa, min)
    }

    fn run(dfa: &Dfa, input: &str) -> Option<usize> {
        let mut state = dfa.start;
        for &byte in input.as_bytes() {
            state = dfa.transition(state, byte);
            if state == DEAD_STATE {
                return None;
            }
        }
        dfa.states[state as usize].accept.as_ref().map(|t| t.rule)
    }

    #[test]
    fn test_never_grows() {
        let (dfa, min) = build_pair(&["if", "[a-z]+", r"\d+"]);
        assert!(min.states.len() <= dfa.states.len());
    }

    #[test]
    fn test_equivalent_tails_merge() {
        // abc and xbc share the equivalent "bc" tail; the subset DFA keeps
        // the two tails apart, minimization must merge them.
        let (dfa, min) = build_pair(&["abc|xbc"]);
        assert!(min.states.len() < dfa.states.len());
        assert_eq!(run(&min, "abc"), Some(0));
        assert_eq!(run(&min, "xbc"), Some(0));
        assert_eq!(run(&min, "ab"), None);
    }

    #[test]
    fn test_preserves_acceptance_and_priority() {
        let (dfa, min) = build_pair(&["if", "[a-z]+"]);
        for input in ["if", "iffy", "i", "x", "zz", "", "if0"] {
            assert_eq!(run(&dfa, input), run(&min, input), "disagreement on {input:?}");
        }
        assert_eq!(run(&min, "if"), Some(0));
    }

    #[test]
    fn test_distinct_rules_never_merge() {
        // Both rules accept a single letter but with different tags; the
        // accepting states must stay apart.
        let (_, min) = build_pair(&["a", "b"]);
        assert_eq!(run(&min, "a"), Some(0));
        assert_eq!(run(&min, "b"), Some(1));
    }

    #[test]
    fn test_no_behaviorally_equal_states_remain() {
        let (_, min) = build_pair(&["abc|xbc", "[a-z]+"]);
        // Compare every pair of minimized states on (tag, transition row).
        for i in 0..min.states.len() {
            for j in (i + 1)..min.states.len() {
                let a = &min.states[i];
                let b = &min.states[j];
                let same_tag = a.accept.as_ref().map(|t| t.rule)
                    == b.accept.as_ref().map(|t| t.rule);
                assert!(
                    !(same_tag && a.transitions == b.transitions),
                    "states {i} and {j} are behaviorally identical"
                );
            }
        }
    }

    #[test]
    fn test_start_is_state_zero() {
        let (_, min) = build_pair(&["a+b"]);
        assert_eq!(min.start, 0);
        assert_eq!(run(&min, "aab"), Some(0));
    }

    #[test]
    fn test_single_state_dfa_unchanged() {
        // a* accepts the empty string, so the whole DFA can collapse hard.
        let (dfa, min) = build_pair(&["a*"]);
        assert_eq!(run(&min, ""), Some(0));
        assert_eq!(run(&min, "aaa"), Some(0));
        assert!(min.states.len() <= dfa.states.len());
    }
}
