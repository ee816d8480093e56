use crate::nfa::NFA;
use std::collections::HashSet;

/// A matcher that executes a Thompson NFA against input by tracking the set
/// of active states.
///
/// After every consumed symbol the active set is extended with its epsilon
/// closure, so epsilon chains of any length are followed and epsilon cycles
/// are visited once. Matching takes time proportional to the input length
/// times the number of states.
///
/// The matcher borrows the NFA immutably, so any number of matchers can run
/// against the same automaton at once.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'a> {
    nfa: &'a NFA,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a NFA) -> Self {
        Self { nfa }
    }

    /// Check if the entire input is accepted
    pub fn is_match(&self, input: &str) -> bool {
        let mut current = HashSet::new();
        current.insert(self.nfa.start());
        current = self.nfa.epsilon_closure(&current);

        for ch in input.chars() {
            let next = self.nfa.step(&current, ch);
            if next.is_empty() {
                trace!("no transition on {:?}, rejecting", ch);
                return false;
            }
            current = self.nfa.epsilon_closure(&next);
        }

        self.nfa.is_accepting(&current)
    }
}
