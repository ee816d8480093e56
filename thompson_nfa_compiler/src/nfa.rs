use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A state ID in the NFA
pub type StateId = usize;

/// The label on an edge between two states
///
/// Epsilon is its own variant rather than a reserved character, so it can
/// never collide with a literal symbol of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Transition {
    /// Move without consuming input
    Epsilon,
    /// Move by consuming exactly this symbol
    Symbol(char),
}

/// A Thompson NFA state
///
/// Several targets may be registered for the same transition, which is where
/// the nondeterminism comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    is_final: bool,
    transitions: BTreeMap<Transition, Vec<StateId>>,
}

impl State {
    /// Create a state with no outgoing transitions
    pub fn new(is_final: bool) -> Self {
        Self {
            is_final,
            transitions: BTreeMap::new(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Append `target` to the list of states reachable on `on`
    pub fn add_transition(&mut self, on: Transition, target: StateId) {
        self.transitions.entry(on).or_default().push(target);
    }

    /// The states reachable on `on`, in insertion order
    pub fn targets(&self, on: Transition) -> &[StateId] {
        self.transitions.get(&on).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The states reachable without consuming input
    pub fn epsilons(&self) -> &[StateId] {
        self.targets(Transition::Epsilon)
    }

    pub fn has_epsilon(&self) -> bool {
        !self.epsilons().is_empty()
    }

    /// All transitions of this state, epsilon first, then symbols in order
    pub fn transitions(&self) -> impl Iterator<Item = (Transition, &[StateId])> {
        self.transitions.iter().map(|(on, targets)| (*on, targets.as_slice()))
    }
}

/// Fragment of an NFA under construction: an entry state and the states
/// currently marked final. Only used while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub finals: Vec<StateId>,
}

/// A Thompson NFA
///
/// All states are owned by this arena. Finality is a per-state flag; there is
/// no separate list of accepting states.
#[derive(Clone, PartialEq, Eq)]
pub struct NFA {
    states: Vec<State>,
    start: StateId,
}

impl NFA {
    /// Create a new NFA holding a single non-final start state
    pub fn new() -> Self {
        Self {
            states: vec![State::new(false)],
            start: 0,
        }
    }

    /// Add a new state and return its ID
    pub fn add_state(&mut self, is_final: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(is_final));
        id
    }

    /// Connect two states with a transition
    ///
    /// Ignored if either state is not in this NFA, so every stored target
    /// can be looked up.
    pub fn add_transition(&mut self, from: StateId, on: Transition, to: StateId) {
        if from >= self.states.len() || to >= self.states.len() {
            return;
        }
        self.states[from].add_transition(on, to);
    }

    /// Connect two states with an epsilon transition
    pub fn connect(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Transition::Epsilon, to);
    }

    /// Ignored if `id` is not a state of this NFA
    pub fn set_final(&mut self, id: StateId, is_final: bool) {
        if let Some(state) = self.states.get_mut(id) {
            state.is_final = is_final;
        }
    }

    /// Ignored if `id` is not a state of this NFA
    pub fn set_start(&mut self, id: StateId) {
        if id < self.states.len() {
            self.start = id;
        }
    }

    /// Starting state
    pub fn start(&self) -> StateId {
        self.start
    }

    /// # Panics
    ///
    /// If `id` was not returned by [`NFA::add_state`] on this NFA. The start
    /// state and every transition target always satisfy this.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Get epsilon closure of a set of states
    pub fn epsilon_closure(&self, states: &HashSet<StateId>) -> HashSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();

        while let Some(state_id) = stack.pop() {
            for &next in self.states[state_id].epsilons() {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// Every state reachable from `states` by consuming `symbol`
    pub fn step(&self, states: &HashSet<StateId>, symbol: char) -> HashSet<StateId> {
        states
            .iter()
            .flat_map(|&id| self.states[id].targets(Transition::Symbol(symbol)))
            .copied()
            .collect()
    }

    /// Check if any state in the set is final
    pub fn is_accepting(&self, states: &HashSet<StateId>) -> bool {
        states.iter().any(|&id| self.states[id].is_final)
    }
}

impl Default for NFA {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFA(")?;
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { '>' } else { ' ' };
            let fin = if state.is_final { " (final)" } else { "" };
            writeln!(f, "{}{:06}{}", marker, id, fin)?;
            for (on, targets) in state.transitions() {
                match on {
                    Transition::Epsilon => write!(f, "    ε")?,
                    Transition::Symbol(ch) => write!(f, "    '{}'", ch)?,
                }
                writeln!(f, " -> {:?}", targets)?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_transition_appends() {
        let mut state = State::new(false);
        state.add_transition(Transition::Symbol('a'), 3);
        state.add_transition(Transition::Symbol('a'), 1);
        state.add_transition(Transition::Epsilon, 2);

        assert_eq!(state.targets(Transition::Symbol('a')), &[3, 1]);
        assert_eq!(state.epsilons(), &[2]);
        assert!(state.targets(Transition::Symbol('b')).is_empty());
    }

    #[test]
    fn test_literal_e_is_not_epsilon() {
        let mut state = State::new(false);
        state.add_transition(Transition::Symbol('e'), 1);
        assert!(!state.has_epsilon());
    }

    #[test]
    fn test_epsilon_closure_handles_cycles() {
        let mut nfa = NFA::new();
        let a = nfa.add_state(false);
        let b = nfa.add_state(true);
        nfa.connect(nfa.start(), a);
        nfa.connect(a, b);
        nfa.connect(b, a);

        let closure = nfa.epsilon_closure(&[nfa.start()].into_iter().collect());
        assert_eq!(closure.len(), 3);
        assert!(nfa.is_accepting(&closure));
    }

    #[test]
    fn test_step_collects_all_targets() {
        let mut nfa = NFA::new();
        let x = nfa.add_state(false);
        let y = nfa.add_state(true);
        nfa.add_transition(0, Transition::Symbol('a'), x);
        nfa.add_transition(0, Transition::Symbol('a'), y);
        nfa.add_transition(0, Transition::Symbol('b'), y);

        let next = nfa.step(&[0].into_iter().collect(), 'a');
        assert_eq!(next, [x, y].into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn test_unknown_state_ids_are_ignored() {
        let mut nfa = NFA::new();
        let fin = nfa.add_state(true);
        nfa.add_transition(0, Transition::Symbol('a'), 7);
        nfa.add_transition(9, Transition::Symbol('a'), fin);
        nfa.connect(0, 42);
        nfa.set_final(13, true);
        nfa.set_start(5);

        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.start(), 0);
        assert!(nfa.state(0).targets(Transition::Symbol('a')).is_empty());
        assert!(!nfa.state(0).has_epsilon());

        let start: HashSet<StateId> = [nfa.start()].into_iter().collect();
        assert!(nfa.step(&start, 'a').is_empty());
        assert!(!nfa.is_accepting(&nfa.epsilon_closure(&start)));
    }

    #[test]
    fn test_debug_dump_marks_start_and_finals() {
        let mut nfa = NFA::new();
        let f = nfa.add_state(true);
        nfa.add_transition(0, Transition::Symbol('a'), f);

        let dump = format!("{:?}", nfa);
        assert!(dump.contains(">000000"));
        assert!(dump.contains("000001 (final)"));
        assert!(dump.contains("'a' -> [1]"));
    }
}
