//! A backtracking matcher with a bounded number of consecutive epsilon moves.
//!
//! The search walks the NFA depth first, keeping pending visits on a heap
//! allocated stack. Consuming a symbol resets the epsilon budget, while every
//! epsilon move spends one unit of it, so the search can never stall forever
//! inside the epsilon cycles produced by `*`.
//!
//! This bound is not free:
//!
//! * A string whose only accepting path needs more consecutive epsilon moves
//!   than the budget allows is rejected. No error is reported.
//! * Nothing is memoized. Overlapping paths are explored again and again, so
//!   the running time can grow exponentially with the input. Use
//!   [`Config::step_limit`] when the input is not trusted, or the
//!   [`Matcher`](crate::Matcher), which has neither problem.

use crate::nfa::{StateId, Transition, NFA};

/// The epsilon budget used when none is configured
pub const DEFAULT_EPSILON_BUDGET: usize = 10;

/// Errors reported by [`BoundedBacktracker::try_is_match`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The search visited more states than the configured limit
    #[error("search gave up after {limit} steps")]
    StepLimitExceeded { limit: u64 },
}

/// The configuration used for a bounded backtracker
#[derive(Clone, Debug, Default)]
pub struct Config {
    epsilon_budget: Option<usize>,
    step_limit: Option<Option<u64>>,
}

impl Config {
    /// Return a new default configuration
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the number of epsilon moves allowed between two consumed symbols
    pub fn epsilon_budget(mut self, budget: usize) -> Config {
        self.epsilon_budget = Some(budget);
        self
    }

    /// Cap the total number of states visited by one search. `None`, the
    /// default, means no cap.
    pub fn step_limit(mut self, limit: Option<u64>) -> Config {
        self.step_limit = Some(limit);
        self
    }

    pub fn get_epsilon_budget(&self) -> usize {
        self.epsilon_budget.unwrap_or(DEFAULT_EPSILON_BUDGET)
    }

    pub fn get_step_limit(&self) -> Option<u64> {
        self.step_limit.unwrap_or(None)
    }
}

/// A depth-first matcher bounding consecutive epsilon moves
#[derive(Clone, Debug)]
pub struct BoundedBacktracker<'a> {
    nfa: &'a NFA,
    config: Config,
}

impl<'a> BoundedBacktracker<'a> {
    /// Create a backtracker with the default configuration
    pub fn new(nfa: &'a NFA) -> Self {
        Self {
            nfa,
            config: Config::default(),
        }
    }

    /// Apply the given configuration
    pub fn configure(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Check if the entire input is accepted. Running out of steps counts
    /// as a rejection.
    pub fn is_match(&self, input: &str) -> bool {
        match self.try_is_match(input) {
            Ok(matched) => matched,
            Err(_err) => {
                debug!("treating input as rejected: {}", _err);
                false
            }
        }
    }

    /// Check if the entire input is accepted, reporting an exhausted step
    /// limit as an error
    pub fn try_is_match(&self, input: &str) -> Result<bool, MatchError> {
        let input: Vec<char> = input.chars().collect();
        let mut search = Search {
            nfa: self.nfa,
            input: &input,
            budget: self.config.get_epsilon_budget(),
            steps: 0,
            limit: self.config.get_step_limit(),
            stack: Vec::new(),
        };
        let matched = search.run()?;
        trace!("search finished after {} steps", search.steps);
        Ok(matched)
    }
}

/// A pending visit: a state, the position of the next symbol to consume and
/// the epsilon moves left before that symbol must be consumed.
#[derive(Clone, Copy, Debug)]
struct Frame {
    id: StateId,
    at: usize,
    budget: usize,
}

struct Search<'a> {
    nfa: &'a NFA,
    input: &'a [char],
    /// Budget restored after each consumed symbol
    budget: usize,
    steps: u64,
    limit: Option<u64>,
    /// Visits still to try, the next one on top
    stack: Vec<Frame>,
}

impl<'a> Search<'a> {
    /// Depth first over an explicit stack, so the input length never bounds
    /// the native stack. Children are pushed in reverse so they are popped
    /// in the order a recursive search would try them: symbol transitions
    /// first, then epsilon transitions.
    fn run(&mut self) -> Result<bool, MatchError> {
        let nfa = self.nfa;
        self.stack.push(Frame {
            id: nfa.start(),
            at: 0,
            budget: self.budget,
        });

        while let Some(Frame { id, at, budget }) = self.stack.pop() {
            self.steps += 1;
            if let Some(limit) = self.limit {
                if self.steps > limit {
                    return Err(MatchError::StepLimitExceeded { limit });
                }
            }

            let state = nfa.state(id);
            if at == self.input.len() && state.is_final() {
                return Ok(true);
            }

            if budget > 0 {
                for &next in state.epsilons().iter().rev() {
                    self.stack.push(Frame {
                        id: next,
                        at,
                        budget: budget - 1,
                    });
                }
            }
            if let Some(&symbol) = self.input.get(at) {
                for &next in state.targets(Transition::Symbol(symbol)).iter().rev() {
                    self.stack.push(Frame {
                        id: next,
                        at: at + 1,
                        budget: self.budget,
                    });
                }
            }
        }
        Ok(false)
    }
}
