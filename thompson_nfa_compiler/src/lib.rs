//! Thompson NFA Compiler for Star/Union/Concatenation Patterns
//!
//! This library compiles patterns written over a small, fixed literal alphabet
//! into a Thompson NFA and decides whether strings are accepted by it. The
//! pattern language has exactly four constructs:
//!
//! - a literal symbol of the configured [`Alphabet`] (by default `a`, `b`, `e`)
//! - `(` ... `)` grouping
//! - `|` alternation
//! - postfix `*` (Kleene star)
//!
//! States live in a flat arena owned by the [`NFA`] and refer to each other by
//! [`StateId`], so the epsilon cycles introduced by `*` are plain index pairs.
//!
//! Two matchers are provided:
//!
//! - [`Matcher`] simulates the NFA over sets of states with a proper epsilon
//!   closure. It always terminates and runs in time linear in the input.
//! - [`BoundedBacktracker`] is a recursive matcher that bounds consecutive
//!   epsilon hops by a configurable budget. It rejects strings whose match
//!   needs a longer epsilon chain than the budget allows and can take
//!   exponential time.

#[macro_use]
mod macros;

pub mod alphabet;
pub mod backtrack;
pub mod compiler;
pub mod matcher;
pub mod nfa;

pub use alphabet::{Alphabet, AlphabetError};
pub use backtrack::{BoundedBacktracker, MatchError};
pub use compiler::{Compiler, Unrecognized};
pub use matcher::Matcher;
pub use nfa::{Fragment, State, StateId, Transition, NFA};

/// The result of compiling a pattern to a Thompson NFA
pub type CompileResult<T> = Result<T, InvalidPattern>;

/// Errors that can occur during compilation
///
/// Every offset is a byte offset into the pattern string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPattern {
    /// A `)` without a matching `(`, or a `(` that is never closed
    #[error("unbalanced parentheses at offset {offset}")]
    UnbalancedParentheses { offset: usize },
    /// A `*` or `|` with nothing to apply to
    #[error("operator '{operator}' at offset {offset} has no operand")]
    DanglingOperator { operator: char, offset: usize },
    /// A `()` group with nothing inside
    #[error("empty group at offset {offset}")]
    EmptyGroup { offset: usize },
    /// The pattern contains no literal symbol at all
    #[error("pattern is empty")]
    Empty,
    /// A character that is neither syntax nor part of the alphabet, reported
    /// only when [`Unrecognized::Reject`] is configured
    #[error("unrecognized character {character:?} at offset {offset}")]
    UnrecognizedCharacter { character: char, offset: usize },
}
