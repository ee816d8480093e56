/*!
This crate compiles small patterns into nondeterministic finite automata and
decides whether whole strings match them.

A pattern is built from literal symbols of an alphabet (by default `a`, `b`
and `e`), `(` `)` grouping, `|` alternation and the postfix Kleene star `*`.
Any other character in a pattern is ignored unless
[`RegexBuilder::unrecognized`] says otherwise.

# Example

```
use kleene::Regex;

let re = Regex::new("(a|b)*a").unwrap();
assert!(re.is_match("bba"));
assert!(!re.is_match("bbb"));
```

# Matching engines

By default matching simulates the automaton over sets of states, following
epsilon transitions to a fixed point after every symbol. This accepts every
string the pattern describes and runs in linear time.

[`Engine::Backtrack`] selects the recursive matcher instead. It bounds the
number of consecutive epsilon moves by a budget, so it rejects strings whose
match needs a longer epsilon chain, and its running time can be exponential.

```
use kleene::{backtrack, Engine, RegexBuilder};

let re = RegexBuilder::new("aaa*b*a*a")
    .engine(Engine::Backtrack(backtrack::Config::new().epsilon_budget(6)))
    .build()
    .unwrap();
// The final literal is seven epsilon moves away after "aa".
assert!(!re.is_match("aaa"));
```

# Crate features

* **cli** (default) - Builds the `kleene` binary and enables `logging`.
* **logging** - Emits diagnostics through the `log` crate.
*/

#![deny(missing_docs)]

pub use thompson_nfa_compiler::{
    backtrack, compiler::Config as CompilerConfig, Alphabet, AlphabetError, InvalidPattern,
    Unrecognized, NFA,
};

use thompson_nfa_compiler::{BoundedBacktracker, Compiler, Matcher};

pub mod harness;

/// How a compiled [`Regex`] decides whether a string matches
#[derive(Clone, Debug, Default)]
pub enum Engine {
    /// Set-of-states simulation with full epsilon closure
    #[default]
    Closure,
    /// Depth-first search with a bounded epsilon budget
    Backtrack(backtrack::Config),
}

/// A compiled pattern
///
/// The automaton is never mutated after compilation, so a `Regex` can be
/// shared between threads and matched against concurrently.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    nfa: NFA,
    engine: Engine,
}

impl Regex {
    /// Compile a pattern with the default options.
    pub fn new(pattern: &str) -> Result<Regex, InvalidPattern> {
        RegexBuilder::new(pattern).build()
    }

    /// Returns true if the whole `input` is accepted.
    ///
    /// Characters outside the alphabet have no transitions, so any input
    /// containing one is rejected.
    pub fn is_match(&self, input: &str) -> bool {
        match &self.engine {
            Engine::Closure => Matcher::new(&self.nfa).is_match(input),
            Engine::Backtrack(config) => BoundedBacktracker::new(&self.nfa)
                .configure(config.clone())
                .is_match(input),
        }
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The compiled automaton.
    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    /// The engine used by [`Regex::is_match`].
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Configures and compiles a [`Regex`]
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    config: CompilerConfig,
    engine: Engine,
}

impl RegexBuilder {
    /// Start configuring a regex for `pattern`.
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_string(),
            config: CompilerConfig::new(),
            engine: Engine::default(),
        }
    }

    /// Replace the pattern, keeping every other option.
    pub fn pattern(&mut self, pattern: &str) -> &mut RegexBuilder {
        self.pattern = pattern.to_string();
        self
    }

    /// Set the literal alphabet.
    pub fn alphabet(&mut self, alphabet: Alphabet) -> &mut RegexBuilder {
        self.config = self.config.clone().alphabet(alphabet);
        self
    }

    /// Set the policy for pattern characters that are neither syntax nor
    /// alphabet symbols.
    pub fn unrecognized(&mut self, policy: Unrecognized) -> &mut RegexBuilder {
        self.config = self.config.clone().unrecognized(policy);
        self
    }

    /// Select the matching engine.
    pub fn engine(&mut self, engine: Engine) -> &mut RegexBuilder {
        self.engine = engine;
        self
    }

    /// Compile the pattern.
    pub fn build(&self) -> Result<Regex, InvalidPattern> {
        let nfa = Compiler::new()
            .configure(self.config.clone())
            .build(&self.pattern)?;
        Ok(Regex {
            pattern: self.pattern.clone(),
            nfa,
            engine: self.engine.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }

    #[test]
    fn builder_keeps_options_across_patterns() {
        let mut builder = RegexBuilder::new("x");
        builder.alphabet("xy".parse().unwrap());
        let first = builder.build().unwrap();
        let second = builder.pattern("y*").build().unwrap();

        assert!(first.is_match("x"));
        assert!(second.is_match("yyy"));
        assert_eq!(second.as_str(), "y*");
    }
}
