use std::collections::BTreeSet;

/// Characters with a syntactic meaning in patterns. None of them may be
/// used as a literal symbol.
pub const RESERVED: [char; 4] = ['(', ')', '|', '*'];

/// Errors that can occur while building an [`Alphabet`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    /// No symbol was given
    #[error("alphabet must contain at least one symbol")]
    Empty,
    /// The symbol is pattern syntax
    #[error("{0:?} is reserved pattern syntax and cannot be a literal symbol")]
    Reserved(char),
}

/// The set of literal symbols a pattern may contain.
///
/// Literals are always distinct from the epsilon marker: epsilon is a
/// separate [`Transition`](crate::Transition) variant, so an alphabet may
/// freely contain `e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
}

impl Alphabet {
    /// Build an alphabet from the given symbols. Duplicates are collapsed.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self, AlphabetError> {
        let mut set = BTreeSet::new();
        for ch in symbols {
            if RESERVED.contains(&ch) {
                return Err(AlphabetError::Reserved(ch));
            }
            set.insert(ch);
        }
        if set.is_empty() {
            return Err(AlphabetError::Empty);
        }
        Ok(Self { symbols: set })
    }

    /// Returns true if `ch` is a literal symbol of this alphabet
    pub fn contains(&self, ch: char) -> bool {
        self.symbols.contains(&ch)
    }

    /// Iterate the symbols in ascending order
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}

impl Default for Alphabet {
    /// The `{a, b, e}` alphabet.
    fn default() -> Self {
        Self {
            symbols: ['a', 'b', 'e'].into_iter().collect(),
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::new(s.chars().filter(|ch| !ch.is_whitespace()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.symbols().collect::<String>(), "abe");
        assert!(alphabet.contains('e'));
        assert!(!alphabet.contains('c'));
    }

    #[test]
    fn test_reserved_symbols_rejected() {
        assert_eq!(Alphabet::new("ab*".chars()), Err(AlphabetError::Reserved('*')));
        assert_eq!("(".parse::<Alphabet>(), Err(AlphabetError::Reserved('(')));
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        assert_eq!(Alphabet::new(std::iter::empty()), Err(AlphabetError::Empty));
        assert_eq!(" ".parse::<Alphabet>(), Err(AlphabetError::Empty));
    }

    #[test]
    fn test_duplicates_collapse() {
        let alphabet: Alphabet = "xyxy".parse().unwrap();
        assert_eq!(alphabet.len(), 2);
    }
}
