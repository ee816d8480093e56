use crate::{
    alphabet::Alphabet,
    nfa::{Fragment, StateId, Transition, NFA},
    CompileResult, InvalidPattern,
};

/// What to do with a pattern character that is neither syntax nor a symbol
/// of the alphabet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unrecognized {
    /// Drop the character. Whitespace and noise are skipped, but so are typos.
    #[default]
    Ignore,
    /// Fail with [`InvalidPattern::UnrecognizedCharacter`]
    Reject,
}

/// The configuration used for compiling a pattern
#[derive(Clone, Debug, Default)]
pub struct Config {
    alphabet: Option<Alphabet>,
    unrecognized: Option<Unrecognized>,
}

impl Config {
    /// Return a new default configuration
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the literal symbols patterns are written in. Defaults to `{a, b, e}`.
    pub fn alphabet(mut self, alphabet: Alphabet) -> Config {
        self.alphabet = Some(alphabet);
        self
    }

    /// Set the policy for characters outside the syntax and the alphabet.
    /// Defaults to [`Unrecognized::Ignore`].
    pub fn unrecognized(mut self, policy: Unrecognized) -> Config {
        self.unrecognized = Some(policy);
        self
    }

    pub fn get_alphabet(&self) -> Alphabet {
        self.alphabet.clone().unwrap_or_default()
    }

    pub fn get_unrecognized(&self) -> Unrecognized {
        self.unrecognized.unwrap_or_default()
    }
}

/// Compiler that converts a pattern string to a Thompson NFA
///
/// The pattern is read once, left to right. Every literal becomes a two-state
/// fragment `join --symbol--> accept`, and fragments are stitched together
/// with epsilon transitions as operators are seen.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the given configuration
    pub fn configure(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Compile a pattern to a Thompson NFA
    pub fn build(&self, pattern: &str) -> CompileResult<NFA> {
        let alphabet = self.config.get_alphabet();
        let unrecognized = self.config.get_unrecognized();
        let mut construction = Construction::new();

        for (offset, ch) in pattern.char_indices() {
            match ch {
                '(' => construction.open(offset),
                ')' => construction.close(offset)?,
                '*' => construction.star(offset)?,
                '|' => construction.union(offset)?,
                ch if alphabet.contains(ch) => construction.literal(ch),
                ch => match unrecognized {
                    Unrecognized::Ignore => {
                        trace!("ignoring {:?} at offset {} in pattern", ch, offset);
                    }
                    Unrecognized::Reject => {
                        return Err(InvalidPattern::UnrecognizedCharacter {
                            character: ch,
                            offset,
                        });
                    }
                },
            }
        }

        let nfa = construction.finish()?;
        debug!("compiled {:?} into an NFA with {} states", pattern, nfa.len());
        Ok(nfa)
    }
}

/// One level of grouping: the root of the pattern or an open `(`
#[derive(Debug)]
struct Frame {
    /// State with an epsilon transition to the start of every alternative
    entry: StateId,
    /// Offset of the `(`, none for the root
    open: Option<usize>,
    /// Alternatives already terminated by `|`
    alternatives: Vec<Fragment>,
    /// Concatenation in the alternative being read
    current: Option<Fragment>,
    /// Offset of the most recent `|`
    pipe: Option<usize>,
}

impl Frame {
    fn new(entry: StateId, open: Option<usize>) -> Self {
        Frame {
            entry,
            open,
            alternatives: Vec::new(),
            current: None,
            pipe: None,
        }
    }

    /// Close the frame into one fragment whose finals are the union of the
    /// finals of all alternatives.
    fn seal(self, nfa: &mut NFA) -> CompileResult<Fragment> {
        let Frame {
            entry,
            open,
            mut alternatives,
            current,
            pipe,
        } = self;

        match (current, pipe, open) {
            (Some(fragment), _, _) => alternatives.push(fragment),
            (None, Some(offset), _) => {
                return Err(InvalidPattern::DanglingOperator {
                    operator: '|',
                    offset,
                })
            }
            (None, None, Some(offset)) => return Err(InvalidPattern::EmptyGroup { offset }),
            (None, None, None) => return Err(InvalidPattern::Empty),
        }

        let mut finals = Vec::new();
        for alternative in alternatives {
            nfa.connect(entry, alternative.start);
            finals.extend(alternative.finals);
        }

        Ok(Fragment {
            start: entry,
            finals,
        })
    }
}

/// Parser state for a single compilation
struct Construction {
    nfa: NFA,
    root: Frame,
    groups: Vec<Frame>,
    /// The fragment `*` applies to: the latest literal, group or starred
    /// fragment of the current alternative
    last: Option<Fragment>,
}

impl Construction {
    fn new() -> Self {
        let nfa = NFA::new();
        let root = Frame::new(nfa.start(), None);
        Construction {
            nfa,
            root,
            groups: Vec::new(),
            last: None,
        }
    }

    fn frame_mut(&mut self) -> &mut Frame {
        match self.groups.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    fn literal(&mut self, symbol: char) {
        let join = self.nfa.add_state(false);
        let accept = self.nfa.add_state(true);
        self.nfa.add_transition(join, Transition::Symbol(symbol), accept);
        self.append(Fragment {
            start: join,
            finals: vec![accept],
        });
    }

    fn open(&mut self, offset: usize) {
        let entry = self.nfa.add_state(false);
        self.groups.push(Frame::new(entry, Some(offset)));
        self.last = None;
    }

    fn close(&mut self, offset: usize) -> CompileResult<()> {
        let frame = match self.groups.pop() {
            Some(frame) => frame,
            None => return Err(InvalidPattern::UnbalancedParentheses { offset }),
        };
        let group = frame.seal(&mut self.nfa)?;
        self.append(group);
        Ok(())
    }

    fn star(&mut self, offset: usize) -> CompileResult<()> {
        let operand = match self.last.take() {
            Some(fragment) => fragment,
            None => {
                return Err(InvalidPattern::DanglingOperator {
                    operator: '*',
                    offset,
                })
            }
        };

        let exit = self.nfa.add_state(true);
        for &fin in &operand.finals {
            self.nfa.set_final(fin, false);
            self.nfa.connect(fin, exit);
        }
        // Loop for repetition, bypass for zero occurrences.
        self.nfa.connect(exit, operand.start);
        self.nfa.connect(operand.start, exit);

        // The operand is always the tail of the current concatenation.
        if let Some(current) = self.frame_mut().current.as_mut() {
            current.finals = vec![exit];
        }
        self.last = Some(Fragment {
            start: operand.start,
            finals: vec![exit],
        });
        Ok(())
    }

    fn union(&mut self, offset: usize) -> CompileResult<()> {
        let frame = self.frame_mut();
        match frame.current.take() {
            Some(fragment) => {
                frame.alternatives.push(fragment);
                frame.pipe = Some(offset);
            }
            None => {
                return Err(InvalidPattern::DanglingOperator {
                    operator: '|',
                    offset,
                })
            }
        }
        self.last = None;
        Ok(())
    }

    /// Concatenate `fragment` onto the current alternative
    fn append(&mut self, fragment: Fragment) {
        let current = match self.frame_mut().current.take() {
            None => fragment.clone(),
            Some(previous) => {
                for &fin in &previous.finals {
                    self.nfa.set_final(fin, false);
                    self.nfa.connect(fin, fragment.start);
                }
                Fragment {
                    start: previous.start,
                    finals: fragment.finals.clone(),
                }
            }
        };
        self.frame_mut().current = Some(current);
        self.last = Some(fragment);
    }

    fn finish(mut self) -> CompileResult<NFA> {
        if let Some(offset) = self.groups.last().and_then(|frame| frame.open) {
            return Err(InvalidPattern::UnbalancedParentheses { offset });
        }
        let root = self.root.seal(&mut self.nfa)?;
        self.nfa.set_start(root.start);
        Ok(self.nfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matcher;

    fn build(pattern: &str) -> CompileResult<NFA> {
        Compiler::new().build(pattern)
    }

    fn finals(nfa: &NFA) -> usize {
        nfa.states().iter().filter(|state| state.is_final()).count()
    }

    #[test]
    fn test_literal_structure() {
        let nfa = build("a").unwrap();
        // root entry, join, accept
        assert_eq!(nfa.len(), 3);
        assert_eq!(finals(&nfa), 1);
        assert_eq!(nfa.state(nfa.start()).epsilons().len(), 1);
    }

    #[test]
    fn test_concatenation_clears_inner_finals() {
        let nfa = build("aba").unwrap();
        assert_eq!(finals(&nfa), 1);
    }

    #[test]
    fn test_alternation_keeps_every_branch_final() {
        let nfa = build("a|b|ab").unwrap();
        assert_eq!(finals(&nfa), 3);
        assert_eq!(nfa.state(nfa.start()).epsilons().len(), 3);
    }

    #[test]
    fn test_star_creates_single_exit() {
        let nfa = build("(a|b)*").unwrap();
        assert_eq!(finals(&nfa), 1);
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match(""));
        assert!(matcher.is_match("abba"));
    }

    #[test]
    fn test_star_after_star() {
        let nfa = build("a**").unwrap();
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match(""));
        assert!(matcher.is_match("aaa"));
        assert!(!matcher.is_match("b"));
    }

    #[test]
    fn test_star_binds_to_last_atom() {
        let nfa = build("ab*").unwrap();
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("a"));
        assert!(matcher.is_match("abbb"));
        assert!(!matcher.is_match("abab"));
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn test_grouped_star_does_not_leak_into_prefix() {
        let nfa = build("a*(b)*").unwrap();
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("aabb"));
        assert!(!matcher.is_match("bab"));
    }

    #[test]
    fn test_nested_groups() {
        let nfa = build("((a|b)(e))*").unwrap();
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("aebe"));
        assert!(!matcher.is_match("ab"));
    }

    #[test]
    fn test_ignored_characters() {
        let nfa = build(" a  b\t* ").unwrap();
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("abbb"));
        assert!(!matcher.is_match("a b"));
    }

    #[test]
    fn test_rejected_characters() {
        let compiler = Compiler::new().configure(Config::new().unrecognized(Unrecognized::Reject));
        assert_eq!(
            compiler.build("ab c").unwrap_err(),
            InvalidPattern::UnrecognizedCharacter {
                character: ' ',
                offset: 2
            }
        );
        assert!(compiler.build("ab").is_ok());
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet = Alphabet::new(['x', 'y']).unwrap();
        let compiler = Compiler::new().configure(Config::new().alphabet(alphabet));
        let nfa = compiler.build("x(y|x)*").unwrap();
        assert!(Matcher::new(&nfa).is_match("xyx"));
        // 'a' is noise under this alphabet.
        assert_eq!(compiler.build("a").unwrap_err(), InvalidPattern::Empty);
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            build("a)").unwrap_err(),
            InvalidPattern::UnbalancedParentheses { offset: 1 }
        );
        assert_eq!(
            build("(a(b)").unwrap_err(),
            InvalidPattern::UnbalancedParentheses { offset: 0 }
        );
        assert_eq!(
            build("a((b)").unwrap_err(),
            InvalidPattern::UnbalancedParentheses { offset: 1 }
        );
    }

    #[test]
    fn test_dangling_operators() {
        assert_eq!(
            build("*a").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '*',
                offset: 0
            }
        );
        assert_eq!(
            build("|a").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '|',
                offset: 0
            }
        );
        assert_eq!(
            build("a|").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '|',
                offset: 1
            }
        );
        assert_eq!(
            build("a|*").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '*',
                offset: 2
            }
        );
        assert_eq!(
            build("a(*b)").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '*',
                offset: 2
            }
        );
        assert_eq!(
            build("(a||b)").unwrap_err(),
            InvalidPattern::DanglingOperator {
                operator: '|',
                offset: 3
            }
        );
    }

    #[test]
    fn test_empty_patterns() {
        assert_eq!(build("").unwrap_err(), InvalidPattern::Empty);
        assert_eq!(build("   ").unwrap_err(), InvalidPattern::Empty);
        assert_eq!(
            build("a()").unwrap_err(),
            InvalidPattern::EmptyGroup { offset: 1 }
        );
    }

    #[test]
    fn test_compiling_twice_is_equivalent() {
        let first = build("(a|b)*a").unwrap();
        let second = build("(a|b)*a").unwrap();
        assert_eq!(first, second);
    }
}
