/*!
The line-oriented protocol spoken by the `kleene` binary.

The first non-blank line of the input is the pattern. Every following line,
up to the next blank line or the end of the input, is an expression to test.
For each expression one line is written: `yes` if the pattern accepts it and
`no` otherwise, in input order.
*/

use std::io::{self, BufRead, Write};

use crate::{InvalidPattern, Regex, RegexBuilder};

/// Errors that stop the harness
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The input ended before a pattern line was found
    #[error("no pattern found in input")]
    MissingPattern,
    /// The pattern did not compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] InvalidPattern),
    /// Reading the input or writing the answers failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Counts of the answers written by [`run`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Expressions answered with `yes`
    pub accepted: usize,
    /// Expressions answered with `no`
    pub rejected: usize,
}

/// Read a pattern and expressions from `input` and write one answer per
/// expression to `output`.
///
/// `builder` supplies every option except the pattern, which is taken from
/// the input.
pub fn run<R: BufRead, W: Write>(
    builder: &RegexBuilder,
    input: R,
    mut output: W,
) -> Result<Summary, HarnessError> {
    let mut lines = input.lines();

    let pattern = loop {
        match lines.next() {
            None => return Err(HarnessError::MissingPattern),
            Some(line) => {
                let line = line?;
                if !is_blank(&line) {
                    break line;
                }
            }
        }
    };
    let re: Regex = builder.clone().pattern(pattern.trim()).build()?;

    let mut summary = Summary::default();
    for line in lines {
        let line = line?;
        if is_blank(&line) {
            break;
        }
        if re.is_match(trim_line(&line)) {
            summary.accepted += 1;
            writeln!(output, "yes")?;
        } else {
            summary.rejected += 1;
            writeln!(output, "no")?;
        }
    }
    output.flush()?;

    #[cfg(feature = "logging")]
    log::debug!(
        "answered {} expressions ({} yes, {} no)",
        summary.accepted + summary.rejected,
        summary.accepted,
        summary.rejected
    );
    Ok(summary)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Strip a carriage return left over from CRLF input.
fn trim_line(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
