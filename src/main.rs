use std::io::{self, Write};
use std::process;

use clap::Parser;
use kleene::{backtrack, harness, Alphabet, Engine, RegexBuilder, Unrecognized};

/// Reads a pattern and expressions from stdin, answering `yes` or `no` for
/// each expression.
#[derive(Parser, Debug)]
#[command(name = "kleene", version, about)]
struct Args {
    /// Literal symbols patterns are written in
    #[arg(long, default_value = "abe")]
    alphabet: Alphabet,

    /// Fail on pattern characters that are neither syntax nor symbols
    /// instead of ignoring them
    #[arg(long)]
    strict: bool,

    /// Match with the bounded backtracker, allowing this many consecutive
    /// epsilon moves
    #[arg(long, value_name = "N")]
    epsilon_budget: Option<usize>,

    /// Give up (and answer `no`) after visiting this many states, only with
    /// --epsilon-budget
    #[arg(long, value_name = "N", requires = "epsilon_budget")]
    step_limit: Option<u64>,

    /// Print the compiled automaton to stderr
    #[arg(long)]
    dump: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut builder = RegexBuilder::new("");
    builder.alphabet(args.alphabet.clone());
    if args.strict {
        builder.unrecognized(Unrecognized::Reject);
    }
    if let Some(budget) = args.epsilon_budget {
        let config = backtrack::Config::new()
            .epsilon_budget(budget)
            .step_limit(args.step_limit);
        builder.engine(Engine::Backtrack(config));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = if args.dump {
        let mut input = String::new();
        match io::Read::read_to_string(&mut stdin.lock(), &mut input) {
            Ok(_) => {
                dump(&builder, &input);
                harness::run(&builder, input.as_bytes(), stdout.lock())
            }
            Err(err) => Err(err.into()),
        }
    } else {
        harness::run(&builder, stdin.lock(), stdout.lock())
    };

    match result {
        Ok(summary) => log::info!("{} accepted, {} rejected", summary.accepted, summary.rejected),
        Err(err) => {
            let _ = writeln!(io::stderr(), "kleene: {}", err);
            process::exit(1);
        }
    }
}

/// Write the automaton for the first non-blank line of `input` to stderr.
fn dump(builder: &RegexBuilder, input: &str) {
    let pattern = match input.lines().find(|line| !line.trim().is_empty()) {
        Some(pattern) => pattern.trim(),
        None => return,
    };
    if let Ok(re) = builder.clone().pattern(pattern).build() {
        let _ = writeln!(io::stderr(), "{:?}", re.nfa());
    }
}
