//! Spell a given word using letter dice.

use std::{ffi::OsStr, fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use quorum::{
    examples::spelling::{Die, Rule, Shows, SpellingProblem},
    solver::{
        heuristics::{
            arbitrary::{FirstUnknown, RandomUnknown},
            likelihood::MostLikely,
            GuessStrategy,
        },
        search::Outcome,
        stats::render_stats_table,
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Spell a given word using letter dice.")]
struct Args {
    /// File of dice descriptions: "FACES comment" lines, or a JSON array
    /// of {"faces", "comment"} objects when the file ends in .json.
    #[arg(long, value_name = "file", default_value = "demos/kitchen_dice.sort")]
    dice: PathBuf,

    /// Generate as many solutions as possible, not just one.
    #[arg(short, long, visible_alias = "multi")]
    many: bool,

    /// Just output a count of the number of solutions found.
    #[arg(short, long)]
    count: bool,

    /// How to pick the next guess.
    #[arg(long, value_enum, default_value_t = Strategy::Likely)]
    strategy: Strategy,

    /// Print per-constraint search statistics at the end.
    #[arg(long)]
    stats: bool,

    /// Show search progress.
    #[arg(short, long)]
    verbose: bool,

    /// Word to spell out.
    word: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// First Unknown variable, guessing False.
    First,
    /// A random Unknown variable.
    Random,
    /// The probability-weighted guess.
    Likely,
}

fn load_dice(path: &PathBuf) -> Result<Vec<Die>, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    if path.extension() == Some(OsStr::new("json")) {
        serde_json::from_str(&text).map_err(|err| format!("bad dice file: {err}"))
    } else {
        Ok(text.lines().filter_map(Die::from_line).collect())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("quorum=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dice = match load_dice(&args.dice) {
        Ok(dice) => dice,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let mut problem = match SpellingProblem::build(&args.word, &dice) {
        Ok(problem) => problem,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let strategy: Box<dyn GuessStrategy<Shows, Rule>> = match args.strategy {
        Strategy::First => Box::new(FirstUnknown::default()),
        Strategy::Random => Box::new(RandomUnknown::default()),
        Strategy::Likely => Box::new(MostLikely),
    };

    let word = problem.word().to_string();
    let dice_lines: Vec<String> = problem.dice().iter().map(ToString::to_string).collect();

    let mut n_solutions = 0u64;
    let mut n_dead_ends = 0u64;
    let mut outcomes = problem.state_mut().outcomes(strategy, args.many);
    while let Some(outcome) = outcomes.next() {
        match outcome {
            Ok(Outcome::DeadEnd) => n_dead_ends += 1,
            Ok(Outcome::Solution) => {
                n_solutions += 1;
                if !args.count {
                    match SpellingProblem::read_spelling(&word, outcomes.state()) {
                        Ok(spelling) => {
                            for (letter, die) in spelling {
                                println!("{letter} {}", dice_lines[die]);
                            }
                            println!();
                        }
                        Err(err) => {
                            eprintln!("{err}");
                            return ExitCode::FAILURE;
                        }
                    }
                }
            }
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }
    if args.stats {
        println!(
            "{}",
            render_stats_table(outcomes.stats(), outcomes.state())
        );
    }

    if args.count || args.many {
        println!("{n_solutions} solutions.");
    }
    println!("{n_dead_ends} dead ends");
    if n_solutions == 0 {
        eprintln!("No solutions.");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
