//! The smallest possible demo: invite between two and three of four
//! friends, and list every guest list that works.

use clap::Parser;
use quorum::solver::{
    heuristics::arbitrary::FirstUnknown, search::Outcome, state::State, value::TriBool,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Enumerate the ways to invite between 2 and 3 of 4 friends.")]
struct Args {
    /// Guess True first instead of False.
    #[arg(long)]
    guess_true: bool,

    /// Show search progress.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("quorum=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut state: State<&str, ()> = State::new();
    let friends = ["amy", "joe", "sue", "bob"];
    let vars: Vec<_> = friends.iter().map(|name| state.new_var(*name)).collect();

    let invited = state
        .new_constraint(2, Some(3), ())
        .expect("2..=3 are sane bounds");
    for &var in &vars {
        state.add_member(invited, var).expect("each friend added once");
    }

    let mut outcomes = state.outcomes(Box::new(FirstUnknown::new(args.guess_true)), true);
    let mut parties = 0;
    while let Some(outcome) = outcomes.next() {
        let outcome = outcome.expect("the demo problem is well-formed");
        if outcome == Outcome::Solution {
            parties += 1;
            let guest_list: Vec<&str> = vars
                .iter()
                .filter(|&&var| outcomes.state().value(var) == TriBool::True)
                .map(|&var| *outcomes.state().payload(var))
                .collect();
            println!("{}", guest_list.join(", "));
        }
    }
    println!("{parties} guest lists.");
}
