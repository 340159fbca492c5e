//! Quorum is a solver for boolean cardinality constraints: rules of the
//! form "at least J and at most K of these variables are True".
//!
//! Variables are tri-state (True, False or [`Unknown`]) and live in a
//! single [`State`] together with the constraints over them. The engine
//! repeatedly makes the assignments the constraints force, and resolves
//! whatever remains by backtracking search over an undo trail, reporting
//! dead ends and solutions lazily as it reaches them. Which variable to
//! branch on, and which value to try first, is a pluggable
//! [`GuessStrategy`].
//!
//! Puzzles plug in from outside: spelling a word with letter dice reduces
//! to building variables and constraints and reading assignments back off
//! reported solutions, and the same goes for piece-packing puzzles.
//!
//! [`Unknown`]: solver::value::TriBool::Unknown
//! [`State`]: solver::state::State
//! [`GuessStrategy`]: solver::heuristics::GuessStrategy
//!
//! # Example: between two and three of four
//!
//! ```
//! use quorum::solver::{heuristics::arbitrary::FirstUnknown, state::State};
//!
//! let mut state: State<&str, ()> = State::new();
//! let friends = ["amy", "joe", "sue", "bob"];
//! let vars: Vec<_> = friends.iter().map(|name| state.new_var(*name)).collect();
//!
//! let invited = state.new_constraint(2, Some(3), ()).unwrap();
//! for &var in &vars {
//!     state.add_member(invited, var).unwrap();
//! }
//!
//! let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
//! let mut parties = 0;
//! while let Some(outcome) = outcomes.next() {
//!     if outcome.unwrap().is_solution() {
//!         parties += 1;
//!     }
//! }
//! // C(4,2) + C(4,3) ways to pick the guest list.
//! assert_eq!(parties, 10);
//! ```

pub mod error;
pub mod examples;
pub mod solver;
