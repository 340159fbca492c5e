//! Pluggable strategies for choosing which Unknown variable to branch on
//! next, and which value to try first.

pub mod arbitrary;
pub mod likelihood;

use crate::solver::state::{State, VarId};

/// A branching decision: try `value` for `var` first; the search driver
/// tries the opposite branch automatically on backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    pub var: VarId,
    pub value: bool,
}

/// A guess-selection strategy.
///
/// `select` is called only when at least one variable is Unknown, and
/// must return a guess about an Unknown variable. A good strategy can
/// dramatically reduce the number of dead ends visited.
pub trait GuessStrategy<V, C> {
    fn select(&mut self, state: &State<V, C>) -> Option<Guess>;
}
