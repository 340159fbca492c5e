//! The backtracking search driver: a lazy, finite sequence of dead-end
//! and solution events over one [`State`].

use tracing::debug;

use crate::{
    error::{Result, SolverError},
    solver::{heuristics::GuessStrategy, state::State, stats::SearchStats},
};

/// One leaf of the search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Some constraint became violated; the driver backtracks.
    DeadEnd,
    /// Every variable is decided and every constraint satisfied. Read the
    /// assignment off [`Outcomes::state`] before pulling the next event.
    Solution,
}

impl Outcome {
    pub fn is_solution(self) -> bool {
        self == Outcome::Solution
    }
}

/// A depth-first search in progress, pulled one event at a time.
///
/// Between pulls the search is parked at the leaf it just reported, so
/// the client can read variable values for a reported solution. Pulling
/// the next event unwinds one frame and carries on; when the driver's own
/// base frame unwinds, the search is exhausted and the state is back to
/// its pre-search assignments.
///
/// The sequence is single-pass: once exhausted it stays exhausted.
pub struct Outcomes<'s, V, C> {
    state: &'s mut State<V, C>,
    strategy: Box<dyn GuessStrategy<V, C> + 's>,
    multi: bool,
    started: bool,
    done: bool,
    stats: SearchStats,
}

impl<V, C> State<V, C> {
    /// Starts a search, returning the lazy event sequence.
    ///
    /// With `multi = false` the sequence ends right after the first
    /// [`Outcome::Solution`]; with `multi = true` it reports every
    /// solution and dead end in depth-first order, guessed branch first.
    pub fn outcomes<'s>(
        &'s mut self,
        strategy: Box<dyn GuessStrategy<V, C> + 's>,
        multi: bool,
    ) -> Outcomes<'s, V, C> {
        Outcomes {
            state: self,
            strategy,
            multi,
            started: false,
            done: false,
            stats: SearchStats::default(),
        }
    }
}

impl<'s, V, C> Outcomes<'s, V, C> {
    pub fn state(&self) -> &State<V, C> {
        self.state
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn into_stats(self) -> SearchStats {
        self.stats
    }

    /// Drives the search until the first solution. Returns whether one
    /// was found; the state is parked on it when true.
    pub fn first_solution(&mut self) -> Result<bool> {
        while let Some(outcome) = self.next() {
            if outcome?.is_solution() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<'s, V, C> Iterator for Outcomes<'s, V, C> {
    type Item = Result<Outcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.state.check_all();
            self.state.push();
        } else if !self.state.pop() || self.state.depth() == 0 {
            // Unwinding the base frame means both branches of every guess
            // have been tried.
            self.done = true;
            return None;
        }

        loop {
            if !self.state.propagate(&mut self.stats) {
                self.stats.dead_ends += 1;
                return Some(Ok(Outcome::DeadEnd));
            }
            if self.state.is_solved() {
                self.stats.solutions += 1;
                if !self.multi {
                    self.done = true;
                }
                return Some(Ok(Outcome::Solution));
            }

            let Some(guess) = self.strategy.select(self.state) else {
                self.done = true;
                return Some(Err(SolverError::NoGuess {
                    unknown: self.state.unknown_count(),
                }
                .into()));
            };
            if !self.state.value(guess.var).is_unknown() {
                self.done = true;
                return Some(Err(SolverError::GuessNotUnknown { var: guess.var }.into()));
            }

            debug!(var = guess.var, value = guess.value, "guess");
            self.stats.guesses += 1;
            // Pre-record the complement in the current frame: unwinding
            // past the boundary below lands on the opposite branch.
            self.state.assign(guess.var, !guess.value);
            self.state.push();
            self.state.assign(guess.var, guess.value);
            self.stats.max_depth = self.stats.max_depth.max(self.state.depth());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::SolverError,
        solver::{
            heuristics::{arbitrary::FirstUnknown, Guess},
            state::VarId,
            value::TriBool,
        },
    };

    fn collect(outcomes: &mut Outcomes<'_, (), ()>) -> Vec<Outcome> {
        let mut events = Vec::new();
        while let Some(outcome) = outcomes.next() {
            events.push(outcome.unwrap());
        }
        events
    }

    #[test]
    fn a_free_variable_has_two_solutions_guessed_branch_first() {
        let mut state: State = State::new();
        let var = state.new_var(());
        let constraint = state.new_constraint(0, Some(1), ()).unwrap();
        state.add_member(constraint, var).unwrap();

        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
        let mut values = Vec::new();
        while let Some(outcome) = outcomes.next() {
            assert_eq!(outcome.unwrap(), Outcome::Solution);
            values.push(outcomes.state().value(var));
        }
        // Default guess is False, so the False branch is reported first.
        assert_eq!(values, vec![TriBool::False, TriBool::True]);

        // Exhausted searches stay exhausted, and the state is rewound.
        assert!(outcomes.next().is_none());
        drop(outcomes);
        assert_eq!(state.value(var), TriBool::Unknown);
    }

    #[test]
    fn exhaustive_count_matches_brute_force() {
        // Four variables, one constraint: between 2 and 3 of them True.
        let mut state: State = State::new();
        let vars: Vec<_> = (0..4).map(|_| state.new_var(())).collect();
        let constraint = state.new_constraint(2, Some(3), ()).unwrap();
        for &var in &vars {
            state.add_member(constraint, var).unwrap();
        }

        let expected = (0u32..16)
            .filter(|bits| (2..=3).contains(&bits.count_ones()))
            .count();
        assert_eq!(expected, 10);

        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
        let mut solutions = 0;
        while let Some(outcome) = outcomes.next() {
            if outcome.unwrap().is_solution() {
                solutions += 1;
                let record = outcomes.state().constraint(constraint);
                assert!((2..=3).contains(&record.n_true()));
                assert_eq!(outcomes.state().unknown_count(), 0);
            }
        }
        assert_eq!(solutions, expected);
        assert_eq!(outcomes.stats().solutions, expected as u64);
    }

    #[test]
    fn single_solution_mode_stops_immediately() {
        let mut state: State = State::new();
        let vars: Vec<_> = (0..3).map(|_| state.new_var(())).collect();
        let constraint = state.new_constraint(1, Some(2), ()).unwrap();
        for &var in &vars {
            state.add_member(constraint, var).unwrap();
        }

        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), false);
        let events = collect(&mut outcomes);
        assert_eq!(events.iter().filter(|e| e.is_solution()).count(), 1);
        assert_eq!(events.last(), Some(&Outcome::Solution));
    }

    #[test]
    fn contradictory_problem_yields_one_dead_end() {
        let mut state: State = State::new();
        let var = state.new_var(());
        let wants_true = state.new_constraint(1, Some(1), ()).unwrap();
        state.add_member(wants_true, var).unwrap();
        let wants_false = state.new_constraint(0, Some(0), ()).unwrap();
        state.add_member(wants_false, var).unwrap();

        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
        let events = collect(&mut outcomes);
        assert_eq!(events, vec![Outcome::DeadEnd]);
    }

    #[test]
    fn pre_seeding_prunes_the_search() {
        // Exactly one of three True, with one variable seeded True: the
        // other two are forced and there is a single solution.
        let mut state: State = State::new();
        let vars: Vec<_> = (0..3).map(|_| state.new_var(())).collect();
        let constraint = state.new_constraint(1, Some(1), ()).unwrap();
        for &var in &vars {
            state.add_member(constraint, var).unwrap();
        }
        assert!(state.set(vars[1], true).unwrap());

        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
        let mut solutions = 0;
        while let Some(outcome) = outcomes.next() {
            if outcome.unwrap().is_solution() {
                solutions += 1;
                assert_eq!(outcomes.state().value(vars[0]), TriBool::False);
                assert_eq!(outcomes.state().value(vars[1]), TriBool::True);
                assert_eq!(outcomes.state().value(vars[2]), TriBool::False);
            }
        }
        assert_eq!(solutions, 1);
        assert_eq!(outcomes.stats().guesses, 0);
    }

    #[test]
    fn a_misbehaving_strategy_is_reported_loudly() {
        struct AlwaysVar(VarId);
        impl<V, C> GuessStrategy<V, C> for AlwaysVar {
            fn select(&mut self, _state: &State<V, C>) -> Option<Guess> {
                Some(Guess {
                    var: self.0,
                    value: true,
                })
            }
        }

        let mut state: State = State::new();
        let decided = state.new_var(());
        let _free = state.new_var(());
        assert!(state.set(decided, true).unwrap());

        let mut outcomes = state.outcomes(Box::new(AlwaysVar(decided)), true);
        let err = outcomes.next().unwrap().unwrap_err();
        assert!(matches!(
            err.inner(),
            SolverError::GuessNotUnknown { var } if *var == decided
        ));
        assert!(outcomes.next().is_none());
    }
}
