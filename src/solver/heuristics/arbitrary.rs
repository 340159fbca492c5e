//! Strategies that pick a variable without weighing the constraints.

use crate::solver::{
    heuristics::{Guess, GuessStrategy},
    state::State,
};

/// Guesses the configured default value for the lowest-id Unknown
/// variable. Simple, deterministic, and a decent baseline.
///
/// Whether guessing True or False first is faster depends on the problem;
/// sometimes the cautious value wins, sometimes the brash one. The
/// default is False.
#[derive(Debug, Clone, Copy)]
pub struct FirstUnknown {
    pub default_value: bool,
}

impl FirstUnknown {
    pub fn new(default_value: bool) -> Self {
        Self { default_value }
    }
}

impl Default for FirstUnknown {
    fn default() -> Self {
        Self {
            default_value: false,
        }
    }
}

impl<V, C> GuessStrategy<V, C> for FirstUnknown {
    fn select(&mut self, state: &State<V, C>) -> Option<Guess> {
        state.unknown_vars().next().map(|var| Guess {
            var,
            value: self.default_value,
        })
    }
}

/// Guesses the configured default value for a uniformly random Unknown
/// variable. Useful for shaking a search out of pathological variable
/// orderings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUnknown {
    pub default_value: bool,
}

impl<V, C> GuessStrategy<V, C> for RandomUnknown {
    fn select(&mut self, state: &State<V, C>) -> Option<Guess> {
        use rand::seq::IteratorRandom;

        state
            .unknown_vars()
            .choose(&mut rand::thread_rng())
            .map(|var| Guess {
                var,
                value: self.default_value,
            })
    }
}
