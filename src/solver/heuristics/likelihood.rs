//! A probability-weighted guess strategy: prefer the (variable, value)
//! pair that leaves the most ways for its constraints to complete.

use crate::solver::{
    constraint::CardinalityConstraint,
    counting::choose_range,
    heuristics::{Guess, GuessStrategy},
    state::{State, VarId},
};

/// Weighs every Unknown variable by a heuristic likelihood of being True
/// (resp. False) in a solution and guesses the strongest pair first.
///
/// For one constraint, the likelihood that a given Unknown member is True
/// is estimated by supposing the member decided each way and counting,
/// with [`choose_range`], how many assignments of the *other* Unknown
/// members would still satisfy the bounds; the two counts are normalized
/// into a probability. A variable's overall weight is the product of
/// these probabilities over every constraint it belongs to; for a grid
/// problem that is exactly its row probability times its column
/// probability.
///
/// The estimate treats the constraints as independent and behaves as if
/// exactly one solution existed. Neither is true in general; this is a
/// ranking function, not a guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostLikely;

impl<V, C> GuessStrategy<V, C> for MostLikely {
    fn select(&mut self, state: &State<V, C>) -> Option<Guess> {
        let mut best: Option<(f64, Guess)> = None;
        for var in state.unknown_vars() {
            let (p_true, p_false) = weight(state, var);
            for (p, value) in [(p_true, true), (p_false, false)] {
                if best.as_ref().map_or(true, |(strongest, _)| p > *strongest) {
                    best = Some((p, Guess { var, value }));
                }
            }
        }
        best.map(|(_, guess)| guess)
    }
}

/// The product of per-constraint odds for `var` being True resp. False.
/// `var` must be Unknown.
fn weight<V, C>(state: &State<V, C>, var: VarId) -> (f64, f64) {
    let mut p_true = 1.0;
    let mut p_false = 1.0;
    for &constraint in state.owning_constraints(var) {
        if let Some((pt, pf)) = member_odds(state.constraint(constraint)) {
            p_true *= pt;
            p_false *= pf;
        }
    }
    (p_true, p_false)
}

/// For one constraint with at least one Unknown member: the probability
/// that any given Unknown member is True (resp. False), as the fraction
/// of bound-satisfying completions of the remaining Unknowns. `None` when
/// no completion satisfies the bounds either way.
fn member_odds<C>(record: &CardinalityConstraint<C>) -> Option<(f64, f64)> {
    let rest = record.n_unknown().checked_sub(1)? as u64;
    let mut combos = [0u64; 2];
    for (slot, supposed_true) in [(0usize, false), (1usize, true)] {
        let n_true = record.n_true() + supposed_true as usize;
        let lowest = record.min_true().saturating_sub(n_true) as u64;
        let highest = match record.max_true() {
            Some(max) => match max.checked_sub(n_true) {
                Some(room) => (room as u64).min(rest),
                // The supposed value already breaks the upper bound.
                None => continue,
            },
            None => rest,
        };
        combos[slot] = choose_range(rest, lowest, highest);
    }
    let total = combos[0] + combos[1];
    if total == 0 {
        return None;
    }
    Some((
        combos[1] as f64 / total as f64,
        combos[0] as f64 / total as f64,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{heuristics::arbitrary::FirstUnknown, search::Outcome, value::TriBool};

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} !~ {b}");
    }

    #[test]
    fn one_of_three_weights_against_true() {
        let mut state: State = State::new();
        let vars: Vec<_> = (0..3).map(|_| state.new_var(())).collect();
        let constraint = state.new_constraint(1, Some(1), ()).unwrap();
        for &var in &vars {
            state.add_member(constraint, var).unwrap();
        }

        // Two other Unknowns: True leaves C(2,0) = 1 completion, False
        // leaves C(2,1) = 2.
        let (p_true, p_false) = weight(&state, vars[0]);
        approx(p_true, 1.0 / 3.0);
        approx(p_false, 2.0 / 3.0);
    }

    #[test]
    fn products_multiply_across_constraints() {
        let mut state: State = State::new();
        let shared = state.new_var(());
        let others: Vec<_> = (0..4).map(|_| state.new_var(())).collect();

        let row = state.new_constraint(1, Some(1), ()).unwrap();
        state.add_member(row, shared).unwrap();
        state.add_member(row, others[0]).unwrap();
        state.add_member(row, others[1]).unwrap();

        let column = state.new_constraint(1, Some(1), ()).unwrap();
        state.add_member(column, shared).unwrap();
        state.add_member(column, others[2]).unwrap();
        state.add_member(column, others[3]).unwrap();

        let (p_true, p_false) = weight(&state, shared);
        approx(p_true, (1.0 / 3.0) * (1.0 / 3.0));
        approx(p_false, (2.0 / 3.0) * (2.0 / 3.0));
    }

    #[test]
    fn hopeless_constraints_drop_out_of_the_product() {
        let mut state: State = State::new();
        let var = state.new_var(());
        // Needs two Trues but has a single member.
        let hopeless = state.new_constraint(2, Some(2), ()).unwrap();
        state.add_member(hopeless, var).unwrap();

        let (p_true, p_false) = weight(&state, var);
        approx(p_true, 1.0);
        approx(p_false, 1.0);
    }

    /// One of five variables must be True, and each of four "cover"
    /// constraints insists the hub or its spoke is True. The hub being
    /// True is the unique solution, but a default-False first guess on
    /// the hub walks into a contradiction first.
    fn hub_and_spokes() -> (State, VarId, Vec<VarId>) {
        let mut state: State = State::new();
        let hub = state.new_var(());
        let spokes: Vec<_> = (0..4).map(|_| state.new_var(())).collect();

        let one_of_five = state.new_constraint(1, Some(1), ()).unwrap();
        state.add_member(one_of_five, hub).unwrap();
        for &spoke in &spokes {
            state.add_member(one_of_five, spoke).unwrap();
        }
        for &spoke in &spokes {
            let cover = state.new_constraint(1, Some(2), ()).unwrap();
            state.add_member(cover, hub).unwrap();
            state.add_member(cover, spoke).unwrap();
        }
        (state, hub, spokes)
    }

    fn run(state: &mut State, strategy: Box<dyn GuessStrategy<(), ()>>) -> (u64, u64) {
        let mut outcomes = state.outcomes(strategy, false);
        let found = outcomes.first_solution().unwrap();
        assert!(found);
        let stats = outcomes.stats();
        (stats.dead_ends, stats.solutions)
    }

    #[test]
    fn adversarial_case_unique_solution() {
        let (mut state, hub, spokes) = hub_and_spokes();
        let mut outcomes = state.outcomes(Box::new(FirstUnknown::default()), true);
        let mut solutions = 0;
        while let Some(outcome) = outcomes.next() {
            if outcome.unwrap() == Outcome::Solution {
                solutions += 1;
                assert_eq!(outcomes.state().value(hub), TriBool::True);
                for &spoke in &spokes {
                    assert_eq!(outcomes.state().value(spoke), TriBool::False);
                }
            }
        }
        assert_eq!(solutions, 1);
    }

    #[test]
    fn weighting_needs_no_more_backtracks_than_arbitrary() {
        let (mut state, _, _) = hub_and_spokes();
        let (arbitrary_dead_ends, _) = run(&mut state, Box::new(FirstUnknown::default()));

        let (mut state, _, _) = hub_and_spokes();
        let (weighted_dead_ends, _) = run(&mut state, Box::new(MostLikely));

        assert!(weighted_dead_ends <= arbitrary_dead_ends);
        // On this shape the weighted strategy walks straight to the
        // solution while the arbitrary one backtracks at least once.
        assert_eq!(weighted_dead_ends, 0);
        assert!(arbitrary_dead_ends >= 1);
    }
}
