//! Exact combinatorial counting used to rank candidate guesses.
//!
//! Everything here is plain `u64` integer arithmetic. The incremental
//! recurrences divide at points where the quotient is a binomial
//! coefficient, so every division is exact; no floating point is involved.
//! Overflow is not a concern at the problem sizes the engine is used for
//! (well under ~60 members per constraint).

/// The number of ways to choose `k` things out of `n`.
///
/// Returns 0 when `k > n`.
pub fn choose(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    // Symmetry keeps the loop short and the intermediates small.
    let k = k.min(n - k);
    let mut accum = 1u64;
    for i in 1..=k {
        // accum is C(n - k + i - 1, i - 1) here, so this division is exact.
        accum = accum * (n - k + i) / i;
    }
    accum
}

/// The number of subsets of size between `j` and `k` (inclusive) of an
/// `n`-element set: Σ C(n, i) for i in `j..=k`.
///
/// Runs in O(k) arithmetic steps by carrying the binomial term along:
/// `term` starts at C(n, 0) = 1 and steps to C(n, i + 1) via
/// `term * (n - i) / (i + 1)`.
///
/// Returns 0 when `k < j`. Panics when `j > k > n` order is broken the
/// other way, i.e. requires `k <= n`.
pub fn choose_range(n: u64, j: u64, k: u64) -> u64 {
    if k < j {
        return 0;
    }
    assert!(k <= n, "choose_range: k={k} exceeds n={n}");

    let mut term = 1u64;
    let mut total = 0u64;
    for i in 0..k {
        if i >= j {
            total += term;
        }
        term = term * (n - i) / (i + 1);
    }
    total + term
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn choose_slow(n: u64, k: u64) -> u64 {
        // Pascal's triangle, no cleverness.
        if k > n {
            return 0;
        }
        let mut row = vec![1u64];
        for _ in 0..n {
            let mut next = vec![1u64];
            for w in row.windows(2) {
                next.push(w[0] + w[1]);
            }
            next.push(1);
            row = next;
        }
        row[k as usize]
    }

    #[test]
    fn choose_matches_pascal() {
        for n in 0..=20 {
            for k in 0..=n {
                assert_eq!(choose(n, k), choose_slow(n, k), "C({n}, {k})");
            }
            assert_eq!(choose(n, n + 1), 0);
        }
    }

    #[test]
    fn choose_range_matches_brute_force_sum() {
        for n in 0..=20u64 {
            for j in 0..=n {
                for k in j..=n {
                    let expected: u64 = (j..=k).map(|i| choose_slow(n, i)).sum();
                    assert_eq!(choose_range(n, j, k), expected, "n={n} j={j} k={k}");
                }
            }
        }
    }

    #[test]
    fn empty_range_counts_nothing() {
        assert_eq!(choose_range(5, 3, 2), 0);
        assert_eq!(choose_range(0, 0, 0), 1);
    }

    #[test]
    fn full_range_counts_the_power_set() {
        for n in 0..=20u64 {
            assert_eq!(choose_range(n, 0, n), 1u64 << n);
        }
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn k_beyond_n_is_a_caller_bug() {
        choose_range(4, 2, 5);
    }

    proptest! {
        #[test]
        fn prop_choose_range_is_a_sum_of_binomials(n in 0u64..=30, j in 0u64..=30, k in 0u64..=30) {
            prop_assume!(j <= k && k <= n);
            let expected: u64 = (j..=k).map(|i| choose_slow(n, i)).sum();
            prop_assert_eq!(choose_range(n, j, k), expected);
        }
    }
}
