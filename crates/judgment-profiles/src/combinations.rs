//! Combinations with replacement over `0..n`.
//!
//! A combination is a nondecreasing index sequence of length `k`. Sequences
//! are produced in lexicographic order; rank `r` is the `r`-th sequence in
//! that order.

use judgment_scenario::multiset_coefficient;

/// Lexicographic iterator over all nondecreasing sequences of length `k` over `0..n`.
#[derive(Debug, Clone)]
pub struct CombinationsWithReplacement {
    n: usize,
    current: Option<Vec<usize>>,
}

impl CombinationsWithReplacement {
    /// Starts at `[0; k]`. Empty when `n == 0` and `k > 0`.
    pub fn new(n: usize, k: usize) -> Self {
        let current = if n == 0 && k > 0 { None } else { Some(vec![0; k]) };
        Self { n, current }
    }
}

impl Iterator for CombinationsWithReplacement {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        let result = current.clone();

        // Advance: bump the rightmost position below n-1 and fill to its right.
        let mut next = current;
        if let Some(pos) = next.iter().rposition(|&v| v + 1 < self.n) {
            let value = next[pos] + 1;
            for slot in &mut next[pos..] {
                *slot = value;
            }
            self.current = Some(next);
        }
        Some(result)
    }
}

/// The combination of rank `rank` among `multiset_coefficient(n, k)` in lexicographic order.
///
/// `rank` must be below that count; larger ranks saturate at the last combination.
pub fn unrank(mut rank: u128, n: usize, k: usize) -> Vec<usize> {
    let mut combination = Vec::with_capacity(k);
    let mut value = 0;
    for position in 0..k {
        let remaining = k - position - 1;
        // Combinations starting with `value` here continue over value..n.
        while value + 1 < n {
            let block = multiset_coefficient(n - value, remaining);
            if rank < block {
                break;
            }
            rank -= block;
            value += 1;
        }
        combination.push(value);
    }
    combination
}

/// Lexicographic rank of a nondecreasing sequence over `0..n`.
pub fn rank(combination: &[usize], n: usize) -> u128 {
    let k = combination.len();
    let mut rank = 0u128;
    let mut value = 0;
    for (position, &target) in combination.iter().enumerate() {
        let remaining = k - position - 1;
        while value < target {
            rank += multiset_coefficient(n - value, remaining);
            value += 1;
        }
    }
    rank
}

/// Occurrences of each index in `combination`.
pub fn tally(combination: &[usize], n: usize) -> Vec<usize> {
    let mut counts = vec![0; n];
    for &index in combination {
        if let Some(count) = counts.get_mut(index) {
            *count += 1;
        }
    }
    counts
}
