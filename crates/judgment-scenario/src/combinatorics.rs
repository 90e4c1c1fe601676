//! Counting multisets.

/// Number of multisets of cardinality `k` drawn from `n` elements.
///
/// Equals C(n+k−1, k). Computed exactly with 128-bit integers; saturates at
/// `u128::MAX` when the true value does not fit.
///
/// ```rust
/// use judgment_scenario::multiset_coefficient;
///
/// assert_eq!(multiset_coefficient(3, 2), 6);
/// assert_eq!(multiset_coefficient(4, 2), 10);
/// ```
pub fn multiset_coefficient(n: usize, k: usize) -> u128 {
    if n == 0 {
        return u128::from(k == 0);
    }
    // C(n+k-1, k) == C(n+k-1, n-1); iterate over the smaller side.
    let top = (n - 1) as u128 + k as u128;
    let steps = k.min(n - 1) as u128;
    let base = top - steps;

    let mut result: u128 = 1;
    for i in 1..=steps {
        // result == C(base + i - 1, i - 1) here, so result * (base + i) / i is exact.
        let factor = base + i;
        result = match result.checked_mul(factor) {
            Some(product) => product / i,
            None => {
                let g = gcd(result, i);
                let reduced = result / g;
                let divisor = i / g;
                match reduced.checked_mul(factor / divisor) {
                    Some(value) => value,
                    None => return u128::MAX,
                }
            }
        };
    }
    result
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_count(n: usize, k: usize) -> u128 {
        // Count nondecreasing sequences of length k over 0..n.
        fn go(start: usize, n: usize, remaining: usize) -> u128 {
            if remaining == 0 {
                return 1;
            }
            (start..n).map(|v| go(v, n, remaining - 1)).sum()
        }
        go(0, n, k)
    }

    #[test]
    fn test_small_values_match_enumeration() {
        for n in 0..6 {
            for k in 0..6 {
                assert_eq!(multiset_coefficient(n, k), literal_count(n, k), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(multiset_coefficient(3, 2), 6);
        assert_eq!(multiset_coefficient(16, 15), 155_117_520);
        assert_eq!(multiset_coefficient(1, 100), 1);
        assert_eq!(multiset_coefficient(100, 1), 100);
    }

    #[test]
    fn test_saturates_on_overflow() {
        assert_eq!(multiset_coefficient(1000, 1000), u128::MAX);
    }
}
