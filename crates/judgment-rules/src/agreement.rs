//! Agreement vectors and per-issue support.
//!
//! The agreement vector of an outcome has one entry per voter: the number of
//! issues on which the outcome and that voter's judgment coincide. Voters
//! sharing a judgment contribute identical consecutive entries.

use judgment_scenario::{Judgment, Profile};
use num_bigint::BigUint;

use crate::lambda::Lambda;

/// Agreement of one outcome with every voter in a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementVector {
    entries: Vec<u32>,
}

impl AgreementVector {
    /// Computes the vector of `outcome` against `profile`.
    pub fn new(outcome: &Judgment, profile: &Profile) -> Self {
        let mut entries = Vec::with_capacity(profile.number_voters());
        for entry in profile.entries() {
            let agreement = outcome.agreement(&entry.judgment);
            entries.extend(std::iter::repeat(agreement).take(entry.count));
        }
        Self { entries }
    }

    /// Raw integer entries.
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Number of voters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no voters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total agreement.
    pub fn sum(&self) -> u64 {
        self.entries.iter().map(|&a| u64::from(a)).sum()
    }

    /// Smallest entry, 0 when empty.
    pub fn min(&self) -> u32 {
        self.entries.iter().copied().min().unwrap_or(0)
    }

    /// Largest entry, 0 when empty.
    pub fn max(&self) -> u32 {
        self.entries.iter().copied().max().unwrap_or(0)
    }

    /// Largest minus smallest entry.
    pub fn spread(&self) -> u32 {
        self.max() - self.min()
    }

    /// Entries as reals with zero agreement replaced by λ.
    pub fn with_lambda(&self, lambda: f64) -> Vec<f64> {
        self.entries
            .iter()
            .map(|&a| if a == 0 { lambda } else { f64::from(a) })
            .collect()
    }

    /// Product with zeros replaced by λ, scaled by `qⁿ` to stay integral.
    ///
    /// Every non-zero entry contributes `a·q` and every zero entry `p`, where
    /// `λ ≈ p/q`. All outcomes of one profile share `qⁿ`, so comparing the
    /// scaled products compares the real ones exactly.
    pub fn scaled_product(&self, lambda: &Lambda) -> BigUint {
        let q = lambda.denominator();
        let p = lambda.numerator();
        let mut product = BigUint::from(1u32);
        for &a in &self.entries {
            let factor = if a == 0 { p } else { u64::from(a) * q };
            if factor == 0 {
                return BigUint::from(0u32);
            }
            product *= factor;
        }
        product
    }
}

/// How many voters accept each issue, in agenda order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSupport {
    support: Vec<usize>,
    voters: usize,
}

impl IssueSupport {
    /// Tallies acceptance per issue.
    pub fn new(profile: &Profile, num_issues: usize) -> Self {
        let mut support = vec![0usize; num_issues];
        for entry in profile.entries() {
            for (position, &accepted) in entry.judgment.values().iter().enumerate() {
                if accepted {
                    if let Some(slot) = support.get_mut(position) {
                        *slot += entry.count;
                    }
                }
            }
        }
        Self {
            support,
            voters: profile.number_voters(),
        }
    }

    /// Acceptance counts per issue.
    pub fn support(&self) -> &[usize] {
        &self.support
    }

    /// Voters siding with `outcome`, summed over issues.
    ///
    /// An accepted issue scores its supporters, a rejected issue scores the
    /// remaining voters.
    pub fn tally(&self, outcome: &Judgment) -> u64 {
        outcome
            .values()
            .iter()
            .zip(&self.support)
            .map(|(&accepted, &support)| {
                let siding = if accepted { support } else { self.voters - support };
                siding as u64
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use judgment_scenario::ProfileEntry;

    fn j(sig: &str) -> Judgment {
        Judgment::from_signature(sig).unwrap()
    }

    fn profile(entries: &[(usize, &str)]) -> Profile {
        Profile::new(
            entries
                .iter()
                .map(|&(count, sig)| ProfileEntry::new(count, j(sig)))
                .collect(),
        )
    }

    #[test]
    fn test_vector_repeats_by_multiplicity() {
        let p = profile(&[(2, "11"), (1, "00")]);
        let v = AgreementVector::new(&j("10"), &p);
        assert_eq!(v.entries(), &[1, 1, 1]);
        let v = AgreementVector::new(&j("11"), &p);
        assert_eq!(v.entries(), &[2, 2, 0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.sum(), 4);
        assert_eq!(v.min(), 0);
        assert_eq!(v.spread(), 2);
    }

    #[test]
    fn test_entries_bounded_by_issue_count() {
        let p = profile(&[(1, "101"), (3, "010"), (1, "111")]);
        for outcome in ["000", "011", "101", "111"] {
            let v = AgreementVector::new(&j(outcome), &p);
            assert_eq!(v.len(), 5);
            assert!(v.entries().iter().all(|&a| a <= 3));
        }
    }

    #[test]
    fn test_with_lambda_replaces_zero_only() {
        let p = profile(&[(1, "11"), (1, "00")]);
        let v = AgreementVector::new(&j("11"), &p);
        assert_eq!(v.with_lambda(0.1), vec![2.0, 0.1]);
    }

    #[test]
    fn test_scaled_product_zero_handling() {
        let p = profile(&[(1, "11"), (1, "00")]);
        let v = AgreementVector::new(&j("11"), &p);
        assert_eq!(v.scaled_product(&Lambda::zero()), BigUint::from(0u32));
        // λ = 1/10: (2·10)·1 = 20.
        let lambda = Lambda::new(0.1).unwrap();
        assert_eq!(v.scaled_product(&lambda), BigUint::from(20u32));
    }

    #[test]
    fn test_support_tally_equals_total_agreement() {
        let p = profile(&[(2, "110"), (1, "011"), (3, "000")]);
        let support = IssueSupport::new(&p, 3);
        assert_eq!(support.support(), &[2, 3, 1]);
        for outcome in ["000", "110", "011", "111", "101"] {
            let outcome = j(outcome);
            assert_eq!(support.tally(&outcome), AgreementVector::new(&outcome, &p).sum());
        }
    }
}
