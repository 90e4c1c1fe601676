//! Statistics over winner sets.
//!
//! ## Quantitative
//!
//! Set sizes and overlaps are integer counts, summed over profiles. The
//! symmetric-difference ratio is taken from the run totals, never as an
//! average of per-profile ratios.
//!
//! ## Qualitative
//!
//! Each winning outcome gets [`OutcomeMeasures`] from its raw (λ = 0)
//! agreement vector. A profile contributes the average over its tied set;
//! the run divides the accumulated sums by the number of completed profiles.
//!
//! ## Zero Effect
//!
//! Whether every outcome of method B treats voters strictly less equally
//! than all outcomes of method A, measured by the spread of agreements
//! around their mean.

use std::ops::AddAssign;

use judgment_rules::AgreementVector;
use judgment_scenario::{Judgment, Profile};
use serde::{Deserialize, Serialize};

/// Agreement statistics of one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMeasures {
    /// Mean agreement.
    pub mean: f64,
    /// Mean absolute deviation from the mean.
    pub mean_deviation: f64,
    /// Population standard deviation.
    pub standard_deviation: f64,
    /// Voters strictly below the mean.
    pub below_mean: usize,
    /// Smallest agreement.
    pub low: u32,
    /// Largest minus smallest agreement.
    pub spread: u32,
}

impl OutcomeMeasures {
    /// Measures an agreement vector. An empty vector measures as all zeros.
    pub fn from_agreements(vector: &AgreementVector) -> Self {
        let entries = vector.entries();
        if entries.is_empty() {
            return Self {
                mean: 0.0,
                mean_deviation: 0.0,
                standard_deviation: 0.0,
                below_mean: 0,
                low: 0,
                spread: 0,
            };
        }
        let n = entries.len() as f64;
        let mean = vector.sum() as f64 / n;
        let mean_deviation = entries.iter().map(|&a| (f64::from(a) - mean).abs()).sum::<f64>() / n;
        let variance = entries
            .iter()
            .map(|&a| (f64::from(a) - mean).powi(2))
            .sum::<f64>()
            / n;
        Self {
            mean,
            mean_deviation,
            standard_deviation: variance.sqrt(),
            below_mean: entries.iter().filter(|&&a| f64::from(a) < mean).count(),
            low: vector.min(),
            spread: vector.spread(),
        }
    }

    /// Measures `outcome` against `profile`.
    pub fn of(outcome: &Judgment, profile: &Profile) -> Self {
        Self::from_agreements(&AgreementVector::new(outcome, profile))
    }

    /// Measures every outcome of a winner list.
    pub fn of_all(outcomes: &[Judgment], profile: &Profile) -> Vec<Self> {
        outcomes.iter().map(|outcome| Self::of(outcome, profile)).collect()
    }
}

/// Qualitative measures averaged over a tied set, or accumulated over profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitativeSummary {
    /// Mean agreement.
    pub mean_agreement: f64,
    /// Mean absolute deviation.
    pub mean_deviation: f64,
    /// Standard deviation.
    pub standard_deviation: f64,
    /// Voters below the mean.
    pub below_mean: f64,
    /// Lowest agreement.
    pub low_agreement: f64,
    /// Spread between best and worst served voter.
    pub spread: f64,
}

impl QualitativeSummary {
    /// Average over a tied set. Empty sets give zeros.
    pub fn average(measures: &[OutcomeMeasures]) -> Self {
        if measures.is_empty() {
            return Self::default();
        }
        let n = measures.len() as f64;
        let mut total = Self::default();
        for m in measures {
            total.mean_agreement += m.mean;
            total.mean_deviation += m.mean_deviation;
            total.standard_deviation += m.standard_deviation;
            total.below_mean += m.below_mean as f64;
            total.low_agreement += f64::from(m.low);
            total.spread += f64::from(m.spread);
        }
        total.divided_by(n)
    }

    /// Every field divided by `divisor`.
    pub fn divided_by(&self, divisor: f64) -> Self {
        Self {
            mean_agreement: self.mean_agreement / divisor,
            mean_deviation: self.mean_deviation / divisor,
            standard_deviation: self.standard_deviation / divisor,
            below_mean: self.below_mean / divisor,
            low_agreement: self.low_agreement / divisor,
            spread: self.spread / divisor,
        }
    }
}

impl AddAssign for QualitativeSummary {
    fn add_assign(&mut self, other: Self) {
        self.mean_agreement += other.mean_agreement;
        self.mean_deviation += other.mean_deviation;
        self.standard_deviation += other.standard_deviation;
        self.below_mean += other.below_mean;
        self.low_agreement += other.low_agreement;
        self.spread += other.spread;
    }
}

/// Size and overlap of two winner index sets for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetComparison {
    /// Winners of method A.
    pub first: usize,
    /// Winners of method B.
    pub second: usize,
    /// Winners shared by both.
    pub overlap: usize,
}

impl SetComparison {
    /// Compares two sorted, duplicate-free index lists.
    pub fn of(first: &[usize], second: &[usize]) -> Self {
        Self {
            first: first.len(),
            second: second.len(),
            overlap: sorted_overlap(first, second),
        }
    }

    /// Both sets are identical.
    pub fn same(&self) -> bool {
        self.first == self.overlap && self.second == self.overlap
    }

    /// The sets share at least one outcome.
    pub fn any_shared(&self) -> bool {
        self.overlap > 0
    }

    /// Outcomes in exactly one of the two sets.
    pub fn symmetric_difference(&self) -> usize {
        self.first + self.second - 2 * self.overlap
    }
}

/// Number of common elements in two sorted lists.
pub fn sorted_overlap(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

/// `(s1 + s2 − 2o) / (s1 + s2 − o)`; `None` when both sets are empty.
pub fn symmetric_difference_ratio(first: u64, second: u64, overlap: u64) -> Option<f64> {
    let union = (first + second).checked_sub(overlap)?;
    if union == 0 {
        return None;
    }
    Some((first + second - 2 * overlap) as f64 / union as f64)
}

/// Run totals of the quantitative measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitativeTotals {
    /// Winners of method A.
    pub sol1: u64,
    /// Winners of method B.
    pub sol2: u64,
    /// Shared winners.
    pub overlap: u64,
    /// Shared winners on profiles with identical sets.
    pub overlap_same: u64,
    /// Shared winners on profiles with differing sets.
    pub overlap_dif: u64,
    /// Profiles with identical sets.
    pub prof_same: u64,
    /// Profiles sharing at least one winner.
    pub prof_1same: u64,
}

impl QuantitativeTotals {
    /// Adds one profile.
    pub fn record(&mut self, comparison: &SetComparison) {
        let overlap = comparison.overlap as u64;
        self.sol1 += comparison.first as u64;
        self.sol2 += comparison.second as u64;
        self.overlap += overlap;
        if comparison.any_shared() {
            self.prof_1same += 1;
        }
        if comparison.same() {
            self.prof_same += 1;
            self.overlap_same += overlap;
        } else {
            self.overlap_dif += overlap;
        }
    }

    /// Symmetric difference over the whole run.
    pub fn symmetric_difference(&self) -> Option<f64> {
        symmetric_difference_ratio(self.sol1, self.sol2, self.overlap)
    }
}

/// Zero effect of one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroEffect {
    /// Share of B-outcomes whose value exceeds every A-outcome's.
    pub dominated_share: f64,
}

impl ZeroEffect {
    /// Compares deviation values of A-outcomes against B-outcomes.
    pub fn compare(first: &[f64], second: &[f64]) -> Self {
        if second.is_empty() {
            return Self { dominated_share: 0.0 };
        }
        let dominated = second
            .iter()
            .filter(|&&b| first.iter().all(|&a| b > a))
            .count();
        Self {
            dominated_share: dominated as f64 / second.len() as f64,
        }
    }

    /// Every B-outcome is strictly worse than all A-outcomes.
    pub fn all_dominated(&self) -> bool {
        self.dominated_share >= 1.0
    }
}

/// Zero-effect accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroEffectTotals {
    /// Profiles where every B-outcome was dominated.
    pub profiles: u64,
    /// Sum of per-profile dominated shares.
    pub weighted: f64,
}

impl ZeroEffectTotals {
    /// Adds one profile.
    pub fn record(&mut self, effect: ZeroEffect) {
        if effect.all_dominated() {
            self.profiles += 1;
        }
        self.weighted += effect.dominated_share;
    }

    /// Final shares over `completed` profiles.
    pub fn finish(&self, completed: u64) -> ZeroEffectReport {
        let completed = completed.max(1) as f64;
        ZeroEffectReport {
            profile_share: self.profiles as f64 / completed,
            outcome_weighted: self.weighted / completed,
        }
    }
}

/// Final zero-effect figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroEffectReport {
    /// Fraction of profiles where every B-outcome is dominated.
    pub profile_share: f64,
    /// Dominated share of B-outcomes, averaged over profiles.
    pub outcome_weighted: f64,
}

/// `numerator / denominator`, `None` for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}
