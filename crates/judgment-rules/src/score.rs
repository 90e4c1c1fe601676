//! Exact scoring and tie-preserving selection.

use judgment_scenario::{Judgment, Profile};
use num_bigint::BigUint;

use crate::agreement::{AgreementVector, IssueSupport};
use crate::lambda::Lambda;
use crate::rule::{Aggregator, Direction};

/// Aggregate value of one candidate outcome.
///
/// Every candidate of a single rule evaluation carries the same variant, so
/// the derived ordering compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Score {
    /// Integer aggregate: sum, minimum, spread or support tally.
    Count(u64),
    /// Product of agreements scaled by a common power of λ's denominator.
    Product(BigUint),
}

impl Score {
    /// Reduces an agreement vector with `aggregator`.
    ///
    /// [`Aggregator::SupportTally`] is scored from the sum, which it equals;
    /// use [`IssueSupport::tally`] to score it from the profile directly.
    pub fn from_agreements(aggregator: Aggregator, agreements: &AgreementVector, lambda: &Lambda) -> Self {
        match aggregator {
            Aggregator::Sum | Aggregator::SupportTally => Score::Count(agreements.sum()),
            Aggregator::Product => Score::Product(agreements.scaled_product(lambda)),
            Aggregator::Minimum => Score::Count(u64::from(agreements.min())),
            Aggregator::Spread => Score::Count(u64::from(agreements.spread())),
        }
    }
}

/// Scores every candidate against `profile`.
pub fn score_candidates(
    aggregator: Aggregator,
    candidates: &[Judgment],
    profile: &Profile,
    lambda: &Lambda,
) -> Vec<Score> {
    if aggregator == Aggregator::SupportTally {
        let num_issues = candidates.first().map_or(0, Judgment::len);
        let support = IssueSupport::new(profile, num_issues);
        return candidates
            .iter()
            .map(|outcome| Score::Count(support.tally(outcome)))
            .collect();
    }
    candidates
        .iter()
        .map(|outcome| {
            Score::from_agreements(aggregator, &AgreementVector::new(outcome, profile), lambda)
        })
        .collect()
}

/// Indices of every score equal to the extreme in `direction`.
///
/// Ties are kept; the result is in ascending index order.
pub fn select_extremal(scores: &[Score], direction: Direction) -> Vec<usize> {
    let best = match direction {
        Direction::Maximise => scores.iter().max(),
        Direction::Minimise => scores.iter().min(),
    };
    match best {
        Some(best) => scores
            .iter()
            .enumerate()
            .filter(|(_, score)| *score == best)
            .map(|(index, _)| index)
            .collect(),
        None => Vec::new(),
    }
}
