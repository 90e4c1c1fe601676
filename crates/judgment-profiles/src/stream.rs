//! Lazy profile streams.
//!
//! A [`ProfileStream`] yields independent [`Profile`] values following a
//! [`ProfilePlan`]. Nothing is materialised up front apart from the sorted
//! sample ranks in sampled mode.

use std::collections::BTreeSet;

use judgment_scenario::{Judgment, Profile, Scenario};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::combinations::{tally, unrank, CombinationsWithReplacement};
use crate::plan::{ProfilePlan, SamplingMode};

#[derive(Debug)]
enum Source {
    Exhaustive(CombinationsWithReplacement),
    Sampled(std::collections::btree_set::IntoIter<u128>),
    Simulated { remaining: u128 },
}

/// Iterator over the profiles of a plan.
#[derive(Debug)]
pub struct ProfileStream<'a> {
    universe: &'a [Judgment],
    number_voters: usize,
    plan: ProfilePlan,
    rng: StdRng,
    source: Source,
}

impl<'a> ProfileStream<'a> {
    /// Creates a stream over multisets of `number_voters` judgments from `universe`.
    ///
    /// `seed` fixes the random draws of sampled and simulated plans; without
    /// it the generator is seeded from the operating system.
    pub fn new(universe: &'a [Judgment], number_voters: usize, plan: ProfilePlan, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let n = universe.len();
        let source = match plan.mode {
            SamplingMode::Exhaustive => {
                Source::Exhaustive(CombinationsWithReplacement::new(n, number_voters))
            }
            SamplingMode::Sampled => {
                Source::Sampled(sample_ranks(&mut rng, plan.total, plan.iterations).into_iter())
            }
            SamplingMode::Simulated => Source::Simulated {
                remaining: if n == 0 { 0 } else { plan.iterations },
            },
        };
        debug!(
            "profile stream: {} of {} profiles ({}), {} judgments, {} voters",
            plan.iterations, plan.total, plan.mode, n, number_voters
        );
        Self {
            universe,
            number_voters,
            plan,
            rng,
            source,
        }
    }

    /// Stream over the rational judgments of `scenario`.
    pub fn for_scenario(scenario: &'a Scenario, plan: ProfilePlan, seed: Option<u64>) -> Self {
        Self::new(scenario.in_consistent(), scenario.number_voters(), plan, seed)
    }

    /// The plan being followed.
    pub fn plan(&self) -> &ProfilePlan {
        &self.plan
    }

    /// Planned number of profiles.
    pub fn iterations(&self) -> u128 {
        self.plan.iterations
    }

    /// Size of the full profile space.
    pub fn total(&self) -> u128 {
        self.plan.total
    }

    fn simulate(&mut self) -> Profile {
        let n = self.universe.len();
        let mut counts = vec![0usize; n];
        for _ in 0..self.number_voters {
            counts[self.rng.gen_range(0..n)] += 1;
        }
        Profile::from_tally(&counts, self.universe)
    }
}

impl Iterator for ProfileStream<'_> {
    type Item = Profile;

    fn next(&mut self) -> Option<Profile> {
        let n = self.universe.len();
        match &mut self.source {
            Source::Exhaustive(combinations) => {
                let combination = combinations.next()?;
                Some(Profile::from_tally(&tally(&combination, n), self.universe))
            }
            Source::Sampled(ranks) => {
                let rank = ranks.next()?;
                let combination = unrank(rank, n, self.number_voters);
                Some(Profile::from_tally(&tally(&combination, n), self.universe))
            }
            Source::Simulated { remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                Some(self.simulate())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.source {
            Source::Exhaustive(_) => None,
            Source::Sampled(ranks) => Some(ranks.len() as u128),
            Source::Simulated { remaining } => Some(*remaining),
        };
        match remaining.and_then(|r| usize::try_from(r).ok()) {
            Some(r) => (r, Some(r)),
            None => (0, None),
        }
    }
}

/// `amount` distinct ranks from `0..total`, uniformly, in increasing order.
///
/// Floyd's algorithm: one draw per rank and memory proportional to `amount`.
fn sample_ranks(rng: &mut StdRng, total: u128, amount: u128) -> BTreeSet<u128> {
    let amount = amount.min(total);
    let mut chosen = BTreeSet::new();
    for j in (total - amount)..total {
        let candidate = rng.gen_range(0..=j);
        if !chosen.insert(candidate) {
            chosen.insert(j);
        }
    }
    chosen
}
