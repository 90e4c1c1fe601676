//! Solver framework.
//!
//! Defines the [`RuleSolver`] trait and the winner types it returns.
//!
//! # Implementors
//!
//! - [`brute_force::BruteForceSolver`]: scores every feasible outcome in process
//! - [`oracle::OracleSolver`]: encodes the problem for an [`oracle::OptimizationOracle`]

pub mod brute_force;
pub mod oracle;

use judgment_scenario::{Judgment, Profile, Scenario};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::rule::Rule;

/// Winners of one rule: indices into the feasible judgments and the judgments themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleWinners {
    /// Ascending indices into `out_consistent`.
    pub indices: Vec<usize>,
    /// Winning outcomes in the same order.
    pub outcomes: Vec<Judgment>,
}

impl RuleWinners {
    /// Resolves indices against the scenario's feasible judgments.
    pub fn from_indices(scenario: &Scenario, indices: Vec<usize>) -> Self {
        let outcomes = resolve(scenario, &indices);
        Self { indices, outcomes }
    }

    /// Number of tied winners.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if there are no winners.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Winners of the four base rules for one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllRulesOutcome {
    /// Kemeny winners.
    pub kemeny: RuleWinners,
    /// Kemeny-Nash winners under the requested λ.
    pub kemeny_nash: RuleWinners,
    /// Maxham winners.
    pub maxham: RuleWinners,
    /// Maxeq winners.
    pub maxeq: RuleWinners,
}

impl AllRulesOutcome {
    /// Winners of `rule`, if it is one of the four base rules.
    ///
    /// `kemnash` and `lamb-kemnash` both map to the Kemeny-Nash component.
    pub fn get(&self, rule: Rule) -> Option<&RuleWinners> {
        match rule {
            Rule::Kemeny | Rule::KemenyOriginal => Some(&self.kemeny),
            Rule::KemenyNash | Rule::LambdaKemenyNash => Some(&self.kemeny_nash),
            Rule::Maxham => Some(&self.maxham),
            Rule::Maxeq => Some(&self.maxeq),
            Rule::AllRules => None,
        }
    }
}

/// Trait for aggregation backends.
///
/// Solvers read the scenario and the profile and never mutate either; a
/// call either returns the complete winner list or an error.
pub trait RuleSolver: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Returns the ascending indices into `out_consistent` of all co-optimal outcomes.
    ///
    /// # Errors
    ///
    /// - [`SolverError::MissingProfile`] if the profile has no voters
    /// - [`SolverError::CompositeRule`] for [`Rule::AllRules`]
    /// - [`SolverError::InvalidLambda`] if λ is not finite and non-negative
    /// - [`SolverError::Scenario`] if the profile does not fit the scenario
    fn solve_indices(
        &self,
        scenario: &Scenario,
        profile: &Profile,
        rule: Rule,
        lambda: f64,
    ) -> Result<Vec<usize>>;

    /// Returns all co-optimal outcomes in `out_consistent` order.
    fn solve(
        &self,
        scenario: &Scenario,
        profile: &Profile,
        rule: Rule,
        lambda: f64,
    ) -> Result<Vec<Judgment>> {
        let indices = self.solve_indices(scenario, profile, rule, lambda)?;
        Ok(resolve(scenario, &indices))
    }

    /// Solves the four base rules, Kemeny-Nash with the given λ.
    fn solve_all(&self, scenario: &Scenario, profile: &Profile, lambda: f64) -> Result<AllRulesOutcome> {
        let kemeny = self.solve_indices(scenario, profile, Rule::Kemeny, lambda)?;
        let kemeny_nash = self.solve_indices(scenario, profile, Rule::LambdaKemenyNash, lambda)?;
        let maxham = self.solve_indices(scenario, profile, Rule::Maxham, lambda)?;
        let maxeq = self.solve_indices(scenario, profile, Rule::Maxeq, lambda)?;
        Ok(AllRulesOutcome {
            kemeny: RuleWinners::from_indices(scenario, kemeny),
            kemeny_nash: RuleWinners::from_indices(scenario, kemeny_nash),
            maxham: RuleWinners::from_indices(scenario, maxham),
            maxeq: RuleWinners::from_indices(scenario, maxeq),
        })
    }
}

/// Checks shared preconditions of every solver call.
pub(crate) fn check_request(scenario: &Scenario, profile: &Profile) -> Result<()> {
    if profile.is_empty() {
        return Err(SolverError::MissingProfile);
    }
    scenario.validate_profile(profile)?;
    Ok(())
}

fn resolve(scenario: &Scenario, indices: &[usize]) -> Vec<Judgment> {
    let feasible = scenario.out_consistent();
    indices
        .iter()
        .filter_map(|&index| feasible.get(index).cloned())
        .collect()
}
