//! The workbench facade.
//!
//! [`Workbench`] owns a scenario and hands out solves, pairwise comparisons
//! and λ sweeps over it, all sharing one cancellation token.

use judgment_rules::{AllRulesOutcome, Rule};
use judgment_scenario::{ConsistencyOracle, Judgment, Profile, Scenario, ScenarioDefinition};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::{MethodConfig, PairwiseConfig, SolverBackend, SweepConfig};
use crate::error::Result;
use crate::pairwise::PairwiseComparison;
use crate::report::{PairwiseReport, SweepReport};
use crate::sweep::LambdaSweep;

/// Entry point for working with one scenario.
///
/// # Example
///
/// ```rust,ignore
/// let bench = Workbench::from_definition(definition, &TruthTableOracle::new())?;
/// let winners = bench.solve(&MethodConfig::new(Rule::Kemeny), &profile)?;
/// let report = bench.compare(PairwiseConfig::new(kemeny, kemnash))?;
/// println!("{report}");
/// ```
#[derive(Debug)]
pub struct Workbench {
    scenario: Scenario,
    cancel: CancelToken,
}

impl Workbench {
    /// Wraps a built scenario.
    pub fn new(scenario: Scenario) -> Self {
        info!(
            "workbench ready: {} issues, {} rational, {} feasible, {} voters",
            scenario.num_issues(),
            scenario.in_consistent().len(),
            scenario.out_consistent().len(),
            scenario.number_voters()
        );
        Self {
            scenario,
            cancel: CancelToken::new(),
        }
    }

    /// Builds the scenario of `definition` with `oracle`.
    ///
    /// # Errors
    ///
    /// Any scenario construction error.
    pub fn from_definition(
        definition: ScenarioDefinition,
        oracle: &dyn ConsistencyOracle,
    ) -> Result<Self> {
        Ok(Self::new(Scenario::from_definition(definition, oracle)?))
    }

    /// The scenario.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Token that cancels every run started from this workbench.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Winners of one method on `profile`.
    ///
    /// # Errors
    ///
    /// A configuration error for `all_rules`, otherwise any solver error.
    pub fn solve(&self, method: &MethodConfig, profile: &Profile) -> Result<Vec<Judgment>> {
        let method = method.normalized()?;
        debug!("solving {} on {}", method.label(), profile);
        let solver = method.solver.build();
        Ok(solver.solve(&self.scenario, profile, method.rule, method.lambda)?)
    }

    /// Winners of the four base rules on `profile`.
    ///
    /// # Errors
    ///
    /// Any solver error.
    pub fn solve_all(
        &self,
        backend: SolverBackend,
        profile: &Profile,
        lambda: f64,
    ) -> Result<AllRulesOutcome> {
        debug!("solving {} with {} on {}", Rule::AllRules, backend, profile);
        Ok(backend.build().solve_all(&self.scenario, profile, lambda)?)
    }

    /// Runs a pairwise comparison.
    ///
    /// # Errors
    ///
    /// See [`PairwiseComparison::run`].
    pub fn compare(&self, config: PairwiseConfig) -> Result<PairwiseReport> {
        PairwiseComparison::new(&self.scenario, config)?
            .with_cancel_token(self.cancel.clone())
            .run()
    }

    /// Runs a λ sweep.
    ///
    /// # Errors
    ///
    /// See [`LambdaSweep::run`].
    pub fn sweep(&self, config: SweepConfig) -> Result<SweepReport> {
        LambdaSweep::new(&self.scenario, config)?
            .with_cancel_token(self.cancel.clone())
            .run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use judgment_scenario::{Formula, ProfileEntry, ScenarioBuilder, TruthTableOracle};

    fn bench() -> Workbench {
        Workbench::new(
            ScenarioBuilder::new()
                .variable("p")
                .variable("q")
                .issue(1, Formula::var("p"))
                .issue(2, Formula::var("q"))
                .voters(3)
                .build(&TruthTableOracle::new())
                .unwrap(),
        )
    }

    fn profile() -> Profile {
        Profile::new(vec![
            ProfileEntry::new(2, Judgment::from_signature("11").unwrap()),
            ProfileEntry::new(1, Judgment::from_signature("00").unwrap()),
        ])
    }

    #[test]
    fn test_solve_through_facade() {
        let winners = bench()
            .solve(&MethodConfig::new(Rule::Maxeq), &profile())
            .unwrap();
        let sigs: Vec<String> = winners.iter().map(Judgment::signature).collect();
        assert_eq!(sigs, vec!["01", "10"]);
    }

    #[test]
    fn test_solve_rejects_composite_rule() {
        let err = bench()
            .solve(&MethodConfig::new(Rule::AllRules), &profile())
            .unwrap_err();
        assert!(matches!(err, CompareError::Config(_)));
    }

    #[test]
    fn test_solve_all_matches_single_solves() {
        let bench = bench();
        let all = bench
            .solve_all(SolverBackend::BruteForce, &profile(), 0.0)
            .unwrap();
        let kemeny = bench
            .solve(&MethodConfig::new(Rule::Kemeny), &profile())
            .unwrap();
        assert_eq!(all.kemeny.outcomes, kemeny);
    }

    #[test]
    fn test_cancel_token_reaches_runs() {
        let bench = bench();
        bench.cancel_token().cancel();
        let method = MethodConfig::new(Rule::Kemeny);
        let err = bench.compare(PairwiseConfig::new(method, method)).unwrap_err();
        assert!(matches!(err, CompareError::EmptyRun));
    }
}
