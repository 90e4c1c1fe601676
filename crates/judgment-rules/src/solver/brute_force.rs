//! Brute-force solver: score every feasible outcome, keep all extremal ones.

use judgment_scenario::{Profile, Scenario};
use tracing::debug;

use crate::agreement::AgreementVector;
use crate::error::{Result, SolverError};
use crate::rule::{Direction, Rule};
use crate::score::{score_candidates, select_extremal, Score};
use crate::solver::{check_request, AllRulesOutcome, RuleSolver, RuleWinners};

/// In-process solver over the frozen feasible judgments.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSolver;

impl BruteForceSolver {
    /// Creates a brute-force solver.
    pub fn new() -> Self {
        Self
    }
}

impl RuleSolver for BruteForceSolver {
    fn name(&self) -> &str {
        "brute-force"
    }

    fn solve_indices(
        &self,
        scenario: &Scenario,
        profile: &Profile,
        rule: Rule,
        lambda: f64,
    ) -> Result<Vec<usize>> {
        check_request(scenario, profile)?;
        let spec = rule.spec().ok_or(SolverError::CompositeRule)?;
        let lambda = rule.effective_lambda(lambda)?;

        let scores = score_candidates(spec.aggregator, scenario.out_consistent(), profile, &lambda);
        let winners = select_extremal(&scores, spec.direction);
        debug!(
            "{} over {} outcomes: {} winner(s)",
            rule,
            scores.len(),
            winners.len()
        );
        Ok(winners)
    }

    /// One pass over the feasible judgments, sharing each agreement vector
    /// between the four rules.
    fn solve_all(&self, scenario: &Scenario, profile: &Profile, lambda: f64) -> Result<AllRulesOutcome> {
        check_request(scenario, profile)?;
        let lambda = Rule::AllRules.effective_lambda(lambda)?;

        let feasible = scenario.out_consistent();
        let mut sums = Vec::with_capacity(feasible.len());
        let mut products = Vec::with_capacity(feasible.len());
        let mut minimums = Vec::with_capacity(feasible.len());
        let mut spreads = Vec::with_capacity(feasible.len());
        for outcome in feasible {
            let agreements = AgreementVector::new(outcome, profile);
            sums.push(Score::Count(agreements.sum()));
            products.push(Score::Product(agreements.scaled_product(&lambda)));
            minimums.push(Score::Count(u64::from(agreements.min())));
            spreads.push(Score::Count(u64::from(agreements.spread())));
        }

        let outcome = AllRulesOutcome {
            kemeny: RuleWinners::from_indices(scenario, select_extremal(&sums, Direction::Maximise)),
            kemeny_nash: RuleWinners::from_indices(
                scenario,
                select_extremal(&products, Direction::Maximise),
            ),
            maxham: RuleWinners::from_indices(scenario, select_extremal(&minimums, Direction::Maximise)),
            maxeq: RuleWinners::from_indices(scenario, select_extremal(&spreads, Direction::Minimise)),
        };
        debug!(
            "all_rules over {} outcomes: K={} KN={} MH={} ME={}",
            feasible.len(),
            outcome.kemeny.len(),
            outcome.kemeny_nash.len(),
            outcome.maxham.len(),
            outcome.maxeq.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use judgment_scenario::{Formula, Judgment, ProfileEntry, ScenarioBuilder, TruthTableOracle};

    fn scenario(voters: usize) -> Scenario {
        ScenarioBuilder::new()
            .variable("p")
            .variable("q")
            .issue(1, Formula::var("p"))
            .issue(2, Formula::var("q"))
            .voters(voters)
            .build(&TruthTableOracle::new())
            .unwrap()
    }

    fn profile(entries: &[(usize, &str)]) -> Profile {
        Profile::new(
            entries
                .iter()
                .map(|&(count, sig)| ProfileEntry::new(count, Judgment::from_signature(sig).unwrap()))
                .collect(),
        )
    }

    fn sigs(judgments: &[Judgment]) -> Vec<String> {
        judgments.iter().map(Judgment::signature).collect()
    }

    #[test]
    fn test_kemeny_manual_agreement() {
        // Totals against {11, 00}: 00→2, 01→2, 10→2, 11→2.
        let s = scenario(2);
        let p = profile(&[(1, "11"), (1, "00")]);
        let winners = BruteForceSolver.solve(&s, &p, Rule::Kemeny, 0.0).unwrap();
        assert_eq!(sigs(&winners), vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn test_kemeny_tie_case() {
        // Totals against {10, 01} all equal 2. Kemeny-Nash (λ = 0) drops 01
        // and 10, whose vectors hold a zero.
        let s = scenario(2);
        let p = profile(&[(1, "10"), (1, "01")]);
        let kemeny = BruteForceSolver.solve(&s, &p, Rule::Kemeny, 0.0).unwrap();
        assert_eq!(kemeny.len(), 4);
        let kn = BruteForceSolver.solve(&s, &p, Rule::KemenyNash, 0.0).unwrap();
        assert_eq!(sigs(&kn), vec!["00", "11"]);
    }

    #[test]
    fn test_majority_profile_single_winner() {
        let s = scenario(3);
        let p = profile(&[(2, "11"), (1, "00")]);
        let winners = BruteForceSolver.solve(&s, &p, Rule::Kemeny, 0.0).unwrap();
        assert_eq!(sigs(&winners), vec!["11"]);
    }

    #[test]
    fn test_composite_rule_rejected() {
        let s = scenario(2);
        let p = profile(&[(2, "11")]);
        let err = BruteForceSolver.solve(&s, &p, Rule::AllRules, 0.0).unwrap_err();
        assert!(matches!(err, SolverError::CompositeRule));
    }

    #[test]
    fn test_empty_profile_rejected() {
        let s = scenario(2);
        let err = BruteForceSolver
            .solve(&s, &Profile::default(), Rule::Kemeny, 0.0)
            .unwrap_err();
        assert!(matches!(err, SolverError::MissingProfile));
    }

    #[test]
    fn test_solve_all_matches_individual_calls() {
        let s = scenario(3);
        let p = profile(&[(1, "11"), (1, "10"), (1, "00")]);
        let all = BruteForceSolver.solve_all(&s, &p, 0.25).unwrap();
        for (rule, winners) in [
            (Rule::Kemeny, &all.kemeny),
            (Rule::LambdaKemenyNash, &all.kemeny_nash),
            (Rule::Maxham, &all.maxham),
            (Rule::Maxeq, &all.maxeq),
        ] {
            let single = BruteForceSolver.solve_indices(&s, &p, rule, 0.25).unwrap();
            assert_eq!(single, winners.indices, "{rule}");
            assert_eq!(winners.outcomes.len(), winners.indices.len());
        }
    }
}
