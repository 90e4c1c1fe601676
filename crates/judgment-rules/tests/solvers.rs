//! # Integration Tests for Rule Solvers
//!
//! ## Test Categories
//!
//! 1. **Concrete Scenarios**: hand-computed winners and ties
//! 2. **λ Handling**: zero agreement under product rules
//! 3. **Equivalences**: kemeny vs kemeny-original, brute force vs oracle
//! 4. **Idempotence**: repeated solves on unchanged inputs

use judgment_rules::{
    AgreementVector, BruteForceSolver, EnumeratingOptimizer, OracleSolver, Rule, RuleSolver,
    SolverError,
};
use judgment_scenario::{
    Formula, Judgment, Profile, ProfileEntry, Scenario, ScenarioBuilder, TruthTableOracle,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn two_issues(voters: usize) -> Scenario {
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

/// Every profile of `scenario`, by combinations with replacement.
fn all_profiles(scenario: &Scenario) -> Vec<Profile> {
    fn go(n: usize, start: usize, remaining: usize, counts: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining == 0 {
            out.push(counts.clone());
            return;
        }
        for i in start..n {
            counts[i] += 1;
            go(n, i, remaining - 1, counts, out);
            counts[i] -= 1;
        }
    }
    let universe = scenario.in_consistent();
    let mut tallies = Vec::new();
    go(
        universe.len(),
        0,
        scenario.number_voters(),
        &mut vec![0; universe.len()],
        &mut tallies,
    );
    tallies
        .iter()
        .map(|counts| Profile::from_tally(counts, universe))
        .collect()
}

/// Small scenarios with different constraint shapes.
fn small_scenarios() -> Vec<Scenario> {
    let oracle = TruthTableOracle::new();
    vec![
        two_issues(2),
        two_issues(3),
        ScenarioBuilder::new()
            .variable("p")
            .variable("q")
            .issue(1, Formula::var("p"))
            .issue(2, Formula::var("q"))
            .issue(3, Formula::and(vec![Formula::var("p"), Formula::var("q")]))
            .voters(3)
            .build(&oracle)
            .unwrap(),
        ScenarioBuilder::new()
            .variable("p")
            .variable("q")
            .variable("r")
            .issue(1, Formula::var("p"))
            .issue(2, Formula::var("q"))
            .issue(3, Formula::var("r"))
            .issue(4, Formula::implies(Formula::var("p"), Formula::var("r")))
            .output_constraint(Formula::or(vec![Formula::var("q"), Formula::var("r")]))
            .voters(2)
            .build(&oracle)
            .unwrap(),
        ScenarioBuilder::new()
            .variable("a")
            .variable("b")
            .issue(1, Formula::var("a"))
            .issue(2, Formula::var("b"))
            .input_constraint(Formula::or(vec![Formula::var("a"), Formula::var("b")]))
            .output_constraint(Formula::iff(Formula::var("a"), Formula::var("b")))
            .voters(5)
            .build(&oracle)
            .unwrap(),
    ]
}

const SINGLE_RULES: [Rule; 6] = [
    Rule::Kemeny,
    Rule::KemenyNash,
    Rule::LambdaKemenyNash,
    Rule::Maxham,
    Rule::Maxeq,
    Rule::KemenyOriginal,
];

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn test_concrete_two_issue_kemeny() {
    let scenario = two_issues(2);
    assert_eq!(sigs(scenario.in_consistent()), vec!["00", "01", "10", "11"]);
    assert_eq!(sigs(scenario.out_consistent()), vec!["00", "01", "10", "11"]);

    let p = profile(&[(1, "11"), (1, "00")]);
    // Manual totals: every outcome agrees on two issues in total.
    let manual: Vec<u64> = scenario
        .out_consistent()
        .iter()
        .map(|outcome| {
            p.voters()
                .map(|voter| u64::from(outcome.agreement(voter)))
                .sum()
        })
        .collect();
    assert_eq!(manual, vec![2, 2, 2, 2]);

    let winners = BruteForceSolver.solve(&scenario, &p, Rule::Kemeny, 0.0).unwrap();
    assert_eq!(sigs(&winners), vec!["00", "01", "10", "11"]);
}

#[test]
fn test_tie_case_keeps_every_optimum() {
    let scenario = two_issues(2);
    let p = profile(&[(1, "10"), (1, "01")]);

    let winners = BruteForceSolver.solve(&scenario, &p, Rule::Kemeny, 0.0).unwrap();
    assert!(winners.len() > 1);
    assert!(sigs(&winners).contains(&"10".to_string()));
    assert!(sigs(&winners).contains(&"01".to_string()));

    // Maxham: 00 and 11 leave nobody at zero agreement.
    let maxham = BruteForceSolver.solve(&scenario, &p, Rule::Maxham, 0.0).unwrap();
    assert_eq!(sigs(&maxham), vec!["00", "11"]);
}

#[test]
fn test_maxeq_prefers_equal_treatment() {
    let scenario = two_issues(3);
    let p = profile(&[(2, "11"), (1, "00")]);
    let winners = BruteForceSolver.solve(&scenario, &p, Rule::Maxeq, 0.0).unwrap();
    // 01 and 10 give every voter agreement 1.
    assert_eq!(sigs(&winners), vec!["01", "10"]);
}

#[test]
fn test_irrational_profile_rejected() {
    let scenario = ScenarioBuilder::new()
        .variable("p")
        .variable("q")
        .issue(1, Formula::var("p"))
        .issue(2, Formula::var("q"))
        .input_constraint(Formula::var("p"))
        .voters(1)
        .build(&TruthTableOracle::new())
        .unwrap();
    let err = BruteForceSolver
        .solve(&scenario, &profile(&[(1, "01")]), Rule::Kemeny, 0.0)
        .unwrap_err();
    assert!(matches!(err, SolverError::Scenario(_)));
}

// =============================================================================
// λ Handling
// =============================================================================

#[test]
fn test_product_zero_handling() {
    let scenario = two_issues(2);
    let p = profile(&[(1, "11"), (1, "00")]);
    let outcome = Judgment::from_signature("11").unwrap();
    let vector = AgreementVector::new(&outcome, &p);
    assert!(vector.entries().contains(&0));

    // λ = 0: the product vanishes, 11 loses to 01 and 10 (product 1).
    let kn = BruteForceSolver.solve(&scenario, &p, Rule::KemenyNash, 0.0).unwrap();
    assert_eq!(sigs(&kn), vec!["01", "10"]);

    // λ = 0.1: 11 scores 2·0.1 = 0.2, still below 1.
    let lkn = BruteForceSolver
        .solve(&scenario, &p, Rule::LambdaKemenyNash, 0.1)
        .unwrap();
    assert_eq!(sigs(&lkn), vec!["01", "10"]);
    assert_eq!(vector.with_lambda(0.1), vec![2.0, 0.1]);

    // λ = 0.5: 11 scores exactly 1 and ties with 01 and 10.
    let tied = BruteForceSolver
        .solve(&scenario, &p, Rule::LambdaKemenyNash, 0.5)
        .unwrap();
    assert_eq!(sigs(&tied), vec!["00", "01", "10", "11"]);
}

#[test]
fn test_kemnash_ignores_positive_lambda() {
    let scenario = two_issues(2);
    let p = profile(&[(1, "11"), (1, "00")]);
    let forced = BruteForceSolver.solve(&scenario, &p, Rule::KemenyNash, 0.5).unwrap();
    let zero = BruteForceSolver.solve(&scenario, &p, Rule::KemenyNash, 0.0).unwrap();
    assert_eq!(forced, zero);
}

#[test]
fn test_invalid_lambda() {
    let scenario = two_issues(2);
    let p = profile(&[(2, "11")]);
    let err = BruteForceSolver
        .solve(&scenario, &p, Rule::LambdaKemenyNash, f64::NAN)
        .unwrap_err();
    assert!(matches!(err, SolverError::InvalidLambda(_)));
}

#[test]
fn test_agreement_vector_bounds_everywhere() {
    for scenario in small_scenarios() {
        let issues = scenario.num_issues() as u32;
        for p in all_profiles(&scenario) {
            for outcome in scenario.out_consistent() {
                let vector = AgreementVector::new(outcome, &p);
                assert_eq!(vector.len(), scenario.number_voters());
                assert!(vector.entries().iter().all(|&a| a <= issues));
            }
        }
    }
}

// =============================================================================
// Equivalences
// =============================================================================

#[test]
fn test_kemeny_matches_kemeny_original() {
    for scenario in small_scenarios() {
        for p in all_profiles(&scenario) {
            let kemeny = BruteForceSolver.solve_indices(&scenario, &p, Rule::Kemeny, 0.0).unwrap();
            let original = BruteForceSolver
                .solve_indices(&scenario, &p, Rule::KemenyOriginal, 0.0)
                .unwrap();
            assert_eq!(kemeny, original, "profile {p}");
        }
    }
}

#[test]
fn test_brute_force_matches_oracle_solver() {
    let oracle_solver = OracleSolver::new(EnumeratingOptimizer::new());
    for scenario in small_scenarios() {
        for p in all_profiles(&scenario) {
            for rule in SINGLE_RULES {
                for lambda in [0.0, 0.1, 0.5] {
                    let brute = BruteForceSolver.solve_indices(&scenario, &p, rule, lambda).unwrap();
                    let oracle = oracle_solver.solve_indices(&scenario, &p, rule, lambda).unwrap();
                    assert_eq!(brute, oracle, "{rule} λ={lambda} profile {p}");
                }
            }
        }
    }
}

#[test]
fn test_solve_all_agrees_across_backends() {
    let oracle_solver = OracleSolver::new(EnumeratingOptimizer::new());
    for scenario in small_scenarios() {
        for p in all_profiles(&scenario).into_iter().take(10) {
            let brute = BruteForceSolver.solve_all(&scenario, &p, 0.25).unwrap();
            let oracle = oracle_solver.solve_all(&scenario, &p, 0.25).unwrap();
            assert_eq!(brute, oracle);
        }
    }
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_repeated_solves_identical() {
    for scenario in small_scenarios() {
        for p in all_profiles(&scenario) {
            for rule in SINGLE_RULES {
                let first = BruteForceSolver.solve(&scenario, &p, rule, 0.1).unwrap();
                let second = BruteForceSolver.solve(&scenario, &p, rule, 0.1).unwrap();
                assert_eq!(first, second);
                assert!(!first.is_empty());
            }
        }
    }
}
