//! # Integration Tests for Rule Comparison
//!
//! ## Test Categories
//!
//! 1. **Pairwise Totals**: hand-counted overlaps on the two-issue agenda
//! 2. **Ratios**: totals-then-ratio against the average of per-profile ratios
//! 3. **Execution**: parallel folding, seeds, time limits
//! 4. **Sweep**: shared profiles across λ and agreement with pairwise runs
//! 5. **Configuration Files**: JSON loading through tempfile

use std::io::Write;

use judgment_compare::{
    symmetric_difference_ratio, CompareError, MethodConfig, PairwiseConfig, PairwiseReport,
    RunConfig, SweepConfig, Workbench,
};
use judgment_profiles::SamplingMode;
use judgment_rules::Rule;
use judgment_scenario::{Formula, Judgment, Scenario, ScenarioBuilder, TruthTableOracle};

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

fn doctrinal_paradox(voters: usize) -> Scenario {
    ScenarioBuilder::new()
        .variable("p")
        .variable("q")
        .issue(1, Formula::var("p"))
        .issue(2, Formula::var("q"))
        .issue(3, Formula::and(vec![Formula::var("p"), Formula::var("q")]))
        .voters(voters)
        .build(&TruthTableOracle::new())
        .unwrap()
}

fn kemeny_vs_maxham() -> PairwiseConfig {
    PairwiseConfig::new(MethodConfig::new(Rule::Kemeny), MethodConfig::new(Rule::Maxham))
}

fn overlap(a: &[Judgment], b: &[Judgment]) -> u64 {
    a.iter().filter(|j| b.contains(j)).count() as u64
}

// =============================================================================
// Pairwise Totals
// =============================================================================

#[test]
fn test_kemeny_vs_maxham_totals() {
    // Of the ten profiles of two voters, only {00, 11} and {01, 10} split
    // the rules: Kemeny keeps all four outcomes, Maxham two of them.
    let report = Workbench::new(two_issues(2)).compare(kemeny_vs_maxham()).unwrap();
    let q = &report.quantitative;
    assert_eq!(report.completed, 10);
    assert_eq!(report.plan.mode, SamplingMode::Exhaustive);
    assert_eq!(q.sol1, 20);
    assert_eq!(q.sol2, 16);
    assert_eq!(q.overlap, 16);
    assert_eq!(q.prof_same, 8);
    assert_eq!(q.prof_1same, 10);
    assert_eq!(q.overlap_same, 12);
    assert_eq!(q.overlap_dif, 4);
    assert_eq!(report.rules_equivalent, Some(false));
    assert!(report.zero_effect.is_none());
}

#[test]
fn test_kemeny_nash_never_less_equal_on_two_issues() {
    let config = PairwiseConfig::new(
        MethodConfig::new(Rule::Kemeny),
        MethodConfig::new(Rule::KemenyNash),
    );
    let report = Workbench::new(two_issues(2)).compare(config).unwrap();
    let ze = report.zero_effect.unwrap();
    assert_eq!(ze.profile_share, 0.0);
    assert_eq!(ze.outcome_weighted, 0.0);
}

#[test]
fn test_report_identifies_scenario() {
    let scenario = two_issues(2);
    let fingerprint = scenario.fingerprint();
    let bench = Workbench::new(scenario);
    let a = bench.compare(kemeny_vs_maxham()).unwrap();
    let b = bench.compare(kemeny_vs_maxham()).unwrap();
    assert_eq!(a.fingerprint, fingerprint);
    assert_ne!(a.run_id, b.run_id);
}

// =============================================================================
// Ratios
// =============================================================================

#[test]
fn test_symmetric_difference_uses_totals() {
    let config = kemeny_vs_maxham().with_examples(100, true);
    let report = Workbench::new(two_issues(2)).compare(config).unwrap();
    assert_eq!(report.examples.len(), 10);

    // Totals: (20 + 16 − 32) / (20 + 16 − 16) = 0.2.
    assert_eq!(report.symmetric_difference, Some(0.2));

    // The average of per-profile ratios is 0.1: two profiles at 0.5.
    let average: f64 = report
        .examples
        .iter()
        .map(|e| {
            let o = overlap(&e.first, &e.second);
            symmetric_difference_ratio(e.first.len() as u64, e.second.len() as u64, o).unwrap()
        })
        .sum::<f64>()
        / report.examples.len() as f64;
    assert!((average - 0.1).abs() < 1e-12);
    assert_ne!(report.symmetric_difference, Some(average));
}

// =============================================================================
// Execution
// =============================================================================

fn assert_same_figures(a: &PairwiseReport, b: &PairwiseReport) {
    assert_eq!(a.completed, b.completed);
    assert_eq!(a.quantitative, b.quantitative);
    assert_eq!(a.first_quality, b.first_quality);
    assert_eq!(a.second_quality, b.second_quality);
    assert_eq!(a.examples, b.examples);
}

#[test]
fn test_parallel_matches_sequential() {
    let bench = Workbench::new(doctrinal_paradox(4));
    let sequential = bench.compare(kemeny_vs_maxham().with_examples(5, false)).unwrap();
    let parallel_run = RunConfig {
        parallel: true,
        batch_size: 4,
        ..RunConfig::default()
    };
    let parallel = bench
        .compare(kemeny_vs_maxham().with_examples(5, false).with_run(parallel_run))
        .unwrap();
    assert_same_figures(&sequential, &parallel);
}

#[test]
fn test_sampled_runs_reproducible() {
    let bench = Workbench::new(doctrinal_paradox(6));
    let config = kemeny_vs_maxham().with_sample(30).with_seed(17);
    let a = bench.compare(config.clone()).unwrap();
    let b = bench.compare(config).unwrap();
    assert_eq!(a.plan.mode, SamplingMode::Sampled);
    assert_eq!(a.completed, 30);
    assert!(a.plan.is_partial());
    assert_same_figures(&a, &b);
}

#[test]
fn test_oracle_backend_agrees() {
    use judgment_compare::SolverBackend;
    let config = PairwiseConfig::new(
        MethodConfig::new(Rule::LambdaKemenyNash).with_lambda(0.1),
        MethodConfig::new(Rule::LambdaKemenyNash)
            .with_lambda(0.1)
            .with_solver(SolverBackend::Oracle),
    );
    let report = Workbench::new(doctrinal_paradox(3)).compare(config).unwrap();
    assert!(!report.single_method);
    assert_eq!(report.rules_equivalent, Some(true));
}

#[test]
fn test_zero_time_limit_completes_nothing() {
    let run = RunConfig {
        time_limit_secs: Some(0.0),
        ..RunConfig::default()
    };
    let err = Workbench::new(two_issues(2))
        .compare(kemeny_vs_maxham().with_run(run))
        .unwrap_err();
    assert!(matches!(err, CompareError::EmptyRun));
}

// =============================================================================
// Sweep
// =============================================================================

#[test]
fn test_sweep_replays_profiles_for_every_lambda() {
    let bench = Workbench::new(doctrinal_paradox(9));
    let report = bench
        .sweep(SweepConfig::new(vec![0.0, 0.0]).with_sample(40))
        .unwrap();
    assert_eq!(report.plan.mode, SamplingMode::Simulated);
    assert_eq!(report.points.len(), 2);
    assert_eq!(report.points[0], report.points[1]);
}

#[test]
fn test_sweep_matches_pairwise_kemeny_nash() {
    let bench = Workbench::new(doctrinal_paradox(3));
    let sweep = bench.sweep(SweepConfig::new(vec![0.1])).unwrap();
    let point = &sweep.points[0];

    let config = PairwiseConfig::new(
        MethodConfig::new(Rule::Kemeny),
        MethodConfig::new(Rule::LambdaKemenyNash).with_lambda(0.1),
    );
    let pairwise = bench.compare(config).unwrap();
    let q = &pairwise.quantitative;
    let n = pairwise.completed as f64;

    assert_eq!(point.completed, pairwise.completed);
    assert!((point.solutions_per_profile.kemeny - q.sol1 as f64 / n).abs() < 1e-12);
    assert!((point.solutions_per_profile.kemeny_nash - q.sol2 as f64 / n).abs() < 1e-12);
    assert_eq!(point.jaccard.kemeny_kemeny_nash, pairwise.symmetric_difference);

    let outcomes = bench.scenario().out_consistent().len() as f64;
    let symmetric = (q.sol1 + q.sol2 - 2 * q.overlap) as f64;
    assert!((point.symmetric_difference.kemeny_kemeny_nash - symmetric / n / outcomes).abs() < 1e-12);
    assert_eq!(point.zero_effect, pairwise.zero_effect.unwrap());
}

#[test]
fn test_sweep_report_serializes() {
    let report = Workbench::new(two_issues(2))
        .sweep(SweepConfig::new(vec![0.0, 0.25]))
        .unwrap();
    let json = report.to_json().unwrap();
    assert!(json.contains("\"lambda\": 0.25"));
    assert!(report.to_string().contains("Lambda sweep"));
}

// =============================================================================
// Configuration Files
// =============================================================================

#[test]
fn test_pairwise_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "first": {{"rule": "kemeny"}},
            "second": {{"rule": "lamb-kemnash", "lambda": 0.05}},
            "sampling": {{"sample": 12, "seed": 4}},
            "examples": {{"max_examples": 2}},
            "run": {{"parallel": true, "batch_size": 5}}
        }}"#
    )
    .unwrap();

    let config = PairwiseConfig::from_path(file.path()).unwrap();
    assert_eq!(config.second.lambda, 0.05);
    assert!(config.run.parallel);
    assert!(config.run.timing);

    let report = Workbench::new(doctrinal_paradox(5)).compare(config).unwrap();
    assert_eq!(report.completed, 12);
    assert!(report.examples.len() <= 2);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SweepConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CompareError::Config(_)));
}
