//! # Integration Tests for Scenario Construction
//!
//! ## Test Categories
//!
//! 1. **Consistency Sets**: rational and feasible judgments from constraints
//! 2. **Definitions**: JSON loading and validation errors
//! 3. **Profiles**: declared profiles and profile-space size

use std::io::Write;

use judgment_scenario::{
    antipodal_pairs, ConstraintSide, Formula, Judgment, Profile, ProfileEntry, Scenario,
    ScenarioBuilder, ScenarioDefinition, ScenarioError, TruthTableOracle,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn signatures(judgments: &[Judgment]) -> Vec<String> {
    judgments.iter().map(Judgment::signature).collect()
}

/// Discursive dilemma: issues p, q and p & q.
fn doctrinal_paradox() -> ScenarioBuilder {
    ScenarioBuilder::new()
        .variable("p")
        .variable("q")
        .issue(1, Formula::var("p"))
        .issue(2, Formula::var("q"))
        .issue(3, Formula::and(vec![Formula::var("p"), Formula::var("q")]))
}

const DEFINITION_JSON: &str = r#"{
    "variables": ["p", "q"],
    "agenda": [
        {"label": 1, "formula": {"var": "p"}},
        {"label": 2, "formula": {"var": "q"}}
    ],
    "input_constraints": [],
    "output_constraints": [
        {"implies": [{"var": "p"}, {"var": "q"}]}
    ],
    "voters": [
        {"count": 2, "accepted": [1, 2]},
        {"count": 1, "accepted": [2]}
    ]
}"#;

// =============================================================================
// Consistency Sets
// =============================================================================

#[test]
fn test_unconstrained_agenda_has_all_judgments() {
    let scenario = ScenarioBuilder::new()
        .variable("p")
        .variable("q")
        .issue(1, Formula::var("p"))
        .issue(2, Formula::var("q"))
        .voters(2)
        .build(&TruthTableOracle::new())
        .unwrap();

    assert_eq!(signatures(scenario.in_consistent()), vec!["00", "01", "10", "11"]);
    assert_eq!(scenario.in_consistent(), scenario.out_consistent());
    assert_eq!(antipodal_pairs(scenario.in_consistent()), 2);
}

#[test]
fn test_doctrinal_paradox_sets() {
    let scenario = doctrinal_paradox()
        .voters(3)
        .build(&TruthTableOracle::new())
        .unwrap();

    assert_eq!(signatures(scenario.in_consistent()), vec!["000", "010", "100", "111"]);
    assert_eq!(antipodal_pairs(scenario.in_consistent()), 1);
    assert_eq!(scenario.num_profiles(), 20);
}

#[test]
fn test_sets_are_subsets_of_full_cube() {
    let scenario = doctrinal_paradox()
        .output_constraint(Formula::var("q"))
        .voters(1)
        .build(&TruthTableOracle::new())
        .unwrap();

    assert_eq!(signatures(scenario.out_consistent()), vec!["010", "111"]);
    for judgment in scenario.out_consistent() {
        assert_eq!(judgment.len(), 3);
    }
}

#[test]
fn test_inconsistent_constraints_report_side() {
    let err = doctrinal_paradox()
        .output_constraint(Formula::and(vec![
            Formula::var("p"),
            Formula::var("p").negate(),
        ]))
        .voters(1)
        .build(&TruthTableOracle::new())
        .unwrap_err();

    assert!(matches!(
        err,
        ScenarioError::ConstraintInconsistency {
            side: ConstraintSide::Output
        }
    ));
    assert!(err.to_string().contains("output"));
}

#[test]
fn test_oracle_limit_propagates() {
    let err = doctrinal_paradox()
        .voters(1)
        .build(&TruthTableOracle::with_max_variables(3))
        .unwrap_err();

    // 2 declared variables plus 3 label variables.
    assert!(matches!(err, ScenarioError::OracleLimit { variables: 5, max: 3 }));
}

// =============================================================================
// Definitions
// =============================================================================

#[test]
fn test_definition_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DEFINITION_JSON.as_bytes()).unwrap();

    let definition = ScenarioDefinition::from_path(file.path()).unwrap();
    let scenario = Scenario::from_definition(definition, &TruthTableOracle::new()).unwrap();

    assert_eq!(signatures(scenario.out_consistent()), vec!["00", "01", "11"]);
    assert_eq!(scenario.number_voters(), 3);

    let declared = scenario.declared_profile().unwrap();
    assert_eq!(declared.to_string(), "{11×2, 01×1}");
}

#[test]
fn test_definition_with_explicit_electorate_ignores_records() {
    let mut definition = ScenarioDefinition::from_json_str(DEFINITION_JSON).unwrap();
    definition.number_voters = Some(5);

    let scenario = Scenario::from_definition(definition, &TruthTableOracle::new()).unwrap();
    assert_eq!(scenario.number_voters(), 5);
    assert!(scenario.declared_profile().is_none());
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = ScenarioDefinition::from_json_str("{\"variables\": [").unwrap_err();
    assert!(matches!(err, ScenarioError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ScenarioDefinition::from_path("/nonexistent/scenario.json").unwrap_err();
    assert!(matches!(err, ScenarioError::Io(_)));
}

#[test]
fn test_unknown_label_in_voter_record() {
    let err = ScenarioBuilder::new()
        .variable("p")
        .issue(1, Formula::var("p"))
        .voter_record(1, vec![9])
        .build(&TruthTableOracle::new())
        .unwrap_err();

    assert!(matches!(err, ScenarioError::UnknownIssue(9)));
}

// =============================================================================
// Profiles
// =============================================================================

#[test]
fn test_validate_profile_rejects_irrational_judgment() {
    let scenario = doctrinal_paradox()
        .voters(2)
        .build(&TruthTableOracle::new())
        .unwrap();

    let profile = Profile::new(vec![
        ProfileEntry::new(1, Judgment::from_signature("111").unwrap()),
        ProfileEntry::new(1, Judgment::from_signature("110").unwrap()),
    ]);

    match scenario.validate_profile(&profile).unwrap_err() {
        ScenarioError::InvalidJudgmentSet { entry, signature } => {
            assert_eq!(entry, 1);
            assert_eq!(signature, "110");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validate_profile_accepts_rational_profile() {
    let scenario = doctrinal_paradox()
        .voters(3)
        .build(&TruthTableOracle::new())
        .unwrap();

    let profile = Profile::new(vec![
        ProfileEntry::new(1, Judgment::from_signature("100").unwrap()),
        ProfileEntry::new(1, Judgment::from_signature("010").unwrap()),
        ProfileEntry::new(1, Judgment::from_signature("111").unwrap()),
    ]);
    assert!(scenario.validate_profile(&profile).is_ok());
}
