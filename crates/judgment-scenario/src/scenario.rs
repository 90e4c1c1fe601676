//! # Scenario
//!
//! An immutable judgment-aggregation scenario: declared variables, the
//! agenda, input and output constraints, the frozen consistency sets and
//! the electorate size.
//!
//! ## Construction
//!
//! ```text
//!  constraints ∧ (l_k ↔ φ_k) ∧ (v ∨ ¬v)      ┌──────────────────┐
//!  ─────────────────────────────────────────▶│ ConsistencyOracle│──▶ models
//!                                             └──────────────────┘      │
//!                                   project onto l_k, dedupe, sort ◀────┘
//! ```
//!
//! The oracle is queried once for the input side (rational judgments) and
//! once for the output side (feasible judgments). If either side has no
//! model, construction fails and nothing is returned.
//!
//! Consistency sets are sorted by signature, so judgment indices are stable
//! across oracles and runs.
//!
//! ## Example
//!
//! ```rust
//! use judgment_scenario::{Formula, ScenarioBuilder, TruthTableOracle};
//!
//! let scenario = ScenarioBuilder::new()
//!     .variable("p")
//!     .variable("q")
//!     .issue(1, Formula::var("p"))
//!     .issue(2, Formula::var("q"))
//!     .voters(2)
//!     .build(&TruthTableOracle::new())?;
//!
//! assert_eq!(scenario.in_consistent().len(), 4);
//! assert_eq!(scenario.num_profiles(), 10);
//! # Ok::<(), judgment_scenario::ScenarioError>(())
//! ```

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agenda::{label_variable, Agenda, Issue};
use crate::combinatorics::multiset_coefficient;
use crate::error::{ConstraintSide, Result, ScenarioError};
use crate::fingerprint::fingerprint_scenario;
use crate::formula::Formula;
use crate::judgment::{Judgment, JudgmentSet};
use crate::oracle::ConsistencyOracle;
use crate::profile::{Profile, ProfileEntry};

/// Rational and feasible judgments, each sorted by signature without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencySets {
    in_consistent: Vec<Judgment>,
    out_consistent: Vec<Judgment>,
}

impl ConsistencySets {
    /// Creates consistency sets, sorting and deduplicating both sides.
    pub fn new(in_consistent: Vec<Judgment>, out_consistent: Vec<Judgment>) -> Self {
        Self {
            in_consistent: sorted_unique(in_consistent),
            out_consistent: sorted_unique(out_consistent),
        }
    }

    /// Judgments consistent with the input constraints.
    pub fn in_consistent(&self) -> &[Judgment] {
        &self.in_consistent
    }

    /// Judgments consistent with the output constraints.
    pub fn out_consistent(&self) -> &[Judgment] {
        &self.out_consistent
    }

    /// Returns true if `judgment` is rational.
    pub fn is_rational(&self, judgment: &Judgment) -> bool {
        self.in_consistent.binary_search(judgment).is_ok()
    }

    /// Returns the index of `judgment` among the feasible judgments.
    pub fn feasible_position(&self, judgment: &Judgment) -> Option<usize> {
        self.out_consistent.binary_search(judgment).ok()
    }
}

fn sorted_unique(judgments: Vec<Judgment>) -> Vec<Judgment> {
    judgments
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A declared voter group: `count` voters accepting exactly `accepted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    /// Number of voters in the group.
    pub count: usize,
    /// Labels accepted by the group.
    #[serde(default)]
    pub accepted: Vec<u32>,
}

/// Serializable description of a scenario, as stored in definition files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Declared propositional variables.
    pub variables: Vec<String>,
    /// Agenda items in canonical order.
    pub agenda: Vec<Issue>,
    /// Input constraints (rationality).
    #[serde(default)]
    pub input_constraints: Vec<Formula>,
    /// Output constraints (feasibility).
    #[serde(default)]
    pub output_constraints: Vec<Formula>,
    /// Declared voter groups forming an explicit profile.
    #[serde(default)]
    pub voters: Vec<VoterRecord>,
    /// Electorate size for profile iteration. When set, `voters` is ignored.
    #[serde(default)]
    pub number_voters: Option<usize>,
}

impl ScenarioDefinition {
    /// Parses a definition from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Builder for [`Scenario`].
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    definition: ScenarioDefinition,
}

impl ScenarioBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing definition.
    pub fn from_definition(definition: ScenarioDefinition) -> Self {
        Self { definition }
    }

    /// Declares a variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.definition.variables.push(name.into());
        self
    }

    /// Appends an agenda item.
    #[must_use]
    pub fn issue(mut self, label: u32, formula: Formula) -> Self {
        self.definition.agenda.push(Issue::new(label, formula));
        self
    }

    /// Adds an input constraint.
    #[must_use]
    pub fn input_constraint(mut self, formula: Formula) -> Self {
        self.definition.input_constraints.push(formula);
        self
    }

    /// Adds an output constraint.
    #[must_use]
    pub fn output_constraint(mut self, formula: Formula) -> Self {
        self.definition.output_constraints.push(formula);
        self
    }

    /// Sets the electorate size for profile iteration.
    #[must_use]
    pub fn voters(mut self, number_voters: usize) -> Self {
        self.definition.number_voters = Some(number_voters);
        self
    }

    /// Adds a declared voter group.
    #[must_use]
    pub fn voter_record(mut self, count: usize, accepted: Vec<u32>) -> Self {
        self.definition.voters.push(VoterRecord { count, accepted });
        self
    }

    /// Validates the definition, computes consistency sets and freezes the scenario.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::Definition`] for duplicate labels or variables,
    ///   an empty agenda or an empty electorate
    /// - [`ScenarioError::UnknownVariable`] if a formula uses an undeclared variable
    /// - [`ScenarioError::ConstraintInconsistency`] if either side has no model
    /// - [`ScenarioError::InvalidJudgmentSet`] if a declared voter group is irrational
    pub fn build(self, oracle: &dyn ConsistencyOracle) -> Result<Scenario> {
        let def = self.definition;
        validate_definition(&def)?;

        let agenda = Agenda::new(def.agenda.clone());
        let mut all_variables = def.variables.clone();
        all_variables.extend(agenda.issues().iter().map(Issue::label_variable));

        let in_consistent = populate_side(
            oracle,
            &agenda,
            &def.input_constraints,
            &all_variables,
            ConstraintSide::Input,
        )?;
        let out_consistent = populate_side(
            oracle,
            &agenda,
            &def.output_constraints,
            &all_variables,
            ConstraintSide::Output,
        )?;
        let consistency = ConsistencySets::new(in_consistent, out_consistent);

        let (number_voters, declared_profile) = match def.number_voters {
            Some(n) => (n, None),
            None => {
                let profile = declared_profile(&agenda, &def.voters)?;
                (profile.number_voters(), Some(profile))
            }
        };
        if number_voters == 0 {
            return Err(ScenarioError::Definition(
                "electorate must contain at least one voter".to_string(),
            ));
        }

        let scenario = Scenario {
            variables: def.variables,
            agenda,
            input_constraints: def.input_constraints,
            output_constraints: def.output_constraints,
            consistency,
            number_voters,
            declared_profile: None,
        };
        if let Some(ref profile) = declared_profile {
            scenario.validate_profile(profile)?;
        }

        info!(
            "Scenario built via {} oracle: {} issues, {} rational, {} feasible, {} voters",
            oracle.name(),
            scenario.agenda.len(),
            scenario.consistency.in_consistent().len(),
            scenario.consistency.out_consistent().len(),
            scenario.number_voters
        );
        Ok(Scenario {
            declared_profile,
            ..scenario
        })
    }
}

fn validate_definition(def: &ScenarioDefinition) -> Result<()> {
    if def.agenda.is_empty() {
        return Err(ScenarioError::Definition("agenda is empty".to_string()));
    }

    let mut labels = HashSet::new();
    for issue in &def.agenda {
        if !labels.insert(issue.label) {
            return Err(ScenarioError::Definition(format!(
                "duplicate agenda label {}",
                issue.label
            )));
        }
    }

    let label_names: HashSet<String> = labels.iter().map(|&l| label_variable(l)).collect();
    let mut declared = HashSet::new();
    for name in &def.variables {
        if name.is_empty() {
            return Err(ScenarioError::Definition("empty variable name".to_string()));
        }
        if label_names.contains(name) {
            return Err(ScenarioError::Definition(format!(
                "variable '{name}' clashes with an agenda label variable"
            )));
        }
        if !declared.insert(name.as_str()) {
            return Err(ScenarioError::Definition(format!(
                "duplicate variable '{name}'"
            )));
        }
    }

    let formulas = def
        .agenda
        .iter()
        .map(|issue| &issue.formula)
        .chain(&def.input_constraints)
        .chain(&def.output_constraints);
    for formula in formulas {
        if let Some(unknown) = formula.variables().into_iter().find(|v| !declared.contains(v)) {
            return Err(ScenarioError::UnknownVariable(unknown.to_string()));
        }
    }
    Ok(())
}

/// Conjoins constraints with label definitions and completeness clauses.
fn consistency_formula(agenda: &Agenda, constraints: &[Formula], all_variables: &[String]) -> Formula {
    let mut conjuncts: Vec<Formula> = constraints.to_vec();
    for issue in agenda.issues() {
        conjuncts.push(Formula::iff(
            Formula::var(issue.label_variable()),
            issue.formula.clone(),
        ));
    }
    for name in all_variables {
        conjuncts.push(Formula::excluded_middle(name.clone()));
    }
    Formula::and(conjuncts)
}

fn populate_side(
    oracle: &dyn ConsistencyOracle,
    agenda: &Agenda,
    constraints: &[Formula],
    all_variables: &[String],
    side: ConstraintSide,
) -> Result<Vec<Judgment>> {
    let formula = consistency_formula(agenda, constraints, all_variables);
    let models = oracle.models(&formula, all_variables)?;
    if models.is_empty() {
        return Err(ScenarioError::ConstraintInconsistency { side });
    }

    let label_names: Vec<String> = agenda.issues().iter().map(Issue::label_variable).collect();
    let mut judgments = BTreeSet::new();
    for model in &models {
        let values = label_names
            .iter()
            .map(|name| {
                model
                    .get(name)
                    .copied()
                    .ok_or_else(|| ScenarioError::UnknownVariable(name.clone()))
            })
            .collect::<Result<Vec<bool>>>()?;
        judgments.insert(Judgment::new(values));
    }
    debug!(
        "{} side: {} models projected to {} judgments",
        side,
        models.len(),
        judgments.len()
    );
    Ok(judgments.into_iter().collect())
}

fn declared_profile(agenda: &Agenda, records: &[VoterRecord]) -> Result<Profile> {
    let entries = records
        .iter()
        .map(|record| {
            let judgment = JudgmentSet::new(record.accepted.clone()).to_judgment(agenda)?;
            Ok(ProfileEntry::new(record.count, judgment))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Profile::new(entries))
}

/// An immutable judgment-aggregation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    variables: Vec<String>,
    agenda: Agenda,
    input_constraints: Vec<Formula>,
    output_constraints: Vec<Formula>,
    consistency: ConsistencySets,
    number_voters: usize,
    declared_profile: Option<Profile>,
}

impl Scenario {
    /// Builds a scenario from a definition.
    pub fn from_definition(
        definition: ScenarioDefinition,
        oracle: &dyn ConsistencyOracle,
    ) -> Result<Self> {
        ScenarioBuilder::from_definition(definition).build(oracle)
    }

    /// Returns the declared variables.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns the agenda.
    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// Returns the input constraints.
    pub fn input_constraints(&self) -> &[Formula] {
        &self.input_constraints
    }

    /// Returns the output constraints.
    pub fn output_constraints(&self) -> &[Formula] {
        &self.output_constraints
    }

    /// Returns the frozen consistency sets.
    pub fn consistent_sets(&self) -> &ConsistencySets {
        &self.consistency
    }

    /// Rational judgments, sorted by signature.
    pub fn in_consistent(&self) -> &[Judgment] {
        self.consistency.in_consistent()
    }

    /// Feasible judgments, sorted by signature.
    pub fn out_consistent(&self) -> &[Judgment] {
        self.consistency.out_consistent()
    }

    /// Returns the electorate size.
    pub fn number_voters(&self) -> usize {
        self.number_voters
    }

    /// Returns the number of agenda issues.
    pub fn num_issues(&self) -> usize {
        self.agenda.len()
    }

    /// Returns the profile declared by the definition's voter groups, if any.
    pub fn declared_profile(&self) -> Option<&Profile> {
        self.declared_profile.as_ref()
    }

    /// Returns a copy of this scenario for a different electorate size.
    ///
    /// Consistency sets are reused; the declared profile is dropped.
    #[must_use]
    pub fn with_number_voters(&self, number_voters: usize) -> Scenario {
        Scenario {
            number_voters,
            declared_profile: None,
            ..self.clone()
        }
    }

    /// Size of the profile space: multisets of `number_voters` rational judgments.
    pub fn num_profiles(&self) -> u128 {
        multiset_coefficient(self.in_consistent().len(), self.number_voters)
    }

    /// Checks that every entry is rational and the voter total matches.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::JudgmentLength`] if a judgment does not fit the agenda
    /// - [`ScenarioError::InvalidJudgmentSet`] naming the first irrational entry
    /// - [`ScenarioError::VoterCountMismatch`] if the counts do not sum to the electorate
    pub fn validate_profile(&self, profile: &Profile) -> Result<()> {
        for (entry, item) in profile.entries().iter().enumerate() {
            if item.judgment.len() != self.num_issues() {
                return Err(ScenarioError::JudgmentLength {
                    expected: self.num_issues(),
                    actual: item.judgment.len(),
                });
            }
            if !self.consistency.is_rational(&item.judgment) {
                return Err(ScenarioError::InvalidJudgmentSet {
                    entry,
                    signature: item.judgment.signature(),
                });
            }
        }
        let actual = profile.number_voters();
        if actual != self.number_voters {
            return Err(ScenarioError::VoterCountMismatch {
                expected: self.number_voters,
                actual,
            });
        }
        Ok(())
    }

    /// Hex-encoded SHA-256 over the agenda and both consistency sets.
    pub fn fingerprint(&self) -> String {
        fingerprint_scenario(&self.agenda, &self.consistency)
    }
}
