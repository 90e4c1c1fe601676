//! # Oracle-backed Solver
//!
//! Encodes a solve request as a declarative [`OptimizationProblem`] and
//! hands it to an [`OptimizationOracle`]. The oracle returns the label
//! values of every optimal outcome; the solver decodes them and maps them
//! back onto the feasible judgments.
//!
//! ## Encoding
//!
//! ```text
//! variables   declared variables + one label variable l_k per issue
//! voters      (count, label values) per profile entry
//! definitions CNF of l_k ↔ φ_k for every issue
//! input       CNF of the input constraints
//! output      CNF of the output constraints
//! directive   rule + λ as p/q
//! ```
//!
//! An outcome is feasible iff some assignment satisfies the definition and
//! output clauses. Voters have already been checked against the input
//! constraints when the profile was validated.
//!
//! [`EnumeratingOptimizer`] is the in-process oracle. It walks the truth
//! table of the encoding and scores the projected outcomes, which keeps the
//! workspace self-contained; an answer-set or MaxSAT backend plugs in
//! through the same trait.

use std::collections::BTreeSet;

use judgment_scenario::{Clause, Formula, Judgment, Profile, ProfileEntry, Scenario};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SolverError};
use crate::lambda::Lambda;
use crate::rule::Rule;
use crate::score::{score_candidates, select_extremal};
use crate::solver::{check_request, RuleSolver};

/// Voters sharing one judgment, as label values in agenda order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterGroup {
    /// Group size.
    pub count: usize,
    /// Label values.
    pub values: Vec<bool>,
}

/// What the oracle optimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Rule whose aggregate is optimised.
    pub rule: Rule,
    /// Numerator of λ.
    pub lambda_numerator: u64,
    /// Denominator of λ.
    pub lambda_denominator: u64,
}

/// Declarative encoding of one solve request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationProblem {
    /// Declared propositional variables.
    pub variables: Vec<String>,
    /// Label variables in agenda order.
    pub labels: Vec<String>,
    /// The profile.
    pub voters: Vec<VoterGroup>,
    /// Label definitions `l_k ↔ φ_k` in CNF.
    pub definition_clauses: Vec<Clause>,
    /// Input constraints in CNF.
    pub input_clauses: Vec<Clause>,
    /// Output constraints in CNF.
    pub output_clauses: Vec<Clause>,
    /// Objective.
    pub directive: Directive,
}

impl OptimizationProblem {
    /// Encodes a request. `rule` must be a single rule and `lambda` already effective.
    pub fn encode(scenario: &Scenario, profile: &Profile, rule: Rule, lambda: &Lambda) -> Self {
        let definition_clauses = scenario
            .agenda()
            .issues()
            .iter()
            .flat_map(|issue| {
                Formula::iff(Formula::var(issue.label_variable()), issue.formula.clone()).to_cnf()
            })
            .collect();
        Self {
            variables: scenario.variables().to_vec(),
            labels: scenario
                .agenda()
                .issues()
                .iter()
                .map(|issue| issue.label_variable())
                .collect(),
            voters: profile
                .entries()
                .iter()
                .map(|entry| VoterGroup {
                    count: entry.count,
                    values: entry.judgment.values().to_vec(),
                })
                .collect(),
            definition_clauses,
            input_clauses: Formula::and(scenario.input_constraints().to_vec()).to_cnf(),
            output_clauses: Formula::and(scenario.output_constraints().to_vec()).to_cnf(),
            directive: Directive {
                rule,
                lambda_numerator: lambda.numerator(),
                lambda_denominator: lambda.denominator(),
            },
        }
    }

    /// Declared variables followed by label variables.
    pub fn all_variables(&self) -> Vec<String> {
        self.variables.iter().chain(&self.labels).cloned().collect()
    }

    /// Rebuilds the profile carried by the encoding.
    pub fn profile(&self) -> Profile {
        Profile::new(
            self.voters
                .iter()
                .map(|group| ProfileEntry::new(group.count, Judgment::new(group.values.clone())))
                .collect(),
        )
    }
}

/// External optimisation backend.
pub trait OptimizationOracle: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &str;

    /// Returns the label values of every optimal outcome.
    ///
    /// # Errors
    ///
    /// Implementations fail with [`SolverError::Oracle`] if the problem is
    /// beyond their capacity or the backend reports an error.
    fn optimise(&self, problem: &OptimizationProblem) -> Result<Vec<Vec<bool>>>;
}

/// Truth-table optimiser over the encoded clauses.
#[derive(Debug, Clone)]
pub struct EnumeratingOptimizer {
    max_variables: usize,
}

impl EnumeratingOptimizer {
    /// Default variable limit.
    pub const DEFAULT_MAX_VARIABLES: usize = 24;

    /// Creates an optimiser with the default limit.
    pub fn new() -> Self {
        Self {
            max_variables: Self::DEFAULT_MAX_VARIABLES,
        }
    }

    /// Creates an optimiser with a custom variable limit.
    pub fn with_max_variables(max_variables: usize) -> Self {
        Self {
            max_variables: max_variables.min(63),
        }
    }

    fn feasible_outcomes(&self, problem: &OptimizationProblem) -> Result<Vec<Judgment>> {
        let variables = problem.all_variables();
        if variables.len() > self.max_variables {
            return Err(SolverError::Oracle(format!(
                "{} variables exceeds maximum of {}",
                variables.len(),
                self.max_variables
            )));
        }
        let label_offset = problem.variables.len();

        let mut outcomes = BTreeSet::new();
        for bits in 0..(1u64 << variables.len()) {
            let lookup = |name: &str| {
                variables
                    .iter()
                    .position(|v| v == name)
                    .map(|i| bits & (1 << i) != 0)
            };
            let satisfied = problem
                .definition_clauses
                .iter()
                .chain(&problem.output_clauses)
                .all(|clause| clause.evaluate(&lookup) == Some(true));
            if satisfied {
                let values = (0..problem.labels.len())
                    .map(|k| bits & (1 << (label_offset + k)) != 0)
                    .collect();
                outcomes.insert(Judgment::new(values));
            }
        }
        Ok(outcomes.into_iter().collect())
    }
}

impl Default for EnumeratingOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationOracle for EnumeratingOptimizer {
    fn name(&self) -> &str {
        "enumerating"
    }

    fn optimise(&self, problem: &OptimizationProblem) -> Result<Vec<Vec<bool>>> {
        let spec = problem.directive.rule.spec().ok_or(SolverError::CompositeRule)?;
        let lambda = Lambda::from_ratio(
            problem.directive.lambda_numerator,
            problem.directive.lambda_denominator,
        )?;
        let candidates = self.feasible_outcomes(problem)?;
        let scores = score_candidates(spec.aggregator, &candidates, &problem.profile(), &lambda);
        Ok(select_extremal(&scores, spec.direction)
            .into_iter()
            .map(|index| candidates[index].values().to_vec())
            .collect())
    }
}

/// Solver delegating the search to an [`OptimizationOracle`].
#[derive(Debug, Clone, Default)]
pub struct OracleSolver<O: OptimizationOracle> {
    oracle: O,
}

impl<O: OptimizationOracle> OracleSolver<O> {
    /// Wraps an oracle.
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Returns the wrapped oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<O: OptimizationOracle> RuleSolver for OracleSolver<O> {
    fn name(&self) -> &str {
        self.oracle.name()
    }

    fn solve_indices(
        &self,
        scenario: &Scenario,
        profile: &Profile,
        rule: Rule,
        lambda: f64,
    ) -> Result<Vec<usize>> {
        check_request(scenario, profile)?;
        if rule == Rule::AllRules {
            return Err(SolverError::CompositeRule);
        }
        let lambda = rule.effective_lambda(lambda)?;
        let problem = OptimizationProblem::encode(scenario, profile, rule, &lambda);

        let models = self.oracle.optimise(&problem)?;
        let mut indices = BTreeSet::new();
        for values in models {
            let outcome = Judgment::new(values);
            let index = scenario
                .consistent_sets()
                .feasible_position(&outcome)
                .ok_or_else(|| {
                    SolverError::Oracle(format!("oracle returned infeasible outcome {outcome}"))
                })?;
            indices.insert(index);
        }
        debug!(
            "{} via {} oracle: {} winner(s)",
            rule,
            self.oracle.name(),
            indices.len()
        );
        Ok(indices.into_iter().collect())
    }
}
