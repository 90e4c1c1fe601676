//! # Consistency Oracle
//!
//! The scenario asks an oracle for every total assignment that satisfies a
//! formula over a declared variable set. It does so exactly twice per
//! scenario: once for the input constraints and once for the output
//! constraints.
//!
//! [`TruthTableOracle`] is the in-process implementation. It walks the full
//! truth table, which is adequate for agendas of a dozen or so issues.
//! Larger problems plug in a SAT-backed implementation of
//! [`ConsistencyOracle`].

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{Result, ScenarioError};
use crate::formula::Formula;

/// A total truth assignment, keyed by variable name.
pub type Assignment = BTreeMap<String, bool>;

/// Enumerates all models of a propositional formula.
pub trait ConsistencyOracle: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &str;

    /// Returns every assignment to `variables` under which `formula` holds.
    ///
    /// # Errors
    ///
    /// Implementations fail if the formula mentions a variable that is not
    /// in `variables`, or if the query is beyond their capacity.
    fn models(&self, formula: &Formula, variables: &[String]) -> Result<Vec<Assignment>>;
}

/// Brute-force oracle evaluating the formula on every assignment.
#[derive(Debug, Clone)]
pub struct TruthTableOracle {
    max_variables: usize,
}

impl TruthTableOracle {
    /// Default variable limit (2^24 assignments).
    pub const DEFAULT_MAX_VARIABLES: usize = 24;

    /// Creates an oracle with the default limit.
    pub fn new() -> Self {
        Self {
            max_variables: Self::DEFAULT_MAX_VARIABLES,
        }
    }

    /// Creates an oracle with a custom variable limit.
    pub fn with_max_variables(max_variables: usize) -> Self {
        Self {
            max_variables: max_variables.min(63),
        }
    }

    /// Returns the variable limit.
    pub fn max_variables(&self) -> usize {
        self.max_variables
    }
}

impl Default for TruthTableOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyOracle for TruthTableOracle {
    fn name(&self) -> &str {
        "truth-table"
    }

    fn models(&self, formula: &Formula, variables: &[String]) -> Result<Vec<Assignment>> {
        if variables.len() > self.max_variables {
            return Err(ScenarioError::OracleLimit {
                variables: variables.len(),
                max: self.max_variables,
            });
        }

        let index: HashMap<&str, usize> = variables
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        if let Some(unknown) = formula.variables().into_iter().find(|v| !index.contains_key(v)) {
            return Err(ScenarioError::UnknownVariable(unknown.to_string()));
        }

        let mut models = Vec::new();
        for bits in 0..(1u64 << variables.len()) {
            let lookup = |name: &str| index.get(name).map(|&i| bits & (1 << i) != 0);
            if formula.evaluate(&lookup) == Some(true) {
                let assignment = variables
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), bits & (1 << i) != 0))
                    .collect();
                models.push(assignment);
            }
        }

        debug!(
            "{} oracle: {} models over {} variables",
            self.name(),
            models.len(),
            variables.len()
        );
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(vars: &[&str]) -> Vec<String> {
        vars.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_models_of_conjunction() {
        let oracle = TruthTableOracle::new();
        let f = Formula::and(vec![Formula::var("p"), Formula::var("q")]);
        let models = oracle.models(&f, &names(&["p", "q"])).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0]["p"], true);
        assert_eq!(models[0]["q"], true);
    }

    #[test]
    fn test_free_variables_multiply_models() {
        let oracle = TruthTableOracle::new();
        let models = oracle
            .models(&Formula::var("p"), &names(&["p", "q", "r"]))
            .unwrap();
        assert_eq!(models.len(), 4);
    }

    #[test]
    fn test_unsatisfiable_has_no_models() {
        let oracle = TruthTableOracle::new();
        let f = Formula::and(vec![Formula::var("p"), Formula::var("p").negate()]);
        assert!(oracle.models(&f, &names(&["p"])).unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_variable_rejected() {
        let oracle = TruthTableOracle::new();
        let err = oracle.models(&Formula::var("z"), &names(&["p"])).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownVariable(v) if v == "z"));
    }

    #[test]
    fn test_limit_enforced() {
        let oracle = TruthTableOracle::with_max_variables(2);
        let err = oracle
            .models(&Formula::Const(true), &names(&["a", "b", "c"]))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::OracleLimit { variables: 3, max: 2 }));
    }
}
