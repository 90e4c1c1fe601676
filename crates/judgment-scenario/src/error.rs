//! Error types for scenario construction.
//!
//! Every error here aborts the operation that raised it. A [`Scenario`]
//! is either built completely or not at all.
//!
//! [`Scenario`]: crate::Scenario

use thiserror::Error;

/// Result type alias for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Which constraint family a consistency query was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSide {
    /// Input constraints (individual rationality).
    Input,
    /// Output constraints (collective feasibility).
    Output,
}

impl std::fmt::Display for ConstraintSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Errors that can occur while building or using a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The conjunction of constraints and agenda definitions has no model.
    #[error("the {side} constraints are inconsistent")]
    ConstraintInconsistency {
        /// Constraint family that turned out unsatisfiable.
        side: ConstraintSide,
    },

    /// A judgment in a profile violates the input constraints.
    #[error("judgment set at entry {entry} ({signature}) is inconsistent with the input constraints")]
    InvalidJudgmentSet {
        /// Zero-based index of the offending profile entry.
        entry: usize,
        /// Binary signature of the offending judgment.
        signature: String,
    },

    /// Profile voter total differs from the scenario's electorate size.
    #[error("profile has {actual} voters, scenario expects {expected}")]
    VoterCountMismatch {
        /// Voters declared by the scenario.
        expected: usize,
        /// Voters counted in the profile.
        actual: usize,
    },

    /// A judgment set references a label that is not on the agenda.
    #[error("label {0} is not on the agenda")]
    UnknownIssue(u32),

    /// A formula references an undeclared variable.
    #[error("variable '{0}' is not declared")]
    UnknownVariable(String),

    /// A judgment does not have one value per agenda issue.
    #[error("judgment has {actual} values, agenda has {expected} issues")]
    JudgmentLength {
        /// Agenda size.
        expected: usize,
        /// Values in the judgment.
        actual: usize,
    },

    /// The consistency oracle cannot handle the query size.
    #[error("consistency oracle limit: {variables} variables exceeds maximum of {max}")]
    OracleLimit {
        /// Variables in the query.
        variables: usize,
        /// Largest supported query.
        max: usize,
    },

    /// The scenario definition is malformed.
    #[error("invalid scenario definition: {0}")]
    Definition(String),

    /// Reading a definition file failed.
    #[error("failed to read scenario definition: {0}")]
    Io(#[from] std::io::Error),

    /// A definition file is not valid JSON.
    #[error("failed to parse scenario definition: {0}")]
    Parse(#[from] serde_json::Error),
}
