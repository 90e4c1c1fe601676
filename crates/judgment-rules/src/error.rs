//! Error types for rule solving.

use judgment_scenario::ScenarioError;
use thiserror::Error;

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

/// Errors that can occur during a solver call.
///
/// A failing call returns no partial winner list.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The rule identifier is not in the rule table.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// The profile has no voters.
    #[error("no profile to aggregate: the profile is empty")]
    MissingProfile,

    /// λ is negative, infinite or NaN.
    #[error("invalid lambda {0}: must be finite and non-negative")]
    InvalidLambda(f64),

    /// `all_rules` was passed where a single rule is required.
    #[error("'all_rules' yields four winner sets; use solve_all")]
    CompositeRule,

    /// The optimisation oracle failed or returned an unusable model.
    #[error("optimisation oracle error: {0}")]
    Oracle(String),

    /// The profile does not fit the scenario.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}
