//! Error types for comparison runs.

use judgment_rules::SolverError;
use judgment_scenario::ScenarioError;
use thiserror::Error;

/// Result type alias for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Errors that can end a comparison run.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Scenario error passthrough.
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Solver error passthrough.
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run finished without a single completed profile.
    #[error("no profile was completed; nothing to report")]
    EmptyRun,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_passthrough() {
        let err: CompareError = SolverError::UnknownRule("borda".into()).into();
        assert!(matches!(err, CompareError::Solver(_)));
        assert!(err.to_string().contains("borda"));
    }

    #[test]
    fn test_scenario_error_passthrough() {
        let err: CompareError = ScenarioError::UnknownIssue(9).into();
        assert!(matches!(err, CompareError::Scenario(_)));
    }

    #[test]
    fn test_empty_run_display() {
        assert!(CompareError::EmptyRun.to_string().contains("no profile"));
    }
}
