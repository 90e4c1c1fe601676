//! # Judgment Rules - Aggregation Rule Solvers
//!
//! Computes collective outcomes of a profile under the judgment-aggregation
//! rules. Every rule scores each feasible outcome by its agreement with the
//! voters and keeps ALL outcomes reaching the extreme score; ties are never
//! broken.
//!
//! ## Rules
//!
//! | Rule | Intuition |
//! |------|-----------|
//! | Kemeny | most issue-by-issue agreement overall |
//! | Kemeny-Nash | Nash bargaining: largest product of agreements |
//! | λ-Kemeny-Nash | as Kemeny-Nash, a fully disagreeing voter counts as λ |
//! | Maxham | the worst-served voter is served best |
//! | Maxeq | the gap between best and worst-served voter is smallest |
//!
//! ## Architecture
//!
//! ```text
//!            ┌───────────────────────────┐
//!  Scenario ─┤                           │
//!  Profile ──┤        RuleSolver         ├──▶ winner indices / outcomes
//!  Rule, λ ──┤                           │
//!            └─────────────┬─────────────┘
//!                ┌─────────┴──────────┐
//!        BruteForceSolver       OracleSolver<O>
//!        agreement vectors      OptimizationProblem ──▶ OptimizationOracle
//!        exact Score compare
//! ```
//!
//! Product scores are exact: λ becomes a fraction `p/q` and products are
//! compared as big integers, so equal products tie exactly.
//!
//! ## Example
//!
//! ```rust
//! use judgment_rules::{BruteForceSolver, Rule, RuleSolver};
//! use judgment_scenario::{Formula, Judgment, Profile, ProfileEntry, ScenarioBuilder, TruthTableOracle};
//!
//! let scenario = ScenarioBuilder::new()
//!     .variable("p")
//!     .variable("q")
//!     .issue(1, Formula::var("p"))
//!     .issue(2, Formula::var("q"))
//!     .voters(3)
//!     .build(&TruthTableOracle::new())?;
//!
//! let profile = Profile::new(vec![
//!     ProfileEntry::new(2, Judgment::from_signature("11").unwrap()),
//!     ProfileEntry::new(1, Judgment::from_signature("00").unwrap()),
//! ]);
//!
//! let winners = BruteForceSolver.solve(&scenario, &profile, Rule::Kemeny, 0.0)?;
//! assert_eq!(winners[0].signature(), "11");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agreement;
pub mod error;
pub mod lambda;
pub mod rule;
pub mod score;
pub mod solver;

pub use agreement::{AgreementVector, IssueSupport};
pub use error::{Result, SolverError};
pub use lambda::Lambda;
pub use rule::{Aggregator, Direction, Rule, RuleSpec};
pub use score::{score_candidates, select_extremal, Score};
pub use solver::brute_force::BruteForceSolver;
pub use solver::oracle::{
    Directive, EnumeratingOptimizer, OptimizationOracle, OptimizationProblem, OracleSolver,
    VoterGroup,
};
pub use solver::{AllRulesOutcome, RuleSolver, RuleWinners};
