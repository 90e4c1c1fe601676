//! # Judgment Compare
//!
//! Empirical comparison of judgment aggregation rules over the profile space
//! of a scenario.
//!
//! ## Runs
//!
//! | Run | Methods | Output |
//! |-----|---------|--------|
//! | [`PairwiseComparison`] | two `(solver, rule, λ)` methods | [`PairwiseReport`] |
//! | [`LambdaSweep`] | Kemeny, Kemeny-Nash, Maxham, Maxeq per λ | [`SweepReport`] |
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  Workbench                    │
//! │  ┌────────────────────┐  ┌─────────────────┐  │
//! │  │ PairwiseComparison │  │   LambdaSweep   │  │
//! │  └─────────┬──────────┘  └────────┬────────┘  │
//! │            └──────── runner ──────┘           │
//! │        ProfileStream → RuleSolver → stats     │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Runs stop early on a [`CancelToken`] or a time limit and still report
//! the profiles they completed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use judgment_compare::{MethodConfig, PairwiseConfig, Workbench};
//! use judgment_rules::Rule;
//!
//! let bench = Workbench::new(scenario);
//! let config = PairwiseConfig::new(
//!     MethodConfig::new(Rule::Kemeny),
//!     MethodConfig::new(Rule::LambdaKemenyNash).with_lambda(0.1),
//! )
//! .with_sample(10_000)
//! .with_seed(7);
//! let report = bench.compare(config)?;
//! println!("{report}");
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod pairwise;
pub mod report;
mod runner;
pub mod stats;
pub mod sweep;
pub mod timing;
pub mod workbench;

pub use cancel::CancelToken;
pub use config::{
    ExampleConfig, MethodConfig, PairwiseConfig, RunConfig, SamplingConfig, SolverBackend,
    SweepConfig, DEFAULT_SWEEP_LAMBDAS,
};
pub use error::{CompareError, Result};
pub use pairwise::PairwiseComparison;
pub use report::{
    EgalitarianRatios, Exemplar, MeanRatios, PairFigures, PairwiseReport, RuleFigures,
    SweepPoint, SweepReport,
};
pub use stats::{
    symmetric_difference_ratio, OutcomeMeasures, QualitativeSummary, QuantitativeTotals,
    SetComparison, ZeroEffectReport,
};
pub use sweep::LambdaSweep;
pub use timing::TimingReport;
pub use workbench::Workbench;
