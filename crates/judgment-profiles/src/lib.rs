//! # Judgment Profiles - Walking the Profile Space
//!
//! Produces the profiles a comparison evaluates. A profile is a multiset of
//! `number_voters` rational judgments; the space of all of them has
//! C(n+k−1, k) elements for `n` rational judgments and `k` voters.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`ProfilePlan`] | Chooses exhaustive, sampled or simulated iteration |
//! | [`ProfileStream`] | Lazy iterator yielding independent [`Profile`] values |
//! | [`CombinationsWithReplacement`] | Lexicographic multiset indices |
//! | [`unrank`] | Random access into the lexicographic order |
//!
//! ## Quick Start
//!
//! ```rust
//! use judgment_profiles::{ProfilePlan, ProfileStream};
//! use judgment_scenario::{Formula, ScenarioBuilder, TruthTableOracle};
//!
//! let scenario = ScenarioBuilder::new()
//!     .variable("p")
//!     .issue(1, Formula::var("p"))
//!     .voters(3)
//!     .build(&TruthTableOracle::new())?;
//!
//! let plan = ProfilePlan::for_comparison(scenario.num_profiles(), 0, 40_000_000);
//! let profiles: Vec<String> = ProfileStream::for_scenario(&scenario, plan, None)
//!     .map(|p| p.to_string())
//!     .collect();
//! assert_eq!(profiles, vec!["{0×3}", "{0×2, 1×1}", "{0×1, 1×2}", "{1×3}"]);
//! # Ok::<(), judgment_scenario::ScenarioError>(())
//! ```
//!
//! [`Profile`]: judgment_scenario::Profile

pub mod combinations;
pub mod plan;
pub mod stream;

pub use combinations::{rank, tally, unrank, CombinationsWithReplacement};
pub use plan::{ProfilePlan, SamplingMode, DEFAULT_SIMULATE_THRESHOLD, DEFAULT_SWEEP_SAMPLE};
pub use stream::ProfileStream;
