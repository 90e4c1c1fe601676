//! # Judgment Scenario - Agendas, Constraints and Consistency Sets
//!
//! This crate describes a judgment-aggregation scenario and freezes the
//! judgments that every rule and statistic downstream works with.
//!
//! ## Purpose
//!
//! 1. **Formulas** - A small propositional language with NNF and CNF
//!    conversion, shared by consistency queries and optimisation encodings.
//!
//! 2. **Agenda** - Labelled issues in canonical order. A judgment is one
//!    boolean per issue; its signature is the `0`/`1` string in that order.
//!
//! 3. **Consistency Sets** - Rational judgments (input constraints) and
//!    feasible judgments (output constraints), computed once through a
//!    [`ConsistencyOracle`] and sorted by signature.
//!
//! 4. **Profiles** - Multisets of rational judgments sized to the electorate.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SCENARIO BUILDER                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  variables ─┐                                                │
//! │  agenda ────┼──▶ validate ──▶ oracle (input)  ──▶ rational   │
//! │  input  ────┤                 oracle (output) ──▶ feasible   │
//! │  output ────┘                                                │
//! │                                                              │
//! │  voters ──────▶ declared profile ──▶ validate_profile        │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
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
//!     .output_constraint(Formula::implies(Formula::var("p"), Formula::var("q")))
//!     .voters(3)
//!     .build(&TruthTableOracle::new())?;
//!
//! let feasible: Vec<String> = scenario.out_consistent().iter().map(|j| j.signature()).collect();
//! assert_eq!(feasible, vec!["00", "01", "11"]);
//! # Ok::<(), judgment_scenario::ScenarioError>(())
//! ```

pub mod agenda;
pub mod combinatorics;
pub mod error;
pub mod fingerprint;
pub mod formula;
pub mod judgment;
pub mod oracle;
pub mod profile;
pub mod scenario;

pub use agenda::{label_variable, Agenda, Issue};
pub use combinatorics::multiset_coefficient;
pub use error::{ConstraintSide, Result, ScenarioError};
pub use formula::{Clause, Formula, Literal};
pub use judgment::{antipodal_pairs, Judgment, JudgmentSet};
pub use oracle::{Assignment, ConsistencyOracle, TruthTableOracle};
pub use profile::{Profile, ProfileEntry};
pub use scenario::{ConsistencySets, Scenario, ScenarioBuilder, ScenarioDefinition, VoterRecord};
