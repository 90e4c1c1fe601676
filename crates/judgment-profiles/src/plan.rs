//! Choosing how to walk the profile space.
//!
//! ## Modes
//!
//! | Mode | Profiles | Distribution |
//! |------|----------|--------------|
//! | Exhaustive | every multiset, lexicographic | - |
//! | Sampled | `sample` distinct multisets by rank | uniform over multisets |
//! | Simulated | `voters` independent picks each | uniform over ordered tuples |
//!
//! Simulated mode weights a multiset by its number of orderings, so
//! unanimous profiles are under-represented relative to uniform multiset
//! sampling.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Profile spaces above this size are simulated in pairwise comparisons.
pub const DEFAULT_SIMULATE_THRESHOLD: u128 = 40_000_000;

/// Default sample size for λ sweeps.
pub const DEFAULT_SWEEP_SAMPLE: usize = 250_000;

/// How profiles are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Every profile in lexicographic order.
    Exhaustive,
    /// Distinct profiles drawn uniformly without replacement.
    Sampled,
    /// Profiles synthesised from independent uniform voter picks.
    Simulated,
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::Exhaustive => write!(f, "exhaustive"),
            SamplingMode::Sampled => write!(f, "sampled"),
            SamplingMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// A sampling decision together with its iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePlan {
    /// Chosen mode.
    pub mode: SamplingMode,
    /// Profiles the stream will yield.
    pub iterations: u128,
    /// Size of the full profile space.
    pub total: u128,
}

impl ProfilePlan {
    /// Walks the whole space.
    pub fn exhaustive(total: u128) -> Self {
        Self {
            mode: SamplingMode::Exhaustive,
            iterations: total,
            total,
        }
    }

    /// Plan for a pairwise comparison.
    ///
    /// A sample of at least the whole space is dropped. Spaces larger than
    /// `simulate_threshold` are simulated, with `sample` profiles or, when
    /// no sample was requested, as many profiles as the space holds.
    /// Otherwise a non-zero sample is drawn by rank, and zero means exhaustive.
    pub fn for_comparison(total: u128, sample: usize, simulate_threshold: u128) -> Self {
        let sample = if sample as u128 >= total { 0 } else { sample as u128 };
        let plan = if total > simulate_threshold {
            Self {
                mode: SamplingMode::Simulated,
                iterations: if sample > 0 { sample } else { total },
                total,
            }
        } else if sample > 0 {
            Self {
                mode: SamplingMode::Sampled,
                iterations: sample,
                total,
            }
        } else {
            Self::exhaustive(total)
        };
        debug!("comparison plan: {} of {} profiles ({})", plan.iterations, plan.total, plan.mode);
        plan
    }

    /// Plan for a λ sweep: simulate `sample` profiles when the space is larger.
    pub fn for_sweep(total: u128, sample: usize) -> Self {
        let plan = if total > sample as u128 {
            Self {
                mode: SamplingMode::Simulated,
                iterations: sample as u128,
                total,
            }
        } else {
            Self::exhaustive(total)
        };
        debug!("sweep plan: {} of {} profiles ({})", plan.iterations, plan.total, plan.mode);
        plan
    }

    /// Returns true if the plan does not cover the whole space.
    pub fn is_partial(&self) -> bool {
        self.mode != SamplingMode::Exhaustive
    }
}
