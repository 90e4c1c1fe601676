//! Configuration types for comparison runs.
//!
//! Every struct derives `Serialize`/`Deserialize` with field defaults, so a
//! JSON file only needs the keys it changes:
//!
//! ```json
//! {
//!   "first":  { "solver": "brute_force", "rule": "kemeny" },
//!   "second": { "solver": "brute_force", "rule": "lamb-kemnash", "lambda": 0.1 },
//!   "sampling": { "sample": 5000, "seed": 7 },
//!   "examples": { "max_examples": 3 }
//! }
//! ```

use std::fmt;
use std::path::Path;

use judgment_profiles::{DEFAULT_SIMULATE_THRESHOLD, DEFAULT_SWEEP_SAMPLE};
use judgment_rules::{
    BruteForceSolver, EnumeratingOptimizer, Lambda, OracleSolver, Rule, RuleSolver,
};
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// λ values of the default sweep.
pub const DEFAULT_SWEEP_LAMBDAS: [f64; 9] = [0.0, 0.01, 0.05, 0.1, 0.15, 0.25, 0.35, 0.45, 0.55];

/// Which solver computes a method's winners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Score every feasible outcome directly.
    #[default]
    BruteForce,
    /// Encode an optimisation problem for the enumerating optimiser.
    Oracle,
}

impl SolverBackend {
    /// Instantiates the solver.
    pub fn build(&self) -> Box<dyn RuleSolver> {
        match self {
            SolverBackend::BruteForce => Box::new(BruteForceSolver::new()),
            SolverBackend::Oracle => Box::new(OracleSolver::new(EnumeratingOptimizer::new())),
        }
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::BruteForce => write!(f, "brute_force"),
            SolverBackend::Oracle => write!(f, "oracle"),
        }
    }
}

/// One aggregation method: solver, rule and λ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    /// Solver backend.
    #[serde(default)]
    pub solver: SolverBackend,
    /// Rule to apply.
    pub rule: Rule,
    /// Value substituted for zero agreement by `lamb-kemnash`.
    #[serde(default)]
    pub lambda: f64,
}

impl MethodConfig {
    /// Brute-force method for `rule` with λ = 0.
    pub fn new(rule: Rule) -> Self {
        Self {
            solver: SolverBackend::BruteForce,
            rule,
            lambda: 0.0,
        }
    }

    /// Sets λ.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the solver backend.
    pub fn with_solver(mut self, solver: SolverBackend) -> Self {
        self.solver = solver;
        self
    }

    /// Checks the method and returns it with the λ the rule actually uses.
    ///
    /// # Errors
    ///
    /// [`CompareError::Config`] for the composite rule, a solver error for an
    /// invalid λ.
    pub fn normalized(&self) -> Result<Self> {
        if self.rule == Rule::AllRules {
            return Err(CompareError::Config(
                "a pairwise method needs a single rule, not all_rules".to_string(),
            ));
        }
        Lambda::new(self.lambda)?;
        let needs_lambda = self.rule.spec().map_or(false, |spec| spec.needs_lambda);
        Ok(Self {
            lambda: if needs_lambda { self.lambda } else { 0.0 },
            ..*self
        })
    }

    /// Short label such as `brute_force/lamb-kemnash(0.1)`.
    pub fn label(&self) -> String {
        if self.rule == Rule::LambdaKemenyNash {
            format!("{}/{}({})", self.solver, self.rule, self.lambda)
        } else {
            format!("{}/{}", self.solver, self.rule)
        }
    }
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self::new(Rule::Kemeny)
    }
}

/// How many profiles to draw and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Profiles to draw; 0 walks the whole space.
    pub sample: usize,
    /// Profile spaces above this size are simulated.
    pub simulate_threshold: u128,
    /// Seed for sampled and simulated draws.
    pub seed: Option<u64>,
}

impl SamplingConfig {
    /// Sampling defaults of a λ sweep.
    pub fn sweep_default() -> Self {
        Self {
            sample: DEFAULT_SWEEP_SAMPLE,
            ..Self::default()
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample: 0,
            simulate_threshold: DEFAULT_SIMULATE_THRESHOLD,
            seed: None,
        }
    }
}

/// Exemplar collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleConfig {
    /// Maximum number of exemplar profiles kept.
    pub max_examples: usize,
    /// Keep profiles where both methods agree as well.
    pub all_examples: bool,
}

/// Execution settings shared by pairwise runs and sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Evaluate profile batches on the rayon pool.
    pub parallel: bool,
    /// Profiles per parallel batch.
    pub batch_size: usize,
    /// Log and skip profiles whose evaluation fails instead of aborting.
    pub skip_failures: bool,
    /// Wall-clock limit in seconds; the run stops between profiles.
    pub time_limit_secs: Option<f64>,
    /// Track per-profile minimum and maximum solve times.
    pub timing: bool,
    /// Seconds after which a one-time progress estimate is logged.
    pub progress_after_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            batch_size: 256,
            skip_failures: false,
            time_limit_secs: None,
            timing: true,
            progress_after_secs: 60,
        }
    }
}

impl RunConfig {
    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CompareError::Config("batch_size must be positive".to_string()));
        }
        if let Some(limit) = self.time_limit_secs {
            if !limit.is_finite() || limit < 0.0 {
                return Err(CompareError::Config(format!(
                    "time_limit_secs must be finite and non-negative, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// Configuration of a two-method comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairwiseConfig {
    /// Method A.
    #[serde(default)]
    pub first: MethodConfig,
    /// Method B.
    #[serde(default)]
    pub second: MethodConfig,
    /// Profile selection.
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Exemplar collection.
    #[serde(default)]
    pub examples: ExampleConfig,
    /// Execution settings.
    #[serde(default)]
    pub run: RunConfig,
}

impl PairwiseConfig {
    /// Compares `first` against `second` with default settings.
    pub fn new(first: MethodConfig, second: MethodConfig) -> Self {
        Self {
            first,
            second,
            ..Self::default()
        }
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CompareError::Config(e.to_string()))
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompareError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Sets the sample size.
    pub fn with_sample(mut self, sample: usize) -> Self {
        self.sampling.sample = sample;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sampling.seed = Some(seed);
        self
    }

    /// Keeps up to `max_examples` exemplars.
    pub fn with_examples(mut self, max_examples: usize, all_examples: bool) -> Self {
        self.examples = ExampleConfig {
            max_examples,
            all_examples,
        };
        self
    }

    /// Replaces the execution settings.
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    /// Returns true when both methods are the same after normalisation.
    pub fn is_single_method(&self) -> Result<bool> {
        Ok(self.first.normalized()? == self.second.normalized()?)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.first.normalized()?;
        self.second.normalized()?;
        self.run.validate()
    }
}

/// Configuration of a four-rule λ sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// λ values, in report order.
    pub lambdas: Vec<f64>,
    /// Solver backend for the four rules.
    pub solver: SolverBackend,
    /// Profile selection; only `sample` and `seed` apply.
    pub sampling: SamplingConfig,
    /// Execution settings.
    pub run: RunConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            lambdas: DEFAULT_SWEEP_LAMBDAS.to_vec(),
            solver: SolverBackend::BruteForce,
            sampling: SamplingConfig::sweep_default(),
            run: RunConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Sweep over `lambdas` with default settings.
    pub fn new(lambdas: Vec<f64>) -> Self {
        Self {
            lambdas,
            ..Self::default()
        }
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CompareError::Config(e.to_string()))
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompareError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Sets the sample size.
    pub fn with_sample(mut self, sample: usize) -> Self {
        self.sampling.sample = sample;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sampling.seed = Some(seed);
        self
    }

    /// Replaces the execution settings.
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.lambdas.is_empty() {
            return Err(CompareError::Config("the sweep needs at least one lambda".to_string()));
        }
        for &lambda in &self.lambdas {
            Lambda::new(lambda)?;
        }
        self.run.validate()
    }
}
