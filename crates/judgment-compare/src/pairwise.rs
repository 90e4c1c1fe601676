//! # Pairwise Comparison
//!
//! Runs two aggregation methods over the same stream of profiles and
//! accumulates how their winner sets relate.
//!
//! ## Per Profile
//!
//! | Measure | Meaning |
//! |---------|---------|
//! | `sol1`, `sol2` | winner counts |
//! | `overlap` | winners shared by both |
//! | `prof_same` | identical winner sets |
//! | `prof_1same` | at least one shared winner |
//! | qualitative | [`OutcomeMeasures`] averaged over each tied set |
//! | zero effect | Kemeny against the Kemeny-Nash family only |
//!
//! When both methods are identical the second one is never computed and
//! only `sol1` and the first method's qualitative figures are reported.

use std::time::{Duration, Instant};

use judgment_profiles::{ProfilePlan, ProfileStream};
use judgment_rules::{Rule, RuleSolver};
use judgment_scenario::{Judgment, Profile, Scenario};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::{MethodConfig, PairwiseConfig};
use crate::error::{CompareError, Result};
use crate::report::{Exemplar, PairwiseReport};
use crate::runner::drive;
use crate::stats::{
    OutcomeMeasures, QualitativeSummary, QuantitativeTotals, SetComparison, ZeroEffect,
    ZeroEffectTotals,
};
use crate::timing::MethodTiming;

/// Everything computed for one profile.
struct Evaluation {
    profile: Profile,
    first: Vec<usize>,
    second: Option<Vec<usize>>,
    first_time: Duration,
    second_time: Duration,
    first_measures: Vec<OutcomeMeasures>,
    second_measures: Vec<OutcomeMeasures>,
}

/// Running totals, folded in enumeration order.
struct Accumulator {
    quantitative: QuantitativeTotals,
    first_quality: QualitativeSummary,
    second_quality: QualitativeSummary,
    zero_effect: ZeroEffectTotals,
    first_timing: MethodTiming,
    second_timing: MethodTiming,
    examples: Vec<Exemplar>,
}

/// A configured comparison of two methods on one scenario.
pub struct PairwiseComparison<'a> {
    scenario: &'a Scenario,
    config: PairwiseConfig,
    first: MethodConfig,
    second: MethodConfig,
    single_method: bool,
    track_zero_effect: bool,
    first_solver: Box<dyn RuleSolver>,
    second_solver: Box<dyn RuleSolver>,
    cancel: CancelToken,
}

impl<'a> PairwiseComparison<'a> {
    /// Validates `config` and prepares both solvers.
    ///
    /// # Errors
    ///
    /// [`CompareError::Config`] for unusable settings, a solver error for an
    /// invalid λ.
    pub fn new(scenario: &'a Scenario, config: PairwiseConfig) -> Result<Self> {
        config.validate()?;
        let first = config.first.normalized()?;
        let second = config.second.normalized()?;
        let single_method = first == second;
        let track_zero_effect =
            !single_method && first.rule == Rule::Kemeny && second.rule.is_kemeny_nash();
        debug!(
            "pairwise comparison: {} vs {} (single method: {})",
            first.label(),
            second.label(),
            single_method
        );
        Ok(Self {
            scenario,
            first_solver: first.solver.build(),
            second_solver: second.solver.build(),
            config,
            first,
            second,
            single_method,
            track_zero_effect,
            cancel: CancelToken::new(),
        })
    }

    /// Uses `cancel` to stop the run from elsewhere.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns true when both methods are identical.
    pub fn is_single_method(&self) -> bool {
        self.single_method
    }

    /// The sampling plan this comparison follows.
    pub fn plan(&self) -> ProfilePlan {
        ProfilePlan::for_comparison(
            self.scenario.num_profiles(),
            self.config.sampling.sample,
            self.config.sampling.simulate_threshold,
        )
    }

    /// Evaluates every planned profile and builds the report.
    ///
    /// # Errors
    ///
    /// The first solver error unless `skip_failures` is set, and
    /// [`CompareError::EmptyRun`] when no profile completed.
    pub fn run(&self) -> Result<PairwiseReport> {
        let plan = self.plan();
        info!(
            "comparing {} and {} over {} of {} profiles ({})",
            self.first.label(),
            self.second.label(),
            plan.iterations,
            plan.total,
            plan.mode
        );
        let stream = ProfileStream::for_scenario(self.scenario, plan, self.config.sampling.seed);

        let timing = self.config.run.timing;
        let mut acc = Accumulator {
            quantitative: QuantitativeTotals::default(),
            first_quality: QualitativeSummary::default(),
            second_quality: QualitativeSummary::default(),
            zero_effect: ZeroEffectTotals::default(),
            first_timing: MethodTiming::new(timing),
            second_timing: MethodTiming::new(timing),
            examples: Vec::new(),
        };

        let summary = drive(
            stream,
            &self.config.run,
            &self.cancel,
            |profile| self.evaluate(profile),
            |evaluation| self.record(&mut acc, evaluation),
        )?;

        if summary.completed == 0 {
            return Err(CompareError::EmptyRun);
        }
        let completed = summary.completed;
        let divisor = completed as f64;
        let quantitative = acc.quantitative;

        let report = PairwiseReport {
            run_id: Uuid::new_v4(),
            fingerprint: self.scenario.fingerprint(),
            first: self.first,
            second: self.second,
            single_method: self.single_method,
            number_voters: self.scenario.number_voters(),
            plan,
            completed,
            skipped: summary.skipped,
            cancelled: summary.cancelled,
            quantitative,
            symmetric_difference: (!self.single_method)
                .then(|| quantitative.symmetric_difference())
                .flatten(),
            rules_equivalent: (!self.single_method).then(|| quantitative.prof_same == completed),
            first_quality: acc.first_quality.divided_by(divisor),
            second_quality: (!self.single_method).then(|| acc.second_quality.divided_by(divisor)),
            zero_effect: self
                .track_zero_effect
                .then(|| acc.zero_effect.finish(completed)),
            first_timing: acc.first_timing.finish(completed),
            second_timing: (!self.single_method).then(|| acc.second_timing.finish(completed)),
            elapsed_secs: summary.elapsed.as_secs_f64(),
            examples: acc.examples,
        };
        info!(
            "comparison {} finished: {} profiles, {} skipped, {:.3}s",
            report.run_id, report.completed, report.skipped, report.elapsed_secs
        );
        Ok(report)
    }

    fn evaluate(&self, profile: Profile) -> Result<Evaluation> {
        let started = Instant::now();
        let first = self.first_solver.solve_indices(
            self.scenario,
            &profile,
            self.first.rule,
            self.first.lambda,
        )?;
        let first_time = started.elapsed();

        let (second, second_time) = if self.single_method {
            (None, Duration::ZERO)
        } else {
            let started = Instant::now();
            let second = self.second_solver.solve_indices(
                self.scenario,
                &profile,
                self.second.rule,
                self.second.lambda,
            )?;
            (Some(second), started.elapsed())
        };

        let first_measures = self.measures(&first, &profile);
        let second_measures = second
            .as_deref()
            .map(|indices| self.measures(indices, &profile))
            .unwrap_or_default();
        Ok(Evaluation {
            profile,
            first,
            second,
            first_time,
            second_time,
            first_measures,
            second_measures,
        })
    }

    fn measures(&self, indices: &[usize], profile: &Profile) -> Vec<OutcomeMeasures> {
        let outcomes = self.scenario.out_consistent();
        indices
            .iter()
            .filter_map(|&i| outcomes.get(i))
            .map(|outcome| OutcomeMeasures::of(outcome, profile))
            .collect()
    }

    fn outcomes(&self, indices: &[usize]) -> Vec<Judgment> {
        let outcomes = self.scenario.out_consistent();
        indices.iter().filter_map(|&i| outcomes.get(i).cloned()).collect()
    }

    fn record(&self, acc: &mut Accumulator, evaluation: Evaluation) {
        let Evaluation {
            profile,
            first,
            second,
            first_time,
            second_time,
            first_measures,
            second_measures,
        } = evaluation;

        acc.first_timing.record(first_time, &profile);
        acc.first_quality += QualitativeSummary::average(&first_measures);

        let same = match &second {
            None => {
                acc.quantitative.sol1 += first.len() as u64;
                true
            }
            Some(second) => {
                let comparison = SetComparison::of(&first, second);
                acc.quantitative.record(&comparison);
                acc.second_timing.record(second_time, &profile);
                acc.second_quality += QualitativeSummary::average(&second_measures);
                if self.track_zero_effect {
                    let a: Vec<f64> = first_measures.iter().map(|m| m.mean_deviation).collect();
                    let b: Vec<f64> = second_measures.iter().map(|m| m.mean_deviation).collect();
                    acc.zero_effect.record(ZeroEffect::compare(&a, &b));
                }
                comparison.same()
            }
        };

        let examples = &self.config.examples;
        if acc.examples.len() < examples.max_examples && (examples.all_examples || !same) {
            let first_outcomes = self.outcomes(&first);
            let (second_outcomes, second_measures) = match &second {
                Some(second) => (self.outcomes(second), second_measures),
                None => (first_outcomes.clone(), first_measures.clone()),
            };
            acc.examples.push(Exemplar {
                profile,
                first: first_outcomes,
                second: second_outcomes,
                same,
                first_measures,
                second_measures,
            });
        }
    }
}
