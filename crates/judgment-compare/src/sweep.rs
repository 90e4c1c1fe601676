//! # Lambda Sweep
//!
//! Runs the four base rules together (`all_rules`) for each λ of a list and
//! reports how Kemeny-Nash moves between utilitarian Kemeny and the
//! egalitarian Maxham/Maxeq as λ grows.
//!
//! ```text
//! for λ in lambdas:
//!     same seed ─► ProfileStream ─► solve_all(λ) ─► accumulate ─► SweepPoint
//! ```
//!
//! Every λ replays the same profiles, so differences between points come
//! from λ alone.

use std::time::Instant;

use judgment_profiles::{ProfilePlan, ProfileStream};
use judgment_rules::{AllRulesOutcome, RuleSolver};
use judgment_scenario::{Profile, Scenario};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::SweepConfig;
use crate::error::{CompareError, Result};
use crate::report::{
    EgalitarianRatios, MeanRatios, PairFigures, RuleFigures, SweepPoint, SweepReport,
};
use crate::runner::drive;
use crate::stats::{
    ratio, symmetric_difference_ratio, OutcomeMeasures, QualitativeSummary, SetComparison,
    ZeroEffect, ZeroEffectTotals,
};

const KEMENY: usize = 0;
const KEMENY_NASH: usize = 1;
const MAXHAM: usize = 2;
const MAXEQ: usize = 3;

/// Rule pairs in report order.
const PAIRS: [(usize, usize); 5] = [
    (KEMENY, KEMENY_NASH),
    (KEMENY, MAXHAM),
    (KEMENY, MAXEQ),
    (KEMENY_NASH, MAXHAM),
    (KEMENY_NASH, MAXEQ),
];

/// Winners and measures of the four rules on one profile.
struct Evaluation {
    winners: [Vec<usize>; 4],
    measures: [Vec<OutcomeMeasures>; 4],
}

#[derive(Debug, Clone, Copy, Default)]
struct PairTotals {
    first: u64,
    second: u64,
    overlap: u64,
    symmetric: u64,
}

#[derive(Debug, Default)]
struct Accumulator {
    solutions: [u64; 4],
    pairs: [PairTotals; 5],
    quality: [QualitativeSummary; 4],
    zero_effect: ZeroEffectTotals,
    zero_effect_sd: f64,
}

impl Accumulator {
    fn record(&mut self, evaluation: Evaluation) {
        let Evaluation { winners, measures } = evaluation;
        for rule in 0..4 {
            self.solutions[rule] += winners[rule].len() as u64;
            self.quality[rule] += QualitativeSummary::average(&measures[rule]);
        }
        for (totals, &(a, b)) in self.pairs.iter_mut().zip(PAIRS.iter()) {
            let comparison = SetComparison::of(&winners[a], &winners[b]);
            totals.first += comparison.first as u64;
            totals.second += comparison.second as u64;
            totals.overlap += comparison.overlap as u64;
            totals.symmetric += comparison.symmetric_difference() as u64;
        }

        let deviations = |rule: usize| measures[rule].iter().map(|m| m.mean_deviation).collect::<Vec<_>>();
        self.zero_effect
            .record(ZeroEffect::compare(&deviations(KEMENY), &deviations(KEMENY_NASH)));
        let sds = |rule: usize| measures[rule].iter().map(|m| m.standard_deviation).collect::<Vec<_>>();
        self.zero_effect_sd += ZeroEffect::compare(&sds(KEMENY), &sds(KEMENY_NASH)).dominated_share;
    }

    fn finish(&self, lambda: f64, completed: u64, skipped: u64, cancelled: bool, outcomes: usize) -> SweepPoint {
        let n = completed.max(1) as f64;
        let per_profile = |rule: usize| self.solutions[rule] as f64 / n;
        let normalised = |pair: usize| self.pairs[pair].symmetric as f64 / n / outcomes.max(1) as f64;
        let jaccard = |pair: usize| {
            let t = &self.pairs[pair];
            symmetric_difference_ratio(t.first, t.second, t.overlap)
        };
        let q = &self.quality;
        SweepPoint {
            lambda,
            completed,
            skipped,
            cancelled,
            solutions_per_profile: RuleFigures {
                kemeny: per_profile(KEMENY),
                kemeny_nash: per_profile(KEMENY_NASH),
                maxham: per_profile(MAXHAM),
                maxeq: per_profile(MAXEQ),
            },
            symmetric_difference: PairFigures {
                kemeny_kemeny_nash: normalised(0),
                kemeny_maxham: normalised(1),
                kemeny_maxeq: normalised(2),
                kemeny_nash_maxham: normalised(3),
                kemeny_nash_maxeq: normalised(4),
            },
            jaccard: PairFigures {
                kemeny_kemeny_nash: jaccard(0),
                kemeny_maxham: jaccard(1),
                kemeny_maxeq: jaccard(2),
                kemeny_nash_maxham: jaccard(3),
                kemeny_nash_maxeq: jaccard(4),
            },
            mean_ratio: MeanRatios {
                kemeny_nash: ratio(q[KEMENY_NASH].mean_agreement, q[KEMENY].mean_agreement),
                maxham: ratio(q[MAXHAM].mean_agreement, q[KEMENY].mean_agreement),
                maxeq: ratio(q[MAXEQ].mean_agreement, q[KEMENY].mean_agreement),
            },
            low_ratio: EgalitarianRatios {
                kemeny: ratio(q[KEMENY].low_agreement, q[MAXHAM].low_agreement),
                kemeny_nash: ratio(q[KEMENY_NASH].low_agreement, q[MAXHAM].low_agreement),
            },
            spread_ratio: EgalitarianRatios {
                kemeny: ratio(q[KEMENY].spread, q[MAXEQ].spread),
                kemeny_nash: ratio(q[KEMENY_NASH].spread, q[MAXEQ].spread),
            },
            zero_effect: self.zero_effect.finish(completed),
            zero_effect_sd: self.zero_effect_sd / n,
            qualitative: RuleFigures {
                kemeny: q[KEMENY].divided_by(n),
                kemeny_nash: q[KEMENY_NASH].divided_by(n),
                maxham: q[MAXHAM].divided_by(n),
                maxeq: q[MAXEQ].divided_by(n),
            },
        }
    }
}

/// A configured λ sweep on one scenario.
pub struct LambdaSweep<'a> {
    scenario: &'a Scenario,
    config: SweepConfig,
    solver: Box<dyn RuleSolver>,
    cancel: CancelToken,
}

impl<'a> LambdaSweep<'a> {
    /// Validates `config` and prepares the solver.
    ///
    /// # Errors
    ///
    /// [`CompareError::Config`] for an empty λ list or bad run settings, a
    /// solver error for an invalid λ.
    pub fn new(scenario: &'a Scenario, config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scenario,
            solver: config.solver.build(),
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Uses `cancel` to stop the sweep from elsewhere.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The sampling plan of every point. A zero sample walks the whole space.
    pub fn plan(&self) -> ProfilePlan {
        let total = self.scenario.num_profiles();
        match self.config.sampling.sample {
            0 => ProfilePlan::exhaustive(total),
            sample => ProfilePlan::for_sweep(total, sample),
        }
    }

    /// Evaluates every λ in order.
    ///
    /// A cancelled sweep reports the points finished so far, including the
    /// interrupted one if it completed any profile.
    ///
    /// # Errors
    ///
    /// The first solver error unless `skip_failures` is set, and
    /// [`CompareError::EmptyRun`] when the first λ completed no profile.
    pub fn run(&self) -> Result<SweepReport> {
        let plan = self.plan();
        let seed = self.config.sampling.seed.unwrap_or_else(rand::random);
        let outcomes = self.scenario.out_consistent().len();
        info!(
            "sweeping {} lambda values over {} of {} profiles ({}, seed {})",
            self.config.lambdas.len(),
            plan.iterations,
            plan.total,
            plan.mode,
            seed
        );

        let started = Instant::now();
        let mut points = Vec::with_capacity(self.config.lambdas.len());
        let mut cancelled = false;
        for &lambda in &self.config.lambdas {
            let stream = ProfileStream::for_scenario(self.scenario, plan, Some(seed));
            let mut acc = Accumulator::default();
            let summary = drive(
                stream,
                &self.config.run,
                &self.cancel,
                |profile| self.evaluate(profile, lambda),
                |evaluation| acc.record(evaluation),
            )?;
            debug!(
                "lambda {}: {} profiles in {:.3}s",
                lambda,
                summary.completed,
                summary.elapsed.as_secs_f64()
            );
            if summary.completed > 0 {
                points.push(acc.finish(
                    lambda,
                    summary.completed,
                    summary.skipped,
                    summary.cancelled,
                    outcomes,
                ));
            }
            if summary.cancelled {
                cancelled = true;
                break;
            }
        }
        if points.is_empty() {
            return Err(CompareError::EmptyRun);
        }

        let report = SweepReport {
            run_id: Uuid::new_v4(),
            fingerprint: self.scenario.fingerprint(),
            solver: self.config.solver,
            number_voters: self.scenario.number_voters(),
            plan,
            seed,
            points,
            cancelled,
            elapsed_secs: started.elapsed().as_secs_f64(),
        };
        info!(
            "sweep {} finished: {} lambda values, {:.3}s",
            report.run_id,
            report.points.len(),
            report.elapsed_secs
        );
        Ok(report)
    }

    fn evaluate(&self, profile: Profile, lambda: f64) -> Result<Evaluation> {
        let all = self.solver.solve_all(self.scenario, &profile, lambda)?;
        let AllRulesOutcome {
            kemeny,
            kemeny_nash,
            maxham,
            maxeq,
        } = all;
        let winners = [kemeny, kemeny_nash, maxham, maxeq];
        let measures = [0, 1, 2, 3].map(|rule| OutcomeMeasures::of_all(&winners[rule].outcomes, &profile));
        Ok(Evaluation {
            winners: winners.map(|w| w.indices),
            measures,
        })
    }
}
