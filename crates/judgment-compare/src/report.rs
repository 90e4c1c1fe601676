//! Run reports.
//!
//! Reports are plain data: `Serialize` for machine consumption and
//! `Display` for the terminal. Each one carries a fresh run id and the
//! fingerprint of the scenario it was computed on.

use std::fmt;

use judgment_profiles::ProfilePlan;
use judgment_scenario::{Judgment, Profile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{MethodConfig, SolverBackend};
use crate::stats::{OutcomeMeasures, QualitativeSummary, QuantitativeTotals, ZeroEffectReport};
use crate::timing::TimingReport;

/// A profile kept for inspection together with both winner lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    /// The profile.
    pub profile: Profile,
    /// Winners of method A.
    pub first: Vec<Judgment>,
    /// Winners of method B.
    pub second: Vec<Judgment>,
    /// Both winner lists are identical.
    pub same: bool,
    /// Measures of each A-winner, in list order.
    pub first_measures: Vec<OutcomeMeasures>,
    /// Measures of each B-winner, in list order.
    pub second_measures: Vec<OutcomeMeasures>,
}

/// Result of a pairwise comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Scenario fingerprint.
    pub fingerprint: String,
    /// Method A, normalised.
    pub first: MethodConfig,
    /// Method B, normalised.
    pub second: MethodConfig,
    /// Both methods are identical; B was never computed.
    pub single_method: bool,
    /// Electorate size.
    pub number_voters: usize,
    /// Sampling plan.
    pub plan: ProfilePlan,
    /// Profiles evaluated.
    pub completed: u64,
    /// Profiles skipped after a failure.
    pub skipped: u64,
    /// The run stopped before the plan was exhausted.
    pub cancelled: bool,
    /// Summed set sizes and overlaps.
    pub quantitative: QuantitativeTotals,
    /// Symmetric difference from the run totals.
    pub symmetric_difference: Option<f64>,
    /// Every completed profile had identical winner sets.
    pub rules_equivalent: Option<bool>,
    /// Per-profile averages for method A.
    pub first_quality: QualitativeSummary,
    /// Per-profile averages for method B.
    pub second_quality: Option<QualitativeSummary>,
    /// Zero effect of B against A, for Kemeny against the Kemeny-Nash family.
    pub zero_effect: Option<ZeroEffectReport>,
    /// Solve times of method A.
    pub first_timing: TimingReport,
    /// Solve times of method B.
    pub second_timing: Option<TimingReport>,
    /// Wall-clock seconds for the whole run.
    pub elapsed_secs: f64,
    /// Collected exemplars.
    pub examples: Vec<Exemplar>,
}

impl PairwiseReport {
    /// Average number of A-winners per profile.
    pub fn first_solutions_per_profile(&self) -> f64 {
        self.quantitative.sol1 as f64 / self.completed.max(1) as f64
    }

    /// Average number of B-winners per profile.
    pub fn second_solutions_per_profile(&self) -> Option<f64> {
        (!self.single_method).then(|| self.quantitative.sol2 as f64 / self.completed.max(1) as f64)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn write_quality(f: &mut fmt::Formatter<'_>, label: &str, q: &QualitativeSummary) -> fmt::Result {
    writeln!(
        f,
        "  {:<6} mean {:.4}  mean_dev {:.4}  sd {:.4}  below {:.4}  low {:.4}  spread {:.4}",
        label,
        q.mean_agreement,
        q.mean_deviation,
        q.standard_deviation,
        q.below_mean,
        q.low_agreement,
        q.spread
    )
}

fn write_timing(f: &mut fmt::Formatter<'_>, label: &str, t: &TimingReport) -> fmt::Result {
    write!(f, "  {:<6} total {:.3}s", label, t.total_secs)?;
    if let Some(rate) = t.iterations_per_sec {
        write!(f, "  {:.1} profiles/s", rate)?;
    }
    if let (Some(min), Some(max)) = (t.min_secs, t.max_secs) {
        write!(f, "  min {:.6}s  max {:.6}s", min, max)?;
    }
    if let Some(ratio) = t.ratio {
        write!(f, "  max/min {}", ratio)?;
    }
    writeln!(f)
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for PairwiseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pairwise comparison {}", self.run_id)?;
        writeln!(f, "  scenario {}", self.fingerprint)?;
        writeln!(f, "  A: {}", self.first.label())?;
        if self.single_method {
            writeln!(f, "  B: same as A")?;
        } else {
            writeln!(f, "  B: {}", self.second.label())?;
        }
        writeln!(
            f,
            "  profiles: {} of {} ({}, {} voters), {} skipped{}",
            self.completed,
            self.plan.total,
            self.plan.mode,
            self.number_voters,
            self.skipped,
            if self.cancelled { ", cancelled" } else { "" }
        )?;

        writeln!(f, "Quantitative")?;
        let q = &self.quantitative;
        writeln!(
            f,
            "  sol1 {} ({:.4}/profile)",
            q.sol1,
            self.first_solutions_per_profile()
        )?;
        if let Some(per_profile) = self.second_solutions_per_profile() {
            writeln!(f, "  sol2 {} ({:.4}/profile)", q.sol2, per_profile)?;
            writeln!(
                f,
                "  overlap {} (same {}, dif {})",
                q.overlap, q.overlap_same, q.overlap_dif
            )?;
            writeln!(
                f,
                "  prof_same {}  prof_1same {}  rules_equivalent {}",
                q.prof_same,
                q.prof_1same,
                self.rules_equivalent.unwrap_or(false)
            )?;
            writeln!(
                f,
                "  symmetric difference {}",
                format_optional(self.symmetric_difference)
            )?;
        }

        writeln!(f, "Qualitative (per profile)")?;
        write_quality(f, "A", &self.first_quality)?;
        if let Some(second) = &self.second_quality {
            write_quality(f, "B", second)?;
        }
        if let Some(ze) = &self.zero_effect {
            writeln!(
                f,
                "  zero effect {:.4} of profiles ({:.4} outcome-weighted)",
                ze.profile_share, ze.outcome_weighted
            )?;
        }

        writeln!(f, "Timing ({:.3}s wall clock)", self.elapsed_secs)?;
        write_timing(f, "A", &self.first_timing)?;
        if let Some(second) = &self.second_timing {
            write_timing(f, "B", second)?;
        }

        for (i, example) in self.examples.iter().enumerate() {
            writeln!(f, "Example {}: {}", i + 1, example.profile)?;
            let sigs = |js: &[Judgment]| js.iter().map(Judgment::signature).collect::<Vec<_>>().join(" ");
            writeln!(f, "  A: {}", sigs(&example.first))?;
            writeln!(f, "  B: {}", sigs(&example.second))?;
        }
        Ok(())
    }
}

/// One value per base rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFigures<T> {
    /// Kemeny.
    pub kemeny: T,
    /// Kemeny-Nash at the sweep's λ.
    pub kemeny_nash: T,
    /// Maxham.
    pub maxham: T,
    /// Maxeq.
    pub maxeq: T,
}

/// One value per compared rule pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PairFigures<T> {
    /// Kemeny against Kemeny-Nash.
    pub kemeny_kemeny_nash: T,
    /// Kemeny against Maxham.
    pub kemeny_maxham: T,
    /// Kemeny against Maxeq.
    pub kemeny_maxeq: T,
    /// Kemeny-Nash against Maxham.
    pub kemeny_nash_maxham: T,
    /// Kemeny-Nash against Maxeq.
    pub kemeny_nash_maxeq: T,
}

/// Accumulated means relative to Kemeny.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanRatios {
    /// Kemeny-Nash over Kemeny.
    pub kemeny_nash: Option<f64>,
    /// Maxham over Kemeny.
    pub maxham: Option<f64>,
    /// Maxeq over Kemeny.
    pub maxeq: Option<f64>,
}

/// Kemeny and Kemeny-Nash relative to an egalitarian reference rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EgalitarianRatios {
    /// Kemeny over the reference.
    pub kemeny: Option<f64>,
    /// Kemeny-Nash over the reference.
    pub kemeny_nash: Option<f64>,
}

/// Figures for one λ of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// λ used by Kemeny-Nash.
    pub lambda: f64,
    /// Profiles evaluated.
    pub completed: u64,
    /// Profiles skipped after a failure.
    pub skipped: u64,
    /// The point stopped before its plan was exhausted.
    pub cancelled: bool,
    /// Average winners per profile.
    pub solutions_per_profile: RuleFigures<f64>,
    /// Summed |A Δ B| over completed profiles and feasible outcomes.
    pub symmetric_difference: PairFigures<f64>,
    /// Symmetric difference ratio from the run totals.
    pub jaccard: PairFigures<Option<f64>>,
    /// Mean agreement relative to Kemeny.
    pub mean_ratio: MeanRatios,
    /// Lowest agreement relative to Maxham.
    pub low_ratio: EgalitarianRatios,
    /// Spread relative to Maxeq.
    pub spread_ratio: EgalitarianRatios,
    /// Zero effect of Kemeny-Nash against Kemeny by mean deviation.
    pub zero_effect: ZeroEffectReport,
    /// Outcome-weighted zero effect by standard deviation.
    pub zero_effect_sd: f64,
    /// Per-profile qualitative averages for each rule.
    pub qualitative: RuleFigures<QualitativeSummary>,
}

/// Result of a λ sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Scenario fingerprint.
    pub fingerprint: String,
    /// Solver backend used for all four rules.
    pub solver: SolverBackend,
    /// Electorate size.
    pub number_voters: usize,
    /// Sampling plan of every point.
    pub plan: ProfilePlan,
    /// Seed shared by every point.
    pub seed: u64,
    /// One entry per completed λ, in configuration order.
    pub points: Vec<SweepPoint>,
    /// The sweep stopped early.
    pub cancelled: bool,
    /// Wall-clock seconds for the whole sweep.
    pub elapsed_secs: f64,
}

impl SweepReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lambda sweep {}", self.run_id)?;
        writeln!(f, "  scenario {}", self.fingerprint)?;
        writeln!(
            f,
            "  {} profiles per lambda of {} ({}, {} voters, seed {}){}",
            self.plan.iterations,
            self.plan.total,
            self.plan.mode,
            self.number_voters,
            self.seed,
            if self.cancelled { ", cancelled" } else { "" }
        )?;
        writeln!(
            f,
            "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "lambda", "K-KN", "K-MH", "K-ME", "KN-MH", "KN-ME", "sol K", "sol KN", "R-mKN", "ZE"
        )?;
        for point in &self.points {
            let sd = &point.symmetric_difference;
            writeln!(
                f,
                "{:>6} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8} {:>8.4}",
                point.lambda,
                sd.kemeny_kemeny_nash,
                sd.kemeny_maxham,
                sd.kemeny_maxeq,
                sd.kemeny_nash_maxham,
                sd.kemeny_nash_maxeq,
                point.solutions_per_profile.kemeny,
                point.solutions_per_profile.kemeny_nash,
                format_optional(point.mean_ratio.kemeny_nash),
                point.zero_effect.profile_share
            )?;
        }
        Ok(())
    }
}
