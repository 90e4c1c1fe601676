//! Solve-time bookkeeping per method.

use std::time::Duration;

use judgment_scenario::Profile;
use serde::{Deserialize, Serialize};

/// Accumulates solve times for one method.
#[derive(Debug, Clone, Default)]
pub struct MethodTiming {
    total: Duration,
    track_extremes: bool,
    fastest: Option<(Duration, Profile)>,
    slowest: Option<(Duration, Profile)>,
}

impl MethodTiming {
    /// Creates an accumulator. Extremes are only kept when `track_extremes` is set.
    pub fn new(track_extremes: bool) -> Self {
        Self {
            track_extremes,
            ..Self::default()
        }
    }

    /// Adds one solve. The first profile to reach a new extreme keeps it.
    pub fn record(&mut self, elapsed: Duration, profile: &Profile) {
        self.total += elapsed;
        if !self.track_extremes {
            return;
        }
        if self.fastest.as_ref().map_or(true, |(best, _)| elapsed < *best) {
            self.fastest = Some((elapsed, profile.clone()));
        }
        if self.slowest.as_ref().map_or(true, |(worst, _)| elapsed > *worst) {
            self.slowest = Some((elapsed, profile.clone()));
        }
    }

    /// Total time spent solving.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Summarises `completed` solves.
    pub fn finish(&self, completed: u64) -> TimingReport {
        let total_secs = self.total.as_secs_f64();
        let min_secs = self.fastest.as_ref().map(|(d, _)| d.as_secs_f64());
        let max_secs = self.slowest.as_ref().map(|(d, _)| d.as_secs_f64());
        let ratio = match (&self.fastest, &self.slowest) {
            (Some((fast, _)), Some((slow, _))) if !fast.is_zero() => {
                Some((slow.as_nanos() / fast.as_nanos()) as u64)
            }
            _ => None,
        };
        TimingReport {
            total_secs,
            min_secs,
            max_secs,
            min_profile: self.fastest.as_ref().map(|(_, p)| p.to_string()),
            max_profile: self.slowest.as_ref().map(|(_, p)| p.to_string()),
            ratio,
            iterations_per_sec: (total_secs > 0.0).then(|| completed as f64 / total_secs),
        }
    }
}

/// Timing figures of one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingReport {
    /// Seconds spent solving.
    pub total_secs: f64,
    /// Fastest single solve.
    pub min_secs: Option<f64>,
    /// Slowest single solve.
    pub max_secs: Option<f64>,
    /// Profile of the fastest solve.
    pub min_profile: Option<String>,
    /// Profile of the slowest solve.
    pub max_profile: Option<String>,
    /// Slowest over fastest, rounded down.
    pub ratio: Option<u64>,
    /// Completed profiles per solving second.
    pub iterations_per_sec: Option<f64>,
}
