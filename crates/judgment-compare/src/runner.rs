//! The iterate-and-accumulate loop shared by pairwise runs and sweeps.
//!
//! ```text
//! ProfileStream ──batch──► evaluate (sequential or rayon) ──in order──► record
//!       ▲                                                                │
//!       └────── stop on exhaustion, cancellation or time limit ◄─────────┘
//! ```
//!
//! Evaluation is pure per profile; recording runs on the calling thread in
//! enumeration order, so parallel runs fold exactly like sequential ones.

use std::time::{Duration, Instant};

use judgment_profiles::ProfileStream;
use judgment_scenario::Profile;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::Result;

/// Counters of a finished loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RunSummary {
    pub completed: u64,
    pub skipped: u64,
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// One-time progress estimate.
struct Progress {
    after: Duration,
    planned: u128,
    reported: bool,
}

impl Progress {
    fn tick(&mut self, done: u64, elapsed: Duration) {
        if self.reported || done == 0 || elapsed < self.after {
            return;
        }
        self.reported = true;
        let estimate_min = self.planned as f64 * elapsed.as_secs_f64() / (done as f64 * 60.0);
        info!(
            "{}/{} profiles took {:.1}s; estimated total time {:.1} min",
            done,
            self.planned,
            elapsed.as_secs_f64(),
            estimate_min
        );
    }
}

/// Drives `stream` through `evaluate` and hands each result to `record`.
pub(crate) fn drive<T, F, R>(
    mut stream: ProfileStream<'_>,
    run: &RunConfig,
    cancel: &CancelToken,
    evaluate: F,
    mut record: R,
) -> Result<RunSummary>
where
    T: Send,
    F: Fn(Profile) -> Result<T> + Sync,
    R: FnMut(T),
{
    let started = Instant::now();
    let deadline = run
        .time_limit_secs
        .map(|secs| started + Duration::from_secs_f64(secs));
    let batch_size = if run.parallel { run.batch_size.max(1) } else { 1 };
    let mut progress = Progress {
        after: Duration::from_secs(run.progress_after_secs),
        planned: stream.iterations(),
        reported: false,
    };
    let mut summary = RunSummary::default();

    loop {
        let batch: Vec<Profile> = stream.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        if cancel.is_cancelled() || deadline.map_or(false, |d| Instant::now() >= d) {
            summary.cancelled = true;
            break;
        }

        let results: Vec<Result<T>> = if run.parallel {
            batch.into_par_iter().map(&evaluate).collect()
        } else {
            batch.into_iter().map(&evaluate).collect()
        };

        for result in results {
            match result {
                Ok(value) => {
                    record(value);
                    summary.completed += 1;
                }
                Err(err) if run.skip_failures => {
                    warn!("skipping profile: {}", err);
                    summary.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        progress.tick(summary.completed, started.elapsed());
    }

    summary.elapsed = started.elapsed();
    if summary.cancelled {
        warn!(
            "run stopped early after {} profiles ({:.1}s)",
            summary.completed,
            summary.elapsed.as_secs_f64()
        );
    }
    Ok(summary)
}
