use std::ops::Range;

use decaygen_core::errors::{DecayError, ErrorInfo};
use rayon::prelude::*;

use crate::config::EstimatorConfig;
use crate::determinism::rank_slice;

/// Visits every index of a range exactly once, spread over worker-local state.
///
/// `init` builds the state of one worker from its index; `body` is then
/// called on that state for every index of the worker's share. The returned
/// states are ordered by worker index.
pub trait Executor {
    /// Number of workers the range is split across.
    fn workers(&self) -> usize;

    /// Runs `body` over `range`, stopping at the first error.
    fn run<S, I, B>(&self, range: Range<u64>, init: I, body: B) -> Result<Vec<S>, DecayError>
    where
        S: Send,
        I: Fn(usize) -> Result<S, DecayError> + Sync,
        B: Fn(&mut S, u64) -> Result<(), DecayError> + Sync;
}

/// Splits `range` into at most `parts` contiguous, non-empty shares.
pub fn partition(range: Range<u64>, parts: usize) -> Vec<Range<u64>> {
    let parts = parts.max(1);
    (0..parts)
        .map(|index| rank_slice(range.clone(), index, parts))
        .filter(|share| !share.is_empty())
        .collect()
}

fn run_share<S, I, B>(worker: usize, share: Range<u64>, init: &I, body: &B) -> Result<S, DecayError>
where
    I: Fn(usize) -> Result<S, DecayError>,
    B: Fn(&mut S, u64) -> Result<(), DecayError>,
{
    let mut state = init(worker)?;
    for index in share {
        body(&mut state, index)?;
    }
    Ok(state)
}

/// Runs every share on the calling thread, in order.
///
/// The partition matches a [`RayonExecutor`] with the same worker count, so
/// both produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialExecutor {
    workers: usize,
}

impl SequentialExecutor {
    /// Emulates `workers` workers on the calling thread.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for SequentialExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Executor for SequentialExecutor {
    fn workers(&self) -> usize {
        self.workers
    }

    fn run<S, I, B>(&self, range: Range<u64>, init: I, body: B) -> Result<Vec<S>, DecayError>
    where
        S: Send,
        I: Fn(usize) -> Result<S, DecayError> + Sync,
        B: Fn(&mut S, u64) -> Result<(), DecayError> + Sync,
    {
        partition(range, self.workers)
            .into_iter()
            .enumerate()
            .map(|(worker, share)| run_share(worker, share, &init, &body))
            .collect()
    }
}

/// Runs shares on a dedicated rayon thread pool.
#[derive(Debug)]
pub struct RayonExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl RayonExecutor {
    /// Builds a pool with `threads` threads and as many workers.
    pub fn new(threads: usize) -> Result<Self, DecayError> {
        let workers = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("decaygen-worker-{index}"))
            .build()
            .map_err(|err| {
                DecayError::InvalidConfiguration(
                    ErrorInfo::new("thread-pool", err.to_string())
                        .with_context("threads", workers.to_string()),
                )
            })?;
        Ok(Self { pool, workers })
    }

    /// Builds a pool sized by the estimator configuration.
    pub fn from_config(config: &EstimatorConfig) -> Result<Self, DecayError> {
        Self::new(config.workers)
    }
}

impl Executor for RayonExecutor {
    fn workers(&self) -> usize {
        self.workers
    }

    fn run<S, I, B>(&self, range: Range<u64>, init: I, body: B) -> Result<Vec<S>, DecayError>
    where
        S: Send,
        I: Fn(usize) -> Result<S, DecayError> + Sync,
        B: Fn(&mut S, u64) -> Result<(), DecayError> + Sync,
    {
        let shares = partition(range, self.workers);
        self.pool.install(|| {
            shares
                .into_par_iter()
                .enumerate()
                .map(|(worker, share)| run_share(worker, share, &init, &body))
                .collect()
        })
    }
}
