use decaygen_core::{DecayError, PhaseSpaceMap};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accumulate::{block_length, combine, BlockAccumulator};
use crate::determinism::{rank_slice, worker_seed};
use crate::executor::Executor;
use crate::reduce::Reducer;
use crate::sampler::{unit_bias, MetropolisSampler};

/// Normalization of a bias function relative to the unbiased target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationEstimate {
    /// Mean of the bias over unit-bias samples.
    pub value: f64,
    /// Monte Carlo standard error of `value`.
    pub std_error: f64,
    /// `(value / std_error)^2`.
    pub effective_samples: f64,
}

impl NormalizationEstimate {
    /// Result of an estimate over zero samples: `(NaN, NaN, 0)`.
    pub fn degenerate() -> Self {
        Self {
            value: f64::NAN,
            std_error: f64::NAN,
            effective_samples: 0.0,
        }
    }

    /// Whether this is the zero-sample sentinel.
    pub fn is_degenerate(&self) -> bool {
        self.value.is_nan() && self.std_error.is_nan() && self.effective_samples == 0.0
    }

    /// Builds the estimate from the global sums over `samples` bias values.
    pub fn from_sums(sum: f64, sum_squares: f64, samples: u64) -> Self {
        if samples == 0 {
            return Self::degenerate();
        }
        let n = samples as f64;
        let value = sum / n;
        if sum_squares <= 0.0 {
            return Self {
                value,
                std_error: 0.0,
                effective_samples: 0.0,
            };
        }
        let std_error = sum_squares.sqrt() / n;
        Self {
            value,
            std_error,
            effective_samples: (value / std_error).powi(2),
        }
    }
}

/// Estimates `∫ bias dΦ` with chains forked from a production sampler.
///
/// Every local worker runs its own unit-bias chain, seeded from a single
/// draw of the production sampler's engine. That draw is the only trace an
/// estimate leaves on the production sampler; its bias, readiness and chain
/// state are never touched.
#[derive(Debug)]
pub struct NormalizationEstimator<E, R> {
    executor: E,
    reducer: R,
}

impl<E: Executor, R: Reducer> NormalizationEstimator<E, R> {
    /// Combines a local executor with a reduction group.
    pub fn new(executor: E, reducer: R) -> Self {
        Self { executor, reducer }
    }

    /// Local executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Reduction group.
    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Estimates the normalization of `sampler`'s bias from `samples` draws
    /// in total across the reduction group.
    ///
    /// With a group of several participants each one must call this with the
    /// same `samples` and an equivalently configured sampler.
    pub fn estimate<const N: usize, P: PhaseSpaceMap<N>>(
        &self,
        sampler: &mut MetropolisSampler<N, P>,
        samples: u64,
    ) -> Result<NormalizationEstimate, DecayError> {
        if samples == 0 {
            return Ok(NormalizationEstimate::degenerate());
        }
        let fork_seed = sampler.draw_fork_seed()?;
        let template = &*sampler;
        let bias = template.bias();
        let discard = template.config().discard;
        let rank = self.reducer.rank();
        let total_workers = self.reducer.size() * self.executor.workers();
        let block = block_length(samples, total_workers);
        info!(samples, rank, workers = total_workers, block, "normalization estimate started");

        let workers = self.executor.run(
            rank_slice(0..samples, rank, self.reducer.size()),
            |worker| {
                let mut chain = template.fork(worker_seed(fork_seed, rank, worker), unit_bias());
                chain.initialize()?;
                Ok((chain, BlockAccumulator::new(block)))
            },
            |state: &mut (MetropolisSampler<N, P>, BlockAccumulator), _| {
                let (chain, sums) = state;
                let (event, _) = chain.sample(discard)?;
                sums.push(bias(&event.final_state));
                Ok(())
            },
        )?;
        let local = workers
            .into_iter()
            .map(|(_, sums)| sums.finish())
            .fold([0.0; 2], combine);
        let [sum, sum_squares] = self.reducer.all_reduce_sum(local)?;

        let estimate = NormalizationEstimate::from_sums(sum, sum_squares, samples);
        if sum_squares <= 0.0 {
            warn!(samples, "bias vanished on every sample; effective sample size set to zero");
        }
        info!(
            samples,
            rank,
            workers = total_workers,
            value = estimate.value,
            std_error = estimate.std_error,
            effective_samples = estimate.effective_samples,
            "normalization estimate finished"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sentinel_is_recognised() {
        let sentinel = NormalizationEstimate::degenerate();
        assert!(sentinel.is_degenerate());
        assert!(NormalizationEstimate::from_sums(0.0, 0.0, 0).is_degenerate());
    }

    #[test]
    fn unit_values_give_full_effective_size() {
        let estimate = NormalizationEstimate::from_sums(100.0, 100.0, 100);
        assert_eq!(estimate.value, 1.0);
        assert!((estimate.std_error - 0.1).abs() < 1e-15);
        assert!((estimate.effective_samples - 100.0).abs() < 1e-9);
    }

    #[test]
    fn vanishing_bias_reports_no_effective_samples() {
        let estimate = NormalizationEstimate::from_sums(0.0, 0.0, 10);
        assert_eq!(estimate.value, 0.0);
        assert_eq!(estimate.std_error, 0.0);
        assert_eq!(estimate.effective_samples, 0.0);
    }
}
