#![deny(missing_docs)]
#![doc = "Biased-density Metropolis sampling and distributed normalization estimates for decay kinematics."]

//! A [`MetropolisSampler`] keeps one Markov chain over the unit hypercube whose
//! stationary density is `bias * |M|^2 * weight`, where the weight is the
//! Jacobian of a [`decaygen_core::PhaseSpaceMap`]. Each returned sample carries
//! the inverse bias as its statistical weight. A [`NormalizationEstimator`]
//! measures `∫ bias dΦ` with unit-bias chains forked from a production sampler,
//! fanned out over an [`Executor`] and summed across a [`Reducer`] group.

/// Block-compensated accumulation of bias sums.
pub mod accumulate;
/// Channel-level sampler driven by string selectors.
pub mod channel;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation and range slicing helpers.
pub mod determinism;
/// Normalization estimator.
pub mod estimator;
/// Local parallel execution of index ranges.
pub mod executor;
/// Proposal acceptance counters.
pub mod metrics;
/// Uniform draws and reflecting proposals on the unit hypercube.
pub mod moves;
/// Collective sum across cooperating participants.
pub mod reduce;
/// Metropolis chain with lazy seeding and burn-in.
pub mod sampler;

pub use accumulate::{block_length, BlockAccumulator};
pub use channel::{MomentumBias, MuonDecaySampler};
pub use config::{
    load_config, BurnInSchedule, ChannelConfig, EstimatorConfig, GeneratorConfig, SamplerConfig,
};
pub use estimator::{NormalizationEstimate, NormalizationEstimator};
pub use executor::{partition, Executor, RayonExecutor, SequentialExecutor};
pub use metrics::ChainStats;
pub use reduce::{ChannelReducer, LocalReducer, Reducer};
pub use sampler::{
    unit_bias, AmplitudeFn, BiasFn, ChainState, CutFn, EstimatorSnapshot, MetropolisSampler,
};
