mod common;

use std::sync::Arc;

use decaygen_core::{DecayError, FourMomentum};
use decaygen_mcmc::{LocalReducer, NormalizationEstimator, SequentialExecutor};

use common::muon_sampler;

fn estimator() -> NormalizationEstimator<SequentialExecutor, LocalReducer> {
    NormalizationEstimator::new(SequentialExecutor::new(2), LocalReducer)
}

#[test]
fn estimate_preserves_bias_readiness_and_chain() -> Result<(), DecayError> {
    let mut sampler = muon_sampler(31);
    sampler.set_bias(Arc::new(|daughters: &[FourMomentum; 3]| 1.0 + daughters[0].e));
    sampler.sample(2)?;

    let before = sampler.snapshot();
    let estimate = estimator().estimate(&mut sampler, 4_000)?;
    assert!(estimate.value > 1.0);
    assert_eq!(sampler.snapshot(), before);
    assert!(sampler.ready());
    Ok(())
}

#[test]
fn estimate_leaves_a_stale_chain_stale() -> Result<(), DecayError> {
    let mut sampler = muon_sampler(32);
    sampler.initialize()?;
    sampler.invalidate_burn_in();

    let before = sampler.snapshot();
    estimator().estimate(&mut sampler, 1_000)?;
    assert_eq!(sampler.snapshot(), before);
    assert!(!sampler.ready());
    Ok(())
}

#[test]
fn estimate_seeds_the_engine_but_not_the_chain() -> Result<(), DecayError> {
    let mut sampler = muon_sampler(33);
    estimator().estimate(&mut sampler, 1_000)?;
    assert!(sampler.seeded());
    assert!(!sampler.ready());
    assert!(sampler.chain().is_none());
    Ok(())
}

#[test]
fn estimate_consumes_engine_draws() -> Result<(), DecayError> {
    let mut probed = muon_sampler(34);
    let mut twin = muon_sampler(34);
    probed.initialize()?;
    twin.initialize()?;
    assert_eq!(probed.chain(), twin.chain());

    estimator().estimate(&mut probed, 1_000)?;
    assert_eq!(probed.chain(), twin.chain());
    let mut diverged = false;
    for _ in 0..10 {
        diverged |= probed.sample(2)? != twin.sample(2)?;
    }
    assert!(diverged);
    Ok(())
}
