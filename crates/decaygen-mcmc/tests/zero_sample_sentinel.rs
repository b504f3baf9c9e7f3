mod common;

use decaygen_core::DecayError;
use decaygen_mcmc::{LocalReducer, NormalizationEstimator, SequentialExecutor};

use common::muon_sampler;

fn estimator() -> NormalizationEstimator<SequentialExecutor, LocalReducer> {
    NormalizationEstimator::new(SequentialExecutor::default(), LocalReducer)
}

#[test]
fn zero_samples_return_the_sentinel_without_seeding() -> Result<(), DecayError> {
    let mut sampler = muon_sampler(8);
    let estimate = estimator().estimate(&mut sampler, 0)?;
    assert!(estimate.value.is_nan());
    assert!(estimate.std_error.is_nan());
    assert_eq!(estimate.effective_samples, 0.0);
    assert!(estimate.is_degenerate());
    assert!(!sampler.seeded());
    assert!(!sampler.ready());
    assert!(sampler.chain().is_none());
    Ok(())
}

#[test]
fn zero_samples_leave_a_ready_chain_bit_identical() -> Result<(), DecayError> {
    let mut probed = muon_sampler(8);
    let mut twin = muon_sampler(8);
    probed.initialize()?;
    twin.initialize()?;

    let before = probed.snapshot();
    assert!(estimator().estimate(&mut probed, 0)?.is_degenerate());
    assert_eq!(probed.snapshot(), before);

    for _ in 0..10 {
        assert_eq!(probed.sample(2)?, twin.sample(2)?);
    }
    Ok(())
}
