mod common;

use std::sync::Arc;

use decaygen_core::{DecayError, Event};

use common::{cube_sampler, quick_config};

#[test]
fn constant_density_accepts_every_proposal() -> Result<(), DecayError> {
    let mut sampler = cube_sampler::<4>(11);
    for _ in 0..50 {
        assert!(sampler.advance(0.3)?);
    }
    for _ in 0..20 {
        sampler.sample(5)?;
    }
    let stats = sampler.stats();
    let config = quick_config();
    let expected = config.burn_in.iterations as u64 + 50 + 20 * 6;
    assert_eq!(stats.proposed, expected);
    assert_eq!(stats.accepted, expected);
    assert_eq!(stats.acceptance_rate(), 1.0);
    Ok(())
}

#[test]
fn samples_carry_the_inverse_bias() -> Result<(), DecayError> {
    let mut sampler = cube_sampler::<2>(12);
    sampler.set_bias(Arc::new(|state: &[f64; 2]| 1.0 + state[0]));
    for _ in 0..20 {
        let (event, inverse_bias) = sampler.sample(2)?;
        let expected = 1.0 / (1.0 + event.final_state[0]);
        assert_eq!(inverse_bias.to_bits(), expected.to_bits());
    }
    Ok(())
}

#[test]
fn cut_is_honoured_by_every_sample() -> Result<(), DecayError> {
    let mut sampler = cube_sampler::<2>(13);
    sampler.set_cut(Arc::new(|event: &Event<[f64; 2]>| event.final_state[1] < 0.25));
    for _ in 0..50 {
        let (event, _) = sampler.sample(1)?;
        assert!(event.final_state[1] < 0.25);
    }
    sampler.clear_cut();
    assert!(!sampler.ready());
    Ok(())
}
