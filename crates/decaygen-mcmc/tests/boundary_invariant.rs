mod common;

use decaygen_core::{DecayError, RawState, RngHandle};
use decaygen_mcmc::moves::{perturb, reflect};
use proptest::prelude::*;

use common::cube_sampler;

proptest! {
    #[test]
    fn reflected_values_stay_in_unit_interval(value in -1.0f64..=2.0) {
        let folded = reflect(value);
        prop_assert!((0.0..=1.0).contains(&folded));
    }

    #[test]
    fn perturbations_never_leave_the_cube(
        start in prop::array::uniform4(0.0f64..=1.0),
        step in 1e-9f64..=0.5,
        seed in any::<u64>(),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let mut state = RawState(start);
        for _ in 0..200 {
            state = perturb(&state, step, &mut rng);
            prop_assert!(state.in_unit_cube(), "{:?}", state);
        }
    }

    #[test]
    fn advancing_chains_stay_in_the_cube(step in 1e-9f64..=0.5, seed in any::<u64>()) {
        let mut sampler = cube_sampler::<3>(seed);
        for _ in 0..100 {
            sampler.advance(step).unwrap();
            let chain = sampler.chain().unwrap();
            prop_assert!(chain.raw.in_unit_cube(), "{:?}", chain.raw);
        }
    }
}

#[test]
fn out_of_range_steps_are_rejected_before_moving() {
    let mut sampler = cube_sampler::<3>(1);
    sampler.initialize().unwrap();
    let before = sampler.chain().cloned();
    let stats = sampler.stats();
    for step in [1.5, 1.8, 0.0, -0.25, f64::NAN, f64::INFINITY] {
        let err = sampler.advance(step).unwrap_err();
        assert!(matches!(err, DecayError::InvalidConfiguration(_)));
        assert_eq!(err.info().code, "invalid-step");
    }
    assert!(sampler.ready());
    assert_eq!(sampler.chain().cloned(), before);
    assert_eq!(sampler.stats(), stats);
    assert!(sampler.advance(1.0).is_ok());
    assert!(sampler.chain().unwrap().raw.in_unit_cube());
}
