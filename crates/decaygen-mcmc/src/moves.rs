use decaygen_core::{RawState, RngHandle};

/// Folds a perturbed coordinate back into `[0, 1]`.
///
/// Valid for inputs in `[-1, 2]`, which is all a step of at most one can
/// produce from a point inside the unit interval.
pub fn reflect(value: f64) -> f64 {
    debug_assert!((-1.0..=2.0).contains(&value));
    if value < 0.0 {
        -value
    } else if value > 1.0 {
        2.0 - value
    } else {
        value
    }
}

/// Draws a fresh state uniformly from the unit hypercube.
pub fn uniform_state<const N: usize>(rng: &mut RngHandle) -> RawState<N> {
    RawState(std::array::from_fn(|_| rng.uniform()))
}

/// Perturbs every component by an independent uniform draw in `[-step, step]`.
pub fn perturb<const N: usize>(
    current: &RawState<N>,
    step: f64,
    rng: &mut RngHandle,
) -> RawState<N> {
    let mut proposal = *current;
    for value in proposal.0.iter_mut() {
        *value = reflect(*value + step * (2.0 * rng.uniform() - 1.0));
    }
    proposal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_mirrors_both_edges() {
        assert_eq!(reflect(-0.25), 0.25);
        assert_eq!(reflect(1.25), 0.75);
        assert_eq!(reflect(0.5), 0.5);
        assert_eq!(reflect(0.0), 0.0);
        assert_eq!(reflect(1.0), 1.0);
    }

    #[test]
    fn uniform_states_fill_every_component() {
        let mut rng = RngHandle::from_seed(3);
        let state: RawState<6> = uniform_state(&mut rng);
        assert!(state.in_unit_cube());
        assert!(state.0.iter().any(|value| *value != state.0[0]));
    }
}
