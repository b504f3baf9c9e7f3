#![allow(dead_code)]

use decaygen_core::{AmbientSeedSource, Event, PhaseSpaceMap, RawState};
use decaygen_kin::{AmplitudeVariant, MuonDecayAmplitude, ParentSpecies, ThreeBodyPhaseSpace};
use decaygen_mcmc::{BurnInSchedule, MetropolisSampler, SamplerConfig};

/// Identity map with unit weight, so the density equals the bias.
#[derive(Debug, Clone, Copy)]
pub struct UnitCube<const N: usize>;

impl<const N: usize> PhaseSpaceMap<N> for UnitCube<N> {
    type FinalState = [f64; N];

    fn map(&self, raw: &RawState<N>) -> Event<Self::FinalState> {
        Event::new(raw.0, 1.0)
    }
}

pub fn quick_config() -> SamplerConfig {
    SamplerConfig {
        step: 0.05,
        discard: 2,
        burn_in: BurnInSchedule {
            initial_step: 0.5,
            iterations: 200,
        },
    }
}

pub fn cube_sampler<const N: usize>(seed: u64) -> MetropolisSampler<N, UnitCube<N>> {
    MetropolisSampler::new(
        quick_config(),
        UnitCube,
        |_: &[f64; N]| 1.0,
        AmbientSeedSource::from_seed(seed),
    )
    .unwrap()
}

pub fn muon_sampler(seed: u64) -> MetropolisSampler<5, ThreeBodyPhaseSpace> {
    let parent = ParentSpecies::MuonMinus;
    MetropolisSampler::new(
        quick_config(),
        ThreeBodyPhaseSpace::muon_decay(parent).unwrap(),
        MuonDecayAmplitude::new(parent, AmplitudeVariant::VMinusA, 3).unwrap(),
        AmbientSeedSource::from_seed(seed),
    )
    .unwrap()
}
