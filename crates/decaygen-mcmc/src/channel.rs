use std::sync::Arc;

use decaygen_core::{AmbientSeedSource, DecayError, Event, FourMomentum};
use decaygen_kin::{
    AmplitudeVariant, FourBodyPhaseSpace, MuonDecayAmplitude, ParentSpecies, ThreeBodyPhaseSpace,
};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::estimator::{NormalizationEstimate, NormalizationEstimator};
use crate::executor::Executor;
use crate::metrics::ChainStats;
use crate::reduce::Reducer;
use crate::sampler::MetropolisSampler;

/// Bias over the daughter momenta of a muon decay, in generator order.
pub type MomentumBias = Arc<dyn Fn(&[FourMomentum]) -> f64 + Send + Sync>;

enum Chain {
    ThreeBody(MetropolisSampler<5, ThreeBodyPhaseSpace>),
    FourBody(MetropolisSampler<8, FourBodyPhaseSpace>),
}

/// Biased sampler for a muon decay channel chosen by string selectors.
///
/// The `flat` and `v-a` variants run on the three-body final state,
/// `radiative` on the four-body one with a minimum photon energy cut.
pub struct MuonDecaySampler {
    parent: ParentSpecies,
    variant: AmplitudeVariant,
    chain: Chain,
}

impl MuonDecaySampler {
    /// Resolves the channel selectors and builds the matching chain.
    pub fn from_config(
        config: &GeneratorConfig,
        ambient: AmbientSeedSource,
    ) -> Result<Self, DecayError> {
        let (parent, variant) = config.channel.resolve()?;
        let sampler = config.sampler.clone();
        let chain = match variant {
            AmplitudeVariant::Radiative => {
                let mut chain = MetropolisSampler::new(
                    sampler,
                    FourBodyPhaseSpace::radiative_muon_decay(parent)?,
                    MuonDecayAmplitude::new(parent, variant, 4)?,
                    ambient,
                )?;
                let photon_cut = config.channel.photon_cut;
                chain.set_cut(Arc::new(move |event: &Event<[FourMomentum; 4]>| {
                    event.final_state[3].e >= photon_cut
                }));
                Chain::FourBody(chain)
            }
            AmplitudeVariant::Flat | AmplitudeVariant::VMinusA => {
                Chain::ThreeBody(MetropolisSampler::new(
                    sampler,
                    ThreeBodyPhaseSpace::muon_decay(parent)?,
                    MuonDecayAmplitude::new(parent, variant, 3)?,
                    ambient,
                )?)
            }
        };
        debug!(parent = %parent, variant = %variant, "channel sampler built");
        Ok(Self {
            parent,
            variant,
            chain,
        })
    }

    /// Parent species.
    pub fn parent(&self) -> ParentSpecies {
        self.parent
    }

    /// Active squared-amplitude variant.
    pub fn variant(&self) -> AmplitudeVariant {
        self.variant
    }

    /// Number of daughters in each sampled event.
    pub fn bodies(&self) -> usize {
        match &self.chain {
            Chain::ThreeBody(_) => 3,
            Chain::FourBody(_) => 4,
        }
    }

    /// Whether burn-in has completed and is still valid.
    pub fn ready(&self) -> bool {
        match &self.chain {
            Chain::ThreeBody(chain) => chain.ready(),
            Chain::FourBody(chain) => chain.ready(),
        }
    }

    /// Proposal counters of the underlying chain.
    pub fn stats(&self) -> ChainStats {
        match &self.chain {
            Chain::ThreeBody(chain) => chain.stats(),
            Chain::FourBody(chain) => chain.stats(),
        }
    }

    /// Switches the squared amplitude by selector and forces a new burn-in.
    ///
    /// The variant must fit the current final state.
    pub fn set_variant(&mut self, selector: &str) -> Result<(), DecayError> {
        let variant: AmplitudeVariant = selector.parse()?;
        let amplitude = MuonDecayAmplitude::new(self.parent, variant, self.bodies())?;
        match &mut self.chain {
            Chain::ThreeBody(chain) => chain.set_amplitude(amplitude),
            Chain::FourBody(chain) => chain.set_amplitude(amplitude),
        }
        self.variant = variant;
        Ok(())
    }

    /// Installs a bias over the daughter momenta and forces a new burn-in.
    pub fn set_bias(&mut self, bias: MomentumBias) {
        match &mut self.chain {
            Chain::ThreeBody(chain) => {
                chain.set_bias(Arc::new(move |daughters: &[FourMomentum; 3]| {
                    bias(daughters.as_slice())
                }))
            }
            Chain::FourBody(chain) => {
                chain.set_bias(Arc::new(move |daughters: &[FourMomentum; 4]| {
                    bias(daughters.as_slice())
                }))
            }
        }
    }

    /// Forces a new burn-in before the next sample.
    pub fn invalidate_burn_in(&mut self) {
        match &mut self.chain {
            Chain::ThreeBody(chain) => chain.invalidate_burn_in(),
            Chain::FourBody(chain) => chain.invalidate_burn_in(),
        }
    }

    /// Draws the next thinned event and its inverse bias.
    pub fn sample(&mut self) -> Result<(Event<Vec<FourMomentum>>, f64), DecayError> {
        match &mut self.chain {
            Chain::ThreeBody(chain) => {
                let discard = chain.config().discard;
                let (event, inverse_bias) = chain.sample(discard)?;
                Ok((Event::new(event.final_state.to_vec(), event.weight), inverse_bias))
            }
            Chain::FourBody(chain) => {
                let discard = chain.config().discard;
                let (event, inverse_bias) = chain.sample(discard)?;
                Ok((Event::new(event.final_state.to_vec(), event.weight), inverse_bias))
            }
        }
    }

    /// Estimates the normalization of the installed bias.
    pub fn estimate<E: Executor, R: Reducer>(
        &mut self,
        estimator: &NormalizationEstimator<E, R>,
        samples: u64,
    ) -> Result<NormalizationEstimate, DecayError> {
        match &mut self.chain {
            Chain::ThreeBody(chain) => estimator.estimate(chain, samples),
            Chain::FourBody(chain) => estimator.estimate(chain, samples),
        }
    }
}

impl std::fmt::Debug for MuonDecaySampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MuonDecaySampler")
            .field("parent", &self.parent)
            .field("variant", &self.variant)
            .field("bodies", &self.bodies())
            .field("ready", &self.ready())
            .finish()
    }
}
