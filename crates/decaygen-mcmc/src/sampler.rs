use std::fmt;
use std::sync::Arc;

use decaygen_core::{
    AmbientSeedSource, DecayError, Event, PhaseSpaceMap, RawState, RngHandle, SquaredAmplitude,
};
use rand::RngCore;
use tracing::debug;

use crate::config::{check_step, SamplerConfig};
use crate::metrics::ChainStats;
use crate::moves;

/// Non-negative reweighting of the physical density.
pub type BiasFn<F> = Arc<dyn Fn(&F) -> f64 + Send + Sync>;
/// Acceptance predicate applied to every candidate event.
pub type CutFn<F> = Arc<dyn Fn(&Event<F>) -> bool + Send + Sync>;
/// Shared squared-amplitude evaluator.
pub type AmplitudeFn<F> = Arc<dyn SquaredAmplitude<F>>;

/// Returns the trivial bias `b = 1`.
pub fn unit_bias<F: 'static>() -> BiasFn<F> {
    Arc::new(|_: &F| 1.0)
}

/// Mutable state of one Markov chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState<const N: usize, F> {
    /// Current point in the unit hypercube.
    pub raw: RawState<N>,
    /// Event mapped from `raw`.
    pub event: Event<F>,
    /// Target density `bias * |M|^2 * weight` at `raw`.
    pub density: f64,
    /// Inverse bias of the last accepted state.
    pub last_inverse_bias: f64,
}

/// Lazy one-shot seeding of the private engine.
enum EngineState {
    /// Waiting for the first sampling activity to draw a seed from the ambient source.
    Pending(AmbientSeedSource),
    Seeded,
}

enum Lifecycle<const N: usize, F> {
    Uninitialized,
    /// Burn-in was invalidated; the old state is kept but superseded on the next initialisation.
    Stale(ChainState<N, F>),
    Ready(ChainState<N, F>),
}

/// Scoped copy of every field that influences the chain's future samples,
/// apart from the private engine.
pub struct EstimatorSnapshot<const N: usize, F> {
    bias: BiasFn<F>,
    ready: bool,
    chain: Option<ChainState<N, F>>,
}

impl<const N: usize, F> EstimatorSnapshot<N, F> {
    /// Whether the chain was thermalised when the snapshot was taken.
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// Chain state captured by the snapshot.
    pub fn chain(&self) -> Option<&ChainState<N, F>> {
        self.chain.as_ref()
    }
}

impl<const N: usize, F: PartialEq> PartialEq for EstimatorSnapshot<N, F> {
    fn eq(&self, other: &Self) -> bool {
        let same_bias = Arc::as_ptr(&self.bias) as *const () == Arc::as_ptr(&other.bias) as *const ();
        same_bias && self.ready == other.ready && self.chain == other.chain
    }
}

impl<const N: usize, F: fmt::Debug> fmt::Debug for EstimatorSnapshot<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstimatorSnapshot")
            .field("ready", &self.ready)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

/// Metropolis sampler whose stationary density is `bias * |M|^2 * weight`.
pub struct MetropolisSampler<const N: usize, P: PhaseSpaceMap<N>> {
    config: SamplerConfig,
    phase_space: Arc<P>,
    amplitude: AmplitudeFn<P::FinalState>,
    bias: BiasFn<P::FinalState>,
    cut: Option<CutFn<P::FinalState>>,
    engine: RngHandle,
    engine_state: EngineState,
    lifecycle: Lifecycle<N, P::FinalState>,
    stats: ChainStats,
}

impl<const N: usize, P: PhaseSpaceMap<N>> MetropolisSampler<N, P> {
    /// Creates an uninitialised sampler with the unit bias and no cut.
    ///
    /// The private engine is seeded from `ambient` the first time the sampler
    /// needs randomness.
    pub fn new<A>(
        config: SamplerConfig,
        phase_space: P,
        amplitude: A,
        ambient: AmbientSeedSource,
    ) -> Result<Self, DecayError>
    where
        A: SquaredAmplitude<P::FinalState> + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            phase_space: Arc::new(phase_space),
            amplitude: Arc::new(amplitude),
            bias: unit_bias(),
            cut: None,
            engine: RngHandle::from_seed(0),
            engine_state: EngineState::Pending(ambient),
            lifecycle: Lifecycle::Uninitialized,
            stats: ChainStats::default(),
        })
    }

    /// Builds an independent chain sharing this sampler's collaborators.
    ///
    /// The fork starts uninitialised, owns a private engine already seeded
    /// with `seed`, and targets `bias` instead of the current bias.
    pub fn fork(&self, seed: u64, bias: BiasFn<P::FinalState>) -> Self {
        Self {
            config: self.config.clone(),
            phase_space: Arc::clone(&self.phase_space),
            amplitude: Arc::clone(&self.amplitude),
            bias,
            cut: self.cut.clone(),
            engine: RngHandle::from_seed(seed),
            engine_state: EngineState::Seeded,
            lifecycle: Lifecycle::Uninitialized,
            stats: ChainStats::default(),
        }
    }

    /// Chain parameters.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Shared phase-space map.
    pub fn phase_space(&self) -> &P {
        &self.phase_space
    }

    /// Current bias function.
    pub fn bias(&self) -> BiasFn<P::FinalState> {
        Arc::clone(&self.bias)
    }

    /// Whether burn-in has completed and has not been invalidated since.
    pub fn ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready(_))
    }

    /// Current or superseded chain state, if any was ever populated.
    pub fn chain(&self) -> Option<&ChainState<N, P::FinalState>> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => None,
            Lifecycle::Stale(chain) | Lifecycle::Ready(chain) => Some(chain),
        }
    }

    /// Proposal counters accumulated over the sampler's lifetime.
    pub fn stats(&self) -> ChainStats {
        self.stats
    }

    /// Whether the private engine has consumed its ambient seed.
    pub fn seeded(&self) -> bool {
        matches!(self.engine_state, EngineState::Seeded)
    }

    /// Replaces the bias function and forces a new burn-in.
    pub fn set_bias(&mut self, bias: BiasFn<P::FinalState>) {
        self.bias = bias;
        self.invalidate_burn_in();
    }

    /// Installs a cut predicate and forces a new burn-in.
    pub fn set_cut(&mut self, cut: CutFn<P::FinalState>) {
        self.cut = Some(cut);
        self.invalidate_burn_in();
    }

    /// Removes the cut predicate and forces a new burn-in.
    pub fn clear_cut(&mut self) {
        self.cut = None;
        self.invalidate_burn_in();
    }

    /// Replaces the squared amplitude and forces a new burn-in.
    pub fn set_amplitude<A>(&mut self, amplitude: A)
    where
        A: SquaredAmplitude<P::FinalState> + 'static,
    {
        self.amplitude = Arc::new(amplitude);
        self.invalidate_burn_in();
    }

    /// Marks the chain as not thermalised; the next sampling call re-runs burn-in.
    pub fn invalidate_burn_in(&mut self) {
        self.lifecycle = match std::mem::replace(&mut self.lifecycle, Lifecycle::Uninitialized) {
            Lifecycle::Ready(chain) | Lifecycle::Stale(chain) => Lifecycle::Stale(chain),
            Lifecycle::Uninitialized => Lifecycle::Uninitialized,
        };
    }

    /// Draws a starting point and thermalises the chain, unless already ready.
    pub fn initialize(&mut self) -> Result<(), DecayError> {
        let chain = self.take_ready_chain()?;
        self.lifecycle = Lifecycle::Ready(chain);
        Ok(())
    }

    /// Performs one Metropolis transition with proposal half-width `step`.
    ///
    /// Returns whether the proposal was accepted. Initialises the chain first
    /// when needed. `step` must lie in `(0, 1]`.
    pub fn advance(&mut self, step: f64) -> Result<bool, DecayError> {
        check_step("step", step)?;
        let mut chain = self.take_ready_chain()?;
        let result = self.transition(&mut chain, step);
        self.lifecycle = Lifecycle::Ready(chain);
        result
    }

    /// Returns the next thinned sample together with its inverse bias.
    ///
    /// `discard` transitions are thrown away before the transition whose
    /// result is returned. On error the chain is rolled back to its state at
    /// the start of the call.
    pub fn sample(&mut self, discard: usize) -> Result<(Event<P::FinalState>, f64), DecayError> {
        let start = self.take_ready_chain()?;
        let mut chain = start.clone();
        let step = self.config.step;
        match (0..=discard).try_for_each(|_| self.transition(&mut chain, step).map(drop)) {
            Ok(()) => {
                let sample = (chain.event.clone(), chain.last_inverse_bias);
                self.lifecycle = Lifecycle::Ready(chain);
                Ok(sample)
            }
            Err(err) => {
                self.lifecycle = Lifecycle::Ready(start);
                Err(err)
            }
        }
    }

    /// Captures the bias, readiness and chain state.
    pub fn snapshot(&self) -> EstimatorSnapshot<N, P::FinalState> {
        EstimatorSnapshot {
            bias: Arc::clone(&self.bias),
            ready: self.ready(),
            chain: self.chain().cloned(),
        }
    }

    /// Restores a snapshot taken from this sampler.
    ///
    /// The private engine and its seeding state are left untouched.
    pub fn restore(&mut self, snapshot: EstimatorSnapshot<N, P::FinalState>) {
        self.bias = snapshot.bias;
        self.lifecycle = match (snapshot.ready, snapshot.chain) {
            (true, Some(chain)) => Lifecycle::Ready(chain),
            (false, Some(chain)) => Lifecycle::Stale(chain),
            (_, None) => Lifecycle::Uninitialized,
        };
    }

    /// Seeds the engine if needed and draws one seed for forked chains.
    pub fn draw_fork_seed(&mut self) -> Result<u64, DecayError> {
        self.ensure_seeded()?;
        Ok(self.engine.next_u64())
    }

    fn ensure_seeded(&mut self) -> Result<(), DecayError> {
        if let EngineState::Pending(source) = &self.engine_state {
            let seed = source.draw_seed()?;
            self.engine.reseed(seed);
            self.engine_state = EngineState::Seeded;
        }
        Ok(())
    }

    /// Moves the ready chain out of the lifecycle, thermalising a new one if needed.
    ///
    /// On error the lifecycle is left as it was.
    fn take_ready_chain(&mut self) -> Result<ChainState<N, P::FinalState>, DecayError> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Uninitialized) {
            Lifecycle::Ready(chain) => Ok(chain),
            previous => {
                self.lifecycle = previous;
                self.thermalize()
            }
        }
    }

    fn thermalize(&mut self) -> Result<ChainState<N, P::FinalState>, DecayError> {
        self.ensure_seeded()?;
        let mut chain = self.draw_start()?;
        let schedule = self.config.burn_in;
        let before = self.stats;
        for iteration in 0..schedule.iterations {
            self.transition(&mut chain, schedule.step_at(iteration))?;
        }
        let accepted = self.stats.accepted - before.accepted;
        debug!(
            iterations = schedule.iterations,
            accepted,
            density = chain.density,
            "burn-in complete"
        );
        Ok(chain)
    }

    fn draw_start(&mut self) -> Result<ChainState<N, P::FinalState>, DecayError> {
        loop {
            let raw = moves::uniform_state::<N>(&mut self.engine);
            let event = self.phase_space.map(&raw);
            if !self.passes_cut(&event) {
                continue;
            }
            let bias = checked_bias(&self.bias, &event.final_state)?;
            if bias < f64::MIN_POSITIVE {
                continue;
            }
            let density = self.density(&event, bias);
            // Also rejects NaN.
            if !(density >= f64::MIN_POSITIVE) {
                continue;
            }
            return Ok(ChainState {
                raw,
                event,
                density,
                last_inverse_bias: 1.0 / bias,
            });
        }
    }

    fn transition(
        &mut self,
        chain: &mut ChainState<N, P::FinalState>,
        step: f64,
    ) -> Result<bool, DecayError> {
        let (raw, event) = loop {
            let raw = moves::perturb(&chain.raw, step, &mut self.engine);
            let event = self.phase_space.map(&raw);
            if self.passes_cut(&event) {
                break (raw, event);
            }
        };
        let bias = checked_bias(&self.bias, &event.final_state)?;
        let density = self.density(&event, bias);
        let accepted =
            density >= chain.density || self.engine.uniform() < density / chain.density;
        self.stats.record(accepted);
        if accepted {
            *chain = ChainState {
                raw,
                event,
                density,
                last_inverse_bias: 1.0 / bias,
            };
        }
        Ok(accepted)
    }

    fn passes_cut(&self, event: &Event<P::FinalState>) -> bool {
        self.cut.as_ref().map_or(true, |cut| cut(event))
    }

    fn density(&self, event: &Event<P::FinalState>, bias: f64) -> f64 {
        bias * self.amplitude.evaluate(&event.final_state) * event.weight
    }
}

fn checked_bias<F>(bias: &BiasFn<F>, final_state: &F) -> Result<f64, DecayError> {
    let value = bias(final_state);
    if value < 0.0 || value.is_nan() {
        return Err(DecayError::negative_bias(value));
    }
    Ok(value)
}

impl<const N: usize, P: PhaseSpaceMap<N>> fmt::Debug for MetropolisSampler<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetropolisSampler")
            .field("config", &self.config)
            .field("ready", &self.ready())
            .field("seeded", &self.seeded())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
