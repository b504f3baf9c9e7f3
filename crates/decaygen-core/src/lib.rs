#![deny(missing_docs)]
#![doc = "Core traits and data types for the decaygen biased decay sampler."]

use std::fmt::Debug;

pub mod errors;
pub mod rng;
pub mod telemetry;
mod types;

pub use errors::{DecayError, ErrorInfo};
pub use rng::{derive_substream_seed, AmbientSeedSource, RngHandle};
pub use types::{Event, FourMomentum, RawState};

/// Deterministic map from the unit hypercube to a physical final state.
///
/// Implementations must be pure: bit-identical inputs give bit-identical
/// events. The returned weight is the Jacobian of the map and may be zero for
/// kinematically forbidden points.
pub trait PhaseSpaceMap<const N: usize>: Send + Sync {
    /// Final-state representation produced by the map.
    type FinalState: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Maps a raw state to an event.
    fn map(&self, raw: &RawState<N>) -> Event<Self::FinalState>;
}

/// Squared matrix element evaluated on a final state.
pub trait SquaredAmplitude<F>: Send + Sync {
    /// Returns the non-negative squared amplitude for the final state.
    fn evaluate(&self, final_state: &F) -> f64;
}

impl<F, T> SquaredAmplitude<F> for T
where
    T: Fn(&F) -> f64 + Send + Sync,
{
    fn evaluate(&self, final_state: &F) -> f64 {
        self(final_state)
    }
}
