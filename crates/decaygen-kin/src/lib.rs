#![deny(missing_docs)]
#![doc = "Phase-space maps and squared amplitudes for muon decay channels."]

/// Decay channel selectors and closed-form squared amplitudes.
pub mod amplitude;
/// Physical constants in natural units (MeV).
pub mod constants;
/// Sequential two-body phase-space generation.
pub mod phase_space;

pub use amplitude::{AmplitudeVariant, MuonDecayAmplitude, ParentSpecies};
pub use phase_space::{FourBodyPhaseSpace, SequentialPhaseSpace, ThreeBodyPhaseSpace};
