use std::f64::consts::PI;

use decaygen_core::errors::ErrorInfo;
use decaygen_core::{DecayError, Event, FourMomentum, PhaseSpaceMap, RawState};
use serde::{Deserialize, Serialize};

use crate::amplitude::ParentSpecies;
use crate::constants::ELECTRON_MASS;

/// Raubold-Lynch sequential two-body phase-space generator for a parent at rest.
///
/// A `k`-body final state consumes `3k - 4` uniform variates: `k - 2` of them
/// fix the ordered intermediate invariant masses, the remaining `2(k - 1)` fix
/// the polar and azimuthal angle of every two-body split. The returned weight
/// is the Jacobian of the map, so that integrating it over the unit cube gives
/// the Lorentz-invariant phase-space volume in the `d^3p / 2E` convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialPhaseSpace {
    parent_mass: f64,
    masses: Vec<f64>,
}

impl SequentialPhaseSpace {
    /// Validates the kinematics and builds the generator.
    pub fn new(parent_mass: f64, masses: Vec<f64>) -> Result<Self, DecayError> {
        if masses.len() < 2 {
            return Err(DecayError::InvalidConfiguration(
                ErrorInfo::new("too-few-bodies", "a decay needs at least two daughters")
                    .with_context("bodies", masses.len().to_string()),
            ));
        }
        if masses.iter().any(|mass| !mass.is_finite() || *mass < 0.0) {
            return Err(DecayError::InvalidConfiguration(ErrorInfo::new(
                "invalid-mass",
                "daughter masses must be finite and non-negative",
            )));
        }
        let total: f64 = masses.iter().sum();
        if !parent_mass.is_finite() || parent_mass <= total {
            return Err(DecayError::InvalidConfiguration(
                ErrorInfo::new("closed-channel", "parent mass below final-state threshold")
                    .with_context("parent_mass", parent_mass.to_string())
                    .with_context("threshold", total.to_string()),
            ));
        }
        Ok(Self {
            parent_mass,
            masses,
        })
    }

    /// Number of uniform variates consumed per event.
    pub fn dimension(&self) -> usize {
        3 * self.masses.len() - 4
    }

    /// Number of daughters.
    pub fn bodies(&self) -> usize {
        self.masses.len()
    }

    /// Mass of the decaying parent.
    pub fn parent_mass(&self) -> f64 {
        self.parent_mass
    }

    /// Daughter masses in final-state order.
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Fills `out` with the daughter momenta for `raw` and returns the weight.
    ///
    /// `raw` must hold [`Self::dimension`] values in `[0, 1]` and `out` must
    /// hold [`Self::bodies`] entries.
    pub fn generate_into(&self, raw: &[f64], out: &mut [FourMomentum]) -> f64 {
        let k = self.masses.len();
        debug_assert_eq!(raw.len(), self.dimension());
        debug_assert_eq!(out.len(), k);

        let excess = self.parent_mass - self.masses.iter().sum::<f64>();
        let mut ordered: Vec<f64> = raw[..k - 2].to_vec();
        ordered.sort_by(f64::total_cmp);

        // Invariant mass of the subsystem made of daughters 0..=i.
        let mut invariant = Vec::with_capacity(k);
        let mut cumulative = 0.0;
        for (i, mass) in self.masses.iter().enumerate() {
            cumulative += mass;
            let fraction = match i {
                0 => 0.0,
                _ if i == k - 1 => 1.0,
                _ => ordered[i - 1],
            };
            invariant.push(cumulative + fraction * excess);
        }

        let mut weight = excess.powi(k as i32 - 2) / factorial(k - 2);
        for mass in &invariant[1..k - 1] {
            weight *= 2.0 * mass;
        }

        let angles = &raw[k - 2..];
        for split in 0..k - 1 {
            let mother = invariant[split + 1];
            let p = two_body_momentum(mother, invariant[split], self.masses[split + 1]);
            weight *= PI * p / mother;

            let cos_theta = 2.0 * angles[2 * split] - 1.0;
            let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
            let phi = 2.0 * PI * angles[2 * split + 1];
            let direction = [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta];

            let daughter = self.masses[split + 1];
            out[split + 1] = FourMomentum::new(
                (p * p + daughter * daughter).sqrt(),
                p * direction[0],
                p * direction[1],
                p * direction[2],
            );
            if split == 0 {
                let first = self.masses[0];
                out[0] = FourMomentum::new(
                    (p * p + first * first).sqrt(),
                    -p * direction[0],
                    -p * direction[1],
                    -p * direction[2],
                );
            } else {
                let subsystem_energy = (p * p + invariant[split] * invariant[split]).sqrt();
                let beta = [
                    -p * direction[0] / subsystem_energy,
                    -p * direction[1] / subsystem_energy,
                    -p * direction[2] / subsystem_energy,
                ];
                for momentum in out[..=split].iter_mut() {
                    *momentum = momentum.boosted(beta);
                }
            }
        }
        weight
    }
}

/// Breakup momentum of `mother -> a + b` in the mother rest frame.
pub fn two_body_momentum(mother: f64, a: f64, b: f64) -> f64 {
    let sum = a + b;
    let diff = a - b;
    let kallen = (mother * mother - sum * sum) * (mother * mother - diff * diff);
    kallen.max(0.0).sqrt() / (2.0 * mother)
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|value| value as f64).product()
}

/// Three-body decay `parent -> e nu nu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeBodyPhaseSpace {
    inner: SequentialPhaseSpace,
}

impl ThreeBodyPhaseSpace {
    /// Builds a generator for arbitrary daughter masses.
    pub fn new(parent_mass: f64, masses: [f64; 3]) -> Result<Self, DecayError> {
        Ok(Self {
            inner: SequentialPhaseSpace::new(parent_mass, masses.to_vec())?,
        })
    }

    /// Ordinary muon decay: electron followed by the two neutrinos.
    pub fn muon_decay(parent: ParentSpecies) -> Result<Self, DecayError> {
        Self::new(parent.mass(), [ELECTRON_MASS, 0.0, 0.0])
    }

    /// Underlying sequential generator.
    pub fn generator(&self) -> &SequentialPhaseSpace {
        &self.inner
    }
}

impl PhaseSpaceMap<5> for ThreeBodyPhaseSpace {
    type FinalState = [FourMomentum; 3];

    fn map(&self, raw: &RawState<5>) -> Event<Self::FinalState> {
        let mut out = [FourMomentum::default(); 3];
        let weight = self.inner.generate_into(raw.as_slice(), &mut out);
        Event::new(out, weight)
    }
}

/// Four-body decay `parent -> e nu nu gamma`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourBodyPhaseSpace {
    inner: SequentialPhaseSpace,
}

impl FourBodyPhaseSpace {
    /// Builds a generator for arbitrary daughter masses.
    pub fn new(parent_mass: f64, masses: [f64; 4]) -> Result<Self, DecayError> {
        Ok(Self {
            inner: SequentialPhaseSpace::new(parent_mass, masses.to_vec())?,
        })
    }

    /// Radiative muon decay: electron, two neutrinos, photon.
    pub fn radiative_muon_decay(parent: ParentSpecies) -> Result<Self, DecayError> {
        Self::new(parent.mass(), [ELECTRON_MASS, 0.0, 0.0, 0.0])
    }

    /// Underlying sequential generator.
    pub fn generator(&self) -> &SequentialPhaseSpace {
        &self.inner
    }
}

impl PhaseSpaceMap<8> for FourBodyPhaseSpace {
    type FinalState = [FourMomentum; 4];

    fn map(&self, raw: &RawState<8>) -> Event<Self::FinalState> {
        let mut out = [FourMomentum::default(); 4];
        let weight = self.inner.generate_into(raw.as_slice(), &mut out);
        Event::new(out, weight)
    }
}
