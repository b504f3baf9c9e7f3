use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use decaygen_core::errors::ErrorInfo;
use decaygen_core::{DecayError, FourMomentum, SquaredAmplitude};
use serde::{Deserialize, Serialize};

use crate::constants::{pdg, FERMI_CONSTANT, FINE_STRUCTURE, MUON_MASS};

/// Species of the decaying parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParentSpecies {
    /// Negative muon.
    MuonMinus,
    /// Positive muon.
    MuonPlus,
}

impl ParentSpecies {
    const SELECTORS: [&'static str; 2] = ["mu-", "mu+"];

    /// Selector string accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentSpecies::MuonMinus => "mu-",
            ParentSpecies::MuonPlus => "mu+",
        }
    }

    /// Rest mass of the parent.
    pub fn mass(&self) -> f64 {
        MUON_MASS
    }

    /// PDG identifier of the parent.
    pub fn pdg_code(&self) -> i32 {
        match self {
            ParentSpecies::MuonMinus => pdg::MUON,
            ParentSpecies::MuonPlus => -pdg::MUON,
        }
    }

    /// PDG identifiers of the daughters, in final-state order, for a variant.
    pub fn daughter_pdg_codes(&self, variant: AmplitudeVariant) -> Vec<i32> {
        let sign = match self {
            ParentSpecies::MuonMinus => 1,
            ParentSpecies::MuonPlus => -1,
        };
        let mut codes = vec![
            sign * pdg::ELECTRON,
            -sign * pdg::ELECTRON_NEUTRINO,
            sign * pdg::MUON_NEUTRINO,
        ];
        if variant == AmplitudeVariant::Radiative {
            codes.push(pdg::PHOTON);
        }
        codes
    }
}

impl FromStr for ParentSpecies {
    type Err = DecayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "mu-" => Ok(ParentSpecies::MuonMinus),
            "mu+" => Ok(ParentSpecies::MuonPlus),
            other => Err(DecayError::unknown_selector(
                "parent species",
                other,
                &Self::SELECTORS,
            )),
        }
    }
}

impl TryFrom<String> for ParentSpecies {
    type Error = DecayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParentSpecies> for String {
    fn from(value: ParentSpecies) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ParentSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of squared-amplitude variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AmplitudeVariant {
    /// Constant matrix element; samples plain phase space.
    Flat,
    /// Tree-level V-A matrix element of ordinary muon decay.
    VMinusA,
    /// Eikonal soft-photon emission on top of the V-A element.
    Radiative,
}

impl AmplitudeVariant {
    const SELECTORS: [&'static str; 3] = ["flat", "v-a", "radiative"];

    /// Selector string accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            AmplitudeVariant::Flat => "flat",
            AmplitudeVariant::VMinusA => "v-a",
            AmplitudeVariant::Radiative => "radiative",
        }
    }

    /// Number of daughters the variant is defined for, if restricted.
    pub fn arity(&self) -> Option<usize> {
        match self {
            AmplitudeVariant::Flat => None,
            AmplitudeVariant::VMinusA => Some(3),
            AmplitudeVariant::Radiative => Some(4),
        }
    }
}

impl FromStr for AmplitudeVariant {
    type Err = DecayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "flat" => Ok(AmplitudeVariant::Flat),
            "v-a" => Ok(AmplitudeVariant::VMinusA),
            "radiative" => Ok(AmplitudeVariant::Radiative),
            other => Err(DecayError::unknown_selector(
                "amplitude variant",
                other,
                &Self::SELECTORS,
            )),
        }
    }
}

impl TryFrom<String> for AmplitudeVariant {
    type Error = DecayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AmplitudeVariant> for String {
    fn from(value: AmplitudeVariant) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AmplitudeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Squared amplitude for a muon decay channel with daughters ordered as
/// `(e, nu_e-type, nu_mu-type[, gamma])`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuonDecayAmplitude {
    parent: ParentSpecies,
    variant: AmplitudeVariant,
}

impl MuonDecayAmplitude {
    /// Builds the amplitude, checking the variant against the final-state arity.
    pub fn new(
        parent: ParentSpecies,
        variant: AmplitudeVariant,
        bodies: usize,
    ) -> Result<Self, DecayError> {
        match variant.arity() {
            Some(expected) if expected != bodies => Err(DecayError::InvalidConfiguration(
                ErrorInfo::new("arity-mismatch", "variant does not fit the final state")
                    .with_context("variant", variant.as_str())
                    .with_context("expected", expected.to_string())
                    .with_context("bodies", bodies.to_string()),
            )),
            _ => Ok(Self { parent, variant }),
        }
    }

    /// Parses both selectors and builds the amplitude.
    pub fn from_selectors(parent: &str, variant: &str, bodies: usize) -> Result<Self, DecayError> {
        Self::new(parent.parse()?, variant.parse()?, bodies)
    }

    /// Parent species.
    pub fn parent(&self) -> ParentSpecies {
        self.parent
    }

    /// Active variant.
    pub fn variant(&self) -> AmplitudeVariant {
        self.variant
    }

    fn evaluate_momenta(&self, daughters: &[FourMomentum]) -> f64 {
        let parent = FourMomentum::at_rest(self.parent.mass());
        match self.variant {
            AmplitudeVariant::Flat => 1.0,
            AmplitudeVariant::VMinusA => michel(&parent, daughters),
            AmplitudeVariant::Radiative => {
                let electron = &daughters[0];
                let photon = &daughters[3];
                let parent_k = parent.dot(photon);
                let electron_k = electron.dot(photon);
                if parent_k <= 0.0 || electron_k <= 0.0 {
                    return 0.0;
                }
                let eikonal = 2.0 * parent.dot(electron) / (parent_k * electron_k)
                    - parent.mass_squared() / (parent_k * parent_k)
                    - electron.mass_squared() / (electron_k * electron_k);
                let charge_squared = 4.0 * PI * FINE_STRUCTURE;
                (charge_squared * eikonal).max(0.0) * michel(&parent, daughters)
            }
        }
    }
}

/// Spin-averaged `64 G_F^2 (P.p_nu_e)(p_e.p_nu_mu)`.
fn michel(parent: &FourMomentum, daughters: &[FourMomentum]) -> f64 {
    64.0 * FERMI_CONSTANT
        * FERMI_CONSTANT
        * parent.dot(&daughters[1])
        * daughters[0].dot(&daughters[2])
}

impl<F> SquaredAmplitude<F> for MuonDecayAmplitude
where
    F: AsRef<[FourMomentum]>,
{
    fn evaluate(&self, final_state: &F) -> f64 {
        self.evaluate_momenta(final_state.as_ref())
    }
}
