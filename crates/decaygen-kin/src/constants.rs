/// Muon mass.
pub const MUON_MASS: f64 = 105.658_375_5;
/// Electron mass.
pub const ELECTRON_MASS: f64 = 0.510_998_950;
/// Fermi coupling constant in MeV^-2.
pub const FERMI_CONSTANT: f64 = 1.166_378_7e-11;
/// Fine-structure constant at zero momentum transfer.
pub const FINE_STRUCTURE: f64 = 7.297_352_569_3e-3;

/// PDG Monte Carlo identifiers for the particles this crate knows about.
pub mod pdg {
    /// Electron.
    pub const ELECTRON: i32 = 11;
    /// Electron neutrino.
    pub const ELECTRON_NEUTRINO: i32 = 12;
    /// Negative muon.
    pub const MUON: i32 = 13;
    /// Muon neutrino.
    pub const MUON_NEUTRINO: i32 = 14;
    /// Photon.
    pub const PHOTON: i32 = 22;
}
