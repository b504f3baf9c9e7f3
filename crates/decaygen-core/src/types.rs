use std::ops::{Add, Mul, Neg, Sub};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Four-momentum `(E, px, py, pz)` in natural units (MeV), metric `(+,-,-,-)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Energy component.
    pub e: f64,
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z.
    pub pz: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its components.
    pub const fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, px, py, pz }
    }

    /// Four-momentum of a particle of the given mass at rest.
    pub const fn at_rest(mass: f64) -> Self {
        Self::new(mass, 0.0, 0.0, 0.0)
    }

    /// Minkowski product with another four-momentum.
    pub fn dot(&self, other: &Self) -> f64 {
        self.e * other.e - self.px * other.px - self.py * other.py - self.pz * other.pz
    }

    /// Invariant mass squared.
    pub fn mass_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass, clamped at zero for slightly space-like round-off.
    pub fn mass(&self) -> f64 {
        self.mass_squared().max(0.0).sqrt()
    }

    /// Magnitude of the spatial momentum.
    pub fn momentum(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Velocity vector `p / E` of the frame in which this momentum is at rest.
    pub fn boost_vector(&self) -> [f64; 3] {
        [self.px / self.e, self.py / self.e, self.pz / self.e]
    }

    /// Applies a pure Lorentz boost with velocity `beta`.
    pub fn boosted(&self, beta: [f64; 3]) -> Self {
        let b2 = beta[0] * beta[0] + beta[1] * beta[1] + beta[2] * beta[2];
        if b2 <= 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = beta[0] * self.px + beta[1] * self.py + beta[2] * self.pz;
        let gamma2 = (gamma - 1.0) / b2;
        let factor = gamma2 * bp + gamma * self.e;
        Self {
            e: gamma * (self.e + bp),
            px: self.px + factor * beta[0],
            py: self.py + factor * beta[1],
            pz: self.pz + factor * beta[2],
        }
    }

    /// Returns true when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.e.is_finite() && self.px.is_finite() && self.py.is_finite() && self.pz.is_finite()
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.e + rhs.e,
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
        )
    }
}

impl Sub for FourMomentum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.e - rhs.e,
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
        )
    }
}

impl Mul<f64> for FourMomentum {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.e * rhs, self.px * rhs, self.py * rhs, self.pz * rhs)
    }
}

impl Neg for FourMomentum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

/// Fixed-length vector of uniform variates from which an event is derived.
///
/// Components stay inside `[0, 1]` whenever the state is observable outside
/// of a sampler step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawState<const N: usize>(pub [f64; N]);

impl<const N: usize> RawState<N> {
    /// Dimension of the state.
    pub const DIM: usize = N;

    /// Returns the components as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns true when every component lies in `[0, 1]`.
    pub fn in_unit_cube(&self) -> bool {
        self.0.iter().all(|value| (0.0..=1.0).contains(value))
    }
}

impl<const N: usize> Default for RawState<N> {
    fn default() -> Self {
        Self([0.0; N])
    }
}

impl<const N: usize> Serialize for RawState<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, const N: usize> Deserialize<'de> for RawState<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        let len = values.len();
        let array: [f64; N] = values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"a raw state of the declared dimension"))?;
        Ok(Self(array))
    }
}

/// Final-state configuration together with its phase-space weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<F> {
    /// Four-momenta of the decay products.
    pub final_state: F,
    /// Jacobian weight of the phase-space map at this point.
    pub weight: f64,
}

impl<F> Event<F> {
    /// Creates a new event.
    pub fn new(final_state: F, weight: f64) -> Self {
        Self {
            final_state,
            weight,
        }
    }
}
