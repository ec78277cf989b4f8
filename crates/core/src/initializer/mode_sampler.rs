//! Vacuum fluctuation sampling for a single momentum mode
//!
//! Each mode receives one complex Gaussian draw `z = g₁ + i g₂` with
//! `g₁, g₂ ~ N(0, 1)`. The draw is scaled twice:
//!
//! ```text
//! f_k    = z · A / √(2 ω_k)          field value
//! fdot_k = z · A · √(ω_k / 2)        field derivative
//! ω_k    = √(k² + m_eff²),   k = (2π / L) · |p|
//! ```
//!
//! Self-conjugate modes take `g₂ = 0`. Modes with `ω_k² ≤ 0` (tachyonic or
//! exactly massless zero mode) carry no fluctuation at all.
//!
//! # Random streams
//!
//! Draws come from a `ChaCha8Rng` seeded once per field sweep and switched to
//! the stream numbered by the mode's linear index. A mode's draw therefore
//! depends only on `(seed, field, generation, index)`, never on which thread
//! sampled it or in which order.

use crate::core_types::{LatticeShape, MomentumModeCoordinate};
use crate::initializer::amplitude::FluctuationAmplitude;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use std::f64::consts::TAU;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0001_0000_01b3;

/// Which physical field a sweep belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    /// Primary field
    Phi,
    /// Optional second field
    Chi,
}

impl FieldTag {
    const fn discriminant(self) -> u64 {
        match self {
            Self::Phi => 0,
            Self::Chi => 1,
        }
    }
}

/// Per-mode random streams for one field sweep
#[derive(Debug, Clone)]
pub struct ModeStreams {
    base: ChaCha8Rng,
}

impl ModeStreams {
    /// Streams for `field` on the `generation`-th call of `initialize`
    #[must_use]
    pub fn new(seed: u64, field: FieldTag, generation: u32) -> Self {
        Self {
            base: ChaCha8Rng::seed_from_u64(stream_seed(seed, field, generation)),
        }
    }

    /// Fresh generator for the mode stored at `index`
    #[must_use]
    pub fn for_mode(&self, index: usize) -> ChaCha8Rng {
        let mut rng = self.base.clone();
        rng.set_stream(index as u64);
        rng
    }
}

fn stream_seed(seed: u64, field: FieldTag, generation: u32) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in seed
        .to_le_bytes()
        .into_iter()
        .chain(field.discriminant().to_le_bytes())
        .chain(generation.to_le_bytes())
    {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Unit complex Gaussian fluctuation shared by a field and its derivative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFluctuation(Complex64);

impl UnitFluctuation {
    /// Draw `g₁ + i g₂`; the imaginary part is exactly zero when `self_conjugate`
    pub fn draw<R: Rng>(rng: &mut R, self_conjugate: bool) -> Self {
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = if self_conjugate {
            0.0
        } else {
            rng.sample(StandardNormal)
        };
        Self(Complex64::new(re, im))
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> Complex64 {
        self.0
    }
}

/// Amplitudes produced for one conjugate pair of modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeAmplitudes {
    /// Linear index of the sampled mode
    pub index: usize,
    /// Linear index of its Fourier conjugate (equal to `index` when self-conjugate)
    pub conjugate_index: usize,
    /// Field-value amplitude at `index`
    pub value: Complex64,
    /// Derivative amplitude at `index`
    pub derivative: Complex64,
    pub self_conjugate: bool,
    /// False when the zero-fluctuation fallback was applied
    pub stable: bool,
}

impl ModeAmplitudes {
    /// Write the amplitudes at `index` and their conjugates at the partner index
    #[inline]
    pub fn write(&self, value: &mut [Complex64], derivative: &mut [Complex64]) {
        value[self.index] = self.value;
        derivative[self.index] = self.derivative;
        if !self.self_conjugate {
            value[self.conjugate_index] = self.value.conj();
            derivative[self.conjugate_index] = self.derivative.conj();
        }
    }
}

/// Samples vacuum amplitudes for individual momentum modes
#[derive(Debug, Clone, Copy)]
pub struct ModeSampler {
    shape: LatticeShape,
    /// Fundamental momentum `2π / L`
    fundamental_momentum: f64,
    amplitude: FluctuationAmplitude,
}

impl ModeSampler {
    #[must_use]
    pub fn new(shape: LatticeShape, box_length: f64, amplitude: FluctuationAmplitude) -> Self {
        Self {
            shape,
            fundamental_momentum: TAU / box_length,
            amplitude,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> LatticeShape {
        self.shape
    }

    #[must_use]
    pub const fn amplitude(&self) -> FluctuationAmplitude {
        self.amplitude
    }

    /// Physical momentum squared `k²` of a mode
    #[must_use]
    pub fn momentum_sq(&self, coord: MomentumModeCoordinate) -> f64 {
        let dk = self.fundamental_momentum;
        dk * dk * coord.wave_number_sq(self.shape.size())
    }

    /// Mode frequency `ω_k`, or `None` when `ω_k²` is not strictly positive
    #[must_use]
    pub fn dispersion(&self, coord: MomentumModeCoordinate, effective_mass_sq: f64) -> Option<f64> {
        let omega_sq = self.momentum_sq(coord) + effective_mass_sq;
        (omega_sq.is_finite() && omega_sq > 0.0).then(|| omega_sq.sqrt())
    }

    /// Field-value amplitude `z · A / √(2ω)`
    #[inline]
    #[must_use]
    pub fn field_amplitude(&self, unit: UnitFluctuation, omega: f64) -> Complex64 {
        unit.value() * (*self.amplitude / (2.0 * omega).sqrt())
    }

    /// Derivative amplitude `z · A · √(ω/2)`
    #[inline]
    #[must_use]
    pub fn derivative_amplitude(&self, unit: UnitFluctuation, omega: f64) -> Complex64 {
        unit.value() * (*self.amplitude * (omega / 2.0).sqrt())
    }

    /// Sample the mode at `coord` / `index`
    ///
    /// The caller supplies `self_conjugate`; it must agree with the coordinate.
    #[must_use]
    pub fn set_mode(
        &self,
        streams: &ModeStreams,
        coord: MomentumModeCoordinate,
        index: usize,
        effective_mass_sq: f64,
        self_conjugate: bool,
    ) -> ModeAmplitudes {
        debug_assert_eq!(self.shape.linear_index(coord), index);
        debug_assert_eq!(coord.is_self_conjugate(self.shape.size()), self_conjugate);

        let conjugate_index = self.shape.linear_index(coord.conjugate(self.shape.size()));

        let Some(omega) = self.dispersion(coord, effective_mass_sq) else {
            return ModeAmplitudes {
                index,
                conjugate_index,
                value: Complex64::default(),
                derivative: Complex64::default(),
                self_conjugate,
                stable: false,
            };
        };

        let unit = UnitFluctuation::draw(&mut streams.for_mode(index), self_conjugate);
        ModeAmplitudes {
            index,
            conjugate_index,
            value: self.field_amplitude(unit, omega),
            derivative: self.derivative_amplitude(unit, omega),
            self_conjugate,
            stable: true,
        }
    }
}
