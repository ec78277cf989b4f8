//! Reheating Lattice Initial Conditions
//!
//! Builds the `t = 0` state of one or two coupled scalar fields on a periodic
//! cubic lattice, ready for a nonlinear evolution run. Quantum vacuum
//! fluctuations are synthesized mode by mode in frequency space, normalized to
//! program units, and kept Hermitian so the inverse transform yields real
//! fields.
//!
//! ## Components
//!
//! - [`ModelConfiguration`]: box length, grid size, rescaling factors, masses,
//!   couplings, seed (JSON-loadable)
//! - [`Field`] / [`FieldPair`]: real and frequency buffers with a 3D FFT
//! - [`ModeSampler`]: dispersion relation and Gaussian draw for one mode
//! - [`FluctuationInitializer`]: sweeps every conjugate pair of every field

// Core types and utilities
pub mod core_types;
pub mod error;

// Field storage and transforms
pub mod grid;

// Initial-condition generation
pub mod initializer;

// Re-export core types
pub use core_types::{FieldParameters, LatticeShape, ModelConfiguration, MomentumModeCoordinate};
pub use error::{InitError, Result};

// Re-export grid types
pub use grid::{Field, FieldPair, FieldStatistics, FftPlan3d};

// Re-export initializer types
pub use initializer::{
    FluctuationAmplitude, FluctuationInitializer, InitializationReport, Initializer,
    InitializerState, ModeSampler, SweepReport,
};
