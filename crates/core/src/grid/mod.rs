//! Lattice field storage and transforms

pub mod fft;
pub mod field;
pub mod statistics;

pub use fft::{FftDirection, FftPlan3d};
pub use field::{Field, FieldPair};
pub use statistics::FieldStatistics;
