//! Core types and utilities

pub mod config;
pub mod momentum;

pub use config::{FieldParameters, ModelConfiguration, EXPANSION_MASS_COEFFICIENT};
pub use momentum::{LatticeShape, MomentumModeCoordinate};
