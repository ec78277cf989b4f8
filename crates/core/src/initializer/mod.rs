//! Initial-condition generation for lattice scalar fields
//!
//! The core abstraction is the [`Initializer`] trait. [`FluctuationInitializer`]
//! implements it by filling each field's frequency buffer with vacuum
//! fluctuations and inverse transforming to real space.
//!
//! # Example
//!
//! ```rust
//! use reheat_core::{FieldPair, FluctuationInitializer, Initializer, ModelConfiguration};
//!
//! let config = ModelConfiguration {
//!     total_gridpoints: 8 * 8 * 8,
//!     ..Default::default()
//! };
//! let shape = config.lattice_shape().unwrap();
//! let mut phi = FieldPair::new("phi", shape);
//! let mut chi = FieldPair::new("chi", shape);
//!
//! let mut init = FluctuationInitializer::new(&config, &mut phi, Some(&mut chi)).unwrap();
//! init.initialize();
//! assert!(init.is_initialized());
//! ```

pub mod amplitude;
mod fluctuation;
pub mod mode_sampler;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use amplitude::FluctuationAmplitude;
pub use fluctuation::{
    FluctuationInitializer, InitializationReport, InitializerState, SweepReport,
};
pub use mode_sampler::{FieldTag, ModeAmplitudes, ModeSampler, ModeStreams, UnitFluctuation};
pub use r#trait::Initializer;
