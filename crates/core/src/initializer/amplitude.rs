//! Global fluctuation normalization
//!
//! Converts the unit vacuum amplitude into program units for an unnormalized
//! inverse transform on `N³` sites:
//!
//! ```text
//! A = rescale_a · rescale_b · N³ / ((reference_length / box_length)^{3/2} · √2)
//! ```

use crate::core_types::ModelConfiguration;
use crate::error::{InitError, Result};
use std::f64::consts::SQRT_2;
use std::ops::Deref;

/// Normalization constant shared by every mode of every field
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct FluctuationAmplitude(f64);

impl Deref for FluctuationAmplitude {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl FluctuationAmplitude {
    /// Compute the amplitude from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] if the configuration fails
    /// validation or the result is not strictly positive and finite
    pub fn from_configuration(config: &ModelConfiguration) -> Result<Self> {
        config.validate()?;

        let length_ratio = config.reference_length / config.box_length;
        let value = config.rescale_a * config.rescale_b * config.total_gridpoints as f64
            / (length_ratio.powf(1.5) * SQRT_2);

        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(InitError::invalid(
                "fluctuation_amplitude",
                format!("must be positive and finite, got {value}"),
            ))
        }
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}
