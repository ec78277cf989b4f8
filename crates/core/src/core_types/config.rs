//! Physical and numerical model configuration
//!
//! All quantities are in the rescaled (dimensionless) program units used by the
//! lattice. The default model is a two-field preheating setup:
//! an inflaton `phi` with unit rescaled mass coupled to a massless
//! `chi` through `g² φ² χ²`.
//!
//! Configurations can be loaded from JSON; missing keys fall back to defaults.

use crate::core_types::momentum::LatticeShape;
use crate::error::{InitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Conformal-expansion correction coefficient applied to `adot²`
pub const EXPANSION_MASS_COEFFICIENT: f64 = 2.25;

/// Mass and background value of one scalar field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParameters {
    /// Bare mass squared in program units (may be negative for tachyonic models)
    pub mass_sq: f64,
    /// Homogeneous background value at initialization
    pub homogeneous_value: f64,
}

impl FieldParameters {
    #[must_use]
    pub const fn new(mass_sq: f64, homogeneous_value: f64) -> Self {
        Self {
            mass_sq,
            homogeneous_value,
        }
    }
}

impl Default for FieldParameters {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Read-only model constants consumed by the initializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfiguration {
    /// Field-amplitude rescaling factor (`A` in `f_pr = A a^r f`)
    pub rescale_a: f64,
    /// Time/length rescaling factor (`B` in `dt_pr = B a^s dt`)
    pub rescale_b: f64,
    /// Total number of lattice sites; must be a perfect cube
    pub total_gridpoints: usize,
    /// Comoving box length in program units
    pub box_length: f64,
    /// Reference length the amplitude normalization is expressed against
    pub reference_length: f64,
    /// Conformal expansion rate at initialization
    pub adot: f64,
    /// Coupling `g²` of the `g² φ² χ²` interaction
    pub coupling_sq: f64,
    /// Primary field
    pub phi: FieldParameters,
    /// Optional second field; `None` runs a single-field model
    pub chi: Option<FieldParameters>,
    /// Seed for the mode random streams
    pub seed: u64,
}

impl Default for ModelConfiguration {
    fn default() -> Self {
        Self {
            rescale_a: 1.0,
            rescale_b: 1.0,
            total_gridpoints: 32 * 32 * 32,
            box_length: 10.0,
            reference_length: 10.0,
            adot: 0.5,
            coupling_sq: 1.0,
            phi: FieldParameters::new(1.0, 1.0),
            chi: Some(FieldParameters::new(0.0, 0.0)),
            seed: 1,
        }
    }
}

impl ModelConfiguration {
    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    ///
    /// Returns [`InitError::ConfigParse`] for malformed JSON and
    /// [`InitError::InvalidConfiguration`] if validation fails
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns [`InitError::ConfigLoad`] if the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InitError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Check every value the initializer depends on
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] naming the first offending
    /// parameter
    pub fn validate(&self) -> Result<()> {
        positive("rescale_a", self.rescale_a)?;
        positive("rescale_b", self.rescale_b)?;
        positive("box_length", self.box_length)?;
        positive("reference_length", self.reference_length)?;
        finite("adot", self.adot)?;
        finite("coupling_sq", self.coupling_sq)?;
        finite("phi.mass_sq", self.phi.mass_sq)?;
        finite("phi.homogeneous_value", self.phi.homogeneous_value)?;
        if let Some(chi) = &self.chi {
            finite("chi.mass_sq", chi.mass_sq)?;
            finite("chi.homogeneous_value", chi.homogeneous_value)?;
        }
        LatticeShape::from_total_gridpoints(self.total_gridpoints)?;
        Ok(())
    }

    /// Lattice shape implied by `total_gridpoints`
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] if the count is not a
    /// positive perfect cube
    pub fn lattice_shape(&self) -> Result<LatticeShape> {
        LatticeShape::from_total_gridpoints(self.total_gridpoints)
    }

    /// Whether a second field is configured
    #[must_use]
    pub const fn has_chi(&self) -> bool {
        self.chi.is_some()
    }

    /// Effective mass² of `phi` including coupling and expansion correction
    ///
    /// ```text
    /// m_eff² = m_φ² + g² χ₀² - 9/4 adot²
    /// ```
    #[must_use]
    pub fn phi_effective_mass_sq(&self) -> f64 {
        let chi0 = self.chi.map_or(0.0, |chi| chi.homogeneous_value);
        self.effective_mass_sq(self.phi.mass_sq, chi0)
    }

    /// Effective mass² of `chi`, or `None` for a single-field model
    ///
    /// ```text
    /// m_eff² = m_χ² + g² φ₀² - 9/4 adot²
    /// ```
    #[must_use]
    pub fn chi_effective_mass_sq(&self) -> Option<f64> {
        self.chi
            .map(|chi| self.effective_mass_sq(chi.mass_sq, self.phi.homogeneous_value))
    }

    fn effective_mass_sq(&self, bare_mass_sq: f64, partner_value: f64) -> f64 {
        bare_mass_sq + self.coupling_sq * partner_value * partner_value
            - EXPANSION_MASS_COEFFICIENT * self.adot * self.adot
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InitError::invalid(
            parameter,
            format!("must be positive and finite, got {value}"),
        ))
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InitError::invalid(
            parameter,
            format!("must be finite, got {value}"),
        ))
    }
}
