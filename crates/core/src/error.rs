//! Error types for initial-condition construction
//!
//! Only configuration problems surface as errors. Unstable modes are handled by
//! the zero-fluctuation fallback inside the sampler and symmetry violations are
//! programming errors checked by assertion, so neither appears here.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = InitError> = std::result::Result<T, E>;

/// Errors detected before any field buffer is touched
#[derive(Debug, Error)]
pub enum InitError {
    /// A configuration value is out of its physical or numerical domain
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter (e.g. `"box_length"`)
        parameter: &'static str,
        /// Human-readable description of the problem
        reason: String,
    },

    /// A field buffer does not match the lattice implied by the configuration
    #[error("field '{field}' has {actual} sites, configuration expects {expected}")]
    GridMismatch {
        /// Name of the mismatched field
        field: String,
        /// Site count derived from `total_gridpoints`
        expected: usize,
        /// Site count of the field buffer
        actual: usize,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration from {}", path.display())]
    ConfigLoad {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration file contents are not valid JSON for the model
    #[error("failed to parse configuration")]
    ConfigParse(#[from] serde_json::Error),
}

impl InitError {
    /// Shorthand for [`InitError::InvalidConfiguration`]
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}
