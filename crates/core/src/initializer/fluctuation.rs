//! Vacuum fluctuation initializer for one or two coupled fields
//!
//! Orchestrates the per-mode sampling for `phi` and, when present, `chi`:
//!
//! 1. The global amplitude is computed once at construction.
//! 2. Each field gets its effective mass² (bare mass, coupling to the partner
//!    background, conformal-expansion correction).
//! 3. Every conjugate pair of momentum modes is sampled exactly once, in
//!    parallel, by the mode with the lower linear index (the pair's owner).
//! 4. Owners' amplitudes are scattered into the frequency buffers in linear
//!    index order, then both buffers are inverse transformed.
//!
//! Owners write both members of their pair, so no two tasks ever touch the same
//! index and the conjugate relation holds bit for bit.

use crate::core_types::{LatticeShape, ModelConfiguration};
use crate::error::{InitError, Result};
use crate::grid::{FieldPair, FieldStatistics};
use crate::initializer::amplitude::FluctuationAmplitude;
use crate::initializer::mode_sampler::{FieldTag, ModeAmplitudes, ModeSampler, ModeStreams};
use crate::initializer::r#trait::Initializer;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle of a [`FluctuationInitializer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerState {
    /// Constructed, no field touched yet
    Uninitialized,
    /// Internal marker held while `initialize` runs
    ///
    /// `initialize` takes `&mut self`, so callers only see this state if a
    /// sweep panicked partway and the initializer was recovered afterwards.
    Initializing,
    /// All fields populated
    Initialized,
}

/// Outcome of sweeping one field pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// Name of the value field
    pub field: String,
    /// Effective mass² used for the dispersion relation
    pub effective_mass_sq: f64,
    /// Conjugate pairs sampled (self-conjugate modes count as one pair)
    pub pairs_sampled: usize,
    /// Modes that are their own conjugate
    pub self_conjugate_modes: usize,
    /// Pairs zeroed because `ω²` was not strictly positive
    pub unstable_modes: usize,
    /// Largest imaginary magnitude discarded by either inverse transform
    pub imaginary_residual: f64,
    pub value_statistics: FieldStatistics,
    pub derivative_statistics: FieldStatistics,
}

/// Reports for every field populated by one call of `initialize`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializationReport {
    /// Zero for the first call, incremented on each repeat
    pub generation: u32,
    pub phi: SweepReport,
    pub chi: Option<SweepReport>,
}

/// Populates `phi`/`phidot` (and optionally `chi`/`chidot`) with vacuum fluctuations
pub struct FluctuationInitializer<'a> {
    config: &'a ModelConfiguration,
    phi: &'a mut FieldPair,
    chi: Option<&'a mut FieldPair>,
    fluctuation_amplitude: FluctuationAmplitude,
    sampler: ModeSampler,
    state: InitializerState,
    generation: u32,
    report: Option<InitializationReport>,
}

impl<'a> FluctuationInitializer<'a> {
    /// Validate the configuration and borrow the fields to populate
    ///
    /// `chi` must be supplied exactly when the configuration has second-field
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] for an invalid configuration
    /// or a mismatch between configured and supplied fields, and
    /// [`InitError::GridMismatch`] if any buffer size differs from
    /// `total_gridpoints`. No field is modified on error.
    pub fn new(
        config: &'a ModelConfiguration,
        phi: &'a mut FieldPair,
        chi: Option<&'a mut FieldPair>,
    ) -> Result<Self> {
        let fluctuation_amplitude = FluctuationAmplitude::from_configuration(config)?;
        let shape = config.lattice_shape()?;

        check_pair(shape, phi)?;
        match (&config.chi, chi.as_deref()) {
            (Some(_), Some(pair)) => check_pair(shape, pair)?,
            (None, None) => {}
            (None, Some(_)) => {
                return Err(InitError::invalid(
                    "chi",
                    "second field supplied but no chi parameters are configured",
                ))
            }
            (Some(_), None) => {
                return Err(InitError::invalid(
                    "chi",
                    "parameters configured but no second field supplied",
                ))
            }
        }

        info!(
            "Fluctuation initializer: {}³ grid, L={:.4}, adot={:.4}, amplitude={:.6e}, chi={}",
            shape.size(),
            config.box_length,
            config.adot,
            *fluctuation_amplitude,
            chi.is_some()
        );

        Ok(Self {
            config,
            phi,
            chi,
            fluctuation_amplitude,
            sampler: ModeSampler::new(shape, config.box_length, fluctuation_amplitude),
            state: InitializerState::Uninitialized,
            generation: 0,
            report: None,
        })
    }

    #[must_use]
    pub const fn state(&self) -> InitializerState {
        self.state
    }

    #[must_use]
    pub const fn fluctuation_amplitude(&self) -> FluctuationAmplitude {
        self.fluctuation_amplitude
    }

    /// Conformal expansion rate at initialization
    #[must_use]
    pub const fn adot(&self) -> f64 {
        self.config.adot
    }

    /// Report of the most recent `initialize` call
    #[must_use]
    pub const fn report(&self) -> Option<&InitializationReport> {
        self.report.as_ref()
    }

    fn run(&mut self) -> InitializationReport {
        let generation = self.generation;
        let seed = self.config.seed;

        let phi_mass_sq = self.config.phi_effective_mass_sq();
        let phi = initialize_field(
            &self.sampler,
            &ModeStreams::new(seed, FieldTag::Phi, generation),
            self.phi,
            phi_mass_sq,
        );

        let chi = match (self.chi.as_deref_mut(), self.config.chi_effective_mass_sq()) {
            (Some(pair), Some(chi_mass_sq)) => Some(initialize_field(
                &self.sampler,
                &ModeStreams::new(seed, FieldTag::Chi, generation),
                pair,
                chi_mass_sq,
            )),
            _ => None,
        };

        InitializationReport {
            generation,
            phi,
            chi,
        }
    }
}

impl Initializer for FluctuationInitializer<'_> {
    fn initialize(&mut self) {
        if self.state == InitializerState::Initialized {
            warn!(
                "Re-initializing fields (generation {}); previous data is overwritten",
                self.generation
            );
        }
        self.state = InitializerState::Initializing;

        let report = self.run();

        info!(
            "Initialized {} field pair(s), generation {}",
            1 + usize::from(report.chi.is_some()),
            report.generation
        );

        self.report = Some(report);
        self.generation = self.generation.wrapping_add(1);
        self.state = InitializerState::Initialized;
    }

    fn is_initialized(&self) -> bool {
        self.state == InitializerState::Initialized
    }
}

fn check_pair(shape: LatticeShape, pair: &FieldPair) -> Result<()> {
    for field in [&pair.value, &pair.derivative] {
        let actual = field.real_buffer().len();
        if field.shape() != shape || actual != shape.len() {
            return Err(InitError::GridMismatch {
                field: field.name().to_string(),
                expected: shape.len(),
                actual,
            });
        }
    }
    Ok(())
}

/// Sample every conjugate pair of one field, then transform to real space
///
/// Owners are visited in parallel; their writes are applied in linear index
/// order (`pz` fastest).
fn initialize_field(
    sampler: &ModeSampler,
    streams: &ModeStreams,
    pair: &mut FieldPair,
    effective_mass_sq: f64,
) -> SweepReport {
    let shape = sampler.shape();
    let n = shape.size();

    let modes: Vec<ModeAmplitudes> = (0..shape.len())
        .into_par_iter()
        .filter_map(|index| {
            let coord = shape.coordinate(index);
            let conjugate_index = shape.linear_index(coord.conjugate(n));
            (index <= conjugate_index).then(|| {
                sampler.set_mode(
                    streams,
                    coord,
                    index,
                    effective_mass_sq,
                    index == conjugate_index,
                )
            })
        })
        .collect();

    let FieldPair { value, derivative } = pair;
    {
        let value_buffer = value.frequency_buffer_mut();
        let derivative_buffer = derivative.frequency_buffer_mut();
        for mode in &modes {
            mode.write(value_buffer, derivative_buffer);
        }
    }

    debug_assert!(
        value.hermitian_violation().is_none() && derivative.hermitian_violation().is_none(),
        "conjugate pair mismatch in '{}'",
        value.name()
    );

    let value_residual = value.transform_to_real_space();
    let derivative_residual = derivative.transform_to_real_space();

    let self_conjugate_modes = modes.iter().filter(|mode| mode.self_conjugate).count();
    let unstable_modes = modes.iter().filter(|mode| !mode.stable).count();

    let report = SweepReport {
        field: value.name().to_string(),
        effective_mass_sq,
        pairs_sampled: modes.len(),
        self_conjugate_modes,
        unstable_modes,
        imaginary_residual: value_residual.max(derivative_residual),
        value_statistics: FieldStatistics::from_samples(value.real_buffer()),
        derivative_statistics: FieldStatistics::from_samples(derivative.real_buffer()),
    };

    debug!(
        "Field '{}': m_eff²={:.4e}, {} pairs ({} self-conjugate), residual={:.3e}, {}",
        report.field,
        effective_mass_sq,
        report.pairs_sampled,
        report.self_conjugate_modes,
        report.imaginary_residual,
        report.value_statistics
    );
    if unstable_modes > 0 {
        warn!(
            "Field '{}': {} unstable mode pair(s) with ω² <= 0 set to zero fluctuation",
            report.field, unstable_modes
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::FieldParameters;
    use crate::grid::Field;

    fn config(n: usize, with_chi: bool) -> ModelConfiguration {
        ModelConfiguration {
            total_gridpoints: n * n * n,
            box_length: 1.0,
            reference_length: 1.0,
            chi: with_chi.then_some(FieldParameters::new(0.0, 0.0)),
            ..Default::default()
        }
    }

    fn shape(n: usize) -> LatticeShape {
        LatticeShape::new(n).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let config = config(4, false);
        let mut phi = FieldPair::new("phi", shape(4));
        let mut init = FluctuationInitializer::new(&config, &mut phi, None).unwrap();

        assert_eq!(init.state(), InitializerState::Uninitialized);
        assert!(!init.is_initialized());
        assert!(init.report().is_none());

        init.initialize();
        assert_eq!(init.state(), InitializerState::Initialized);
        assert!(init.is_initialized());
        assert_eq!(init.report().unwrap().generation, 0);

        // Repeat calls also finish in the terminal state
        init.initialize();
        assert_eq!(init.state(), InitializerState::Initialized);
        assert_ne!(init.state(), InitializerState::Initializing);
    }

    #[test]
    fn test_report_counts_pairs() {
        let config = config(4, true);
        let mut phi = FieldPair::new("phi", shape(4));
        let mut chi = FieldPair::new("chi", shape(4));
        let mut init = FluctuationInitializer::new(&config, &mut phi, Some(&mut chi)).unwrap();
        init.initialize();

        let report = init.report().unwrap();
        // (64 + 8 self-conjugate) / 2 owners
        assert_eq!(report.phi.pairs_sampled, 36);
        assert_eq!(report.phi.self_conjugate_modes, 8);
        assert_eq!(report.phi.unstable_modes, 0);
        assert_eq!(report.phi.field, "phi");

        let chi_report = report.chi.as_ref().unwrap();
        assert_eq!(chi_report.field, "chi");
        assert_eq!(chi_report.pairs_sampled, 36);
    }

    #[test]
    fn test_repeat_initialize_rerandomizes() {
        let config = config(4, false);
        let mut phi = FieldPair::new("phi", shape(4));
        let mut init = FluctuationInitializer::new(&config, &mut phi, None).unwrap();

        init.initialize();
        let first = init.phi.value.frequency_buffer().to_vec();
        init.initialize();

        assert_eq!(init.report().unwrap().generation, 1);
        assert_ne!(init.phi.value.frequency_buffer(), first.as_slice());
        assert_eq!(init.state(), InitializerState::Initialized);
    }

    #[test]
    fn test_grid_mismatch_leaves_fields_untouched() {
        let config = config(4, false);
        let mut phi = FieldPair {
            value: Field::new("phi", shape(4)),
            derivative: Field::new("phidot", shape(3)),
        };
        phi.value.real_buffer_mut()[0] = 5.0;

        let err = FluctuationInitializer::new(&config, &mut phi, None)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            InitError::GridMismatch {
                expected: 64,
                actual: 27,
                ..
            }
        ));
        assert_eq!(phi.value.real_buffer()[0], 5.0);
    }

    #[test]
    fn test_chi_presence_must_match_configuration() {
        let without_chi = config(2, false);
        let mut phi = FieldPair::new("phi", shape(2));
        let mut chi = FieldPair::new("chi", shape(2));
        assert!(matches!(
            FluctuationInitializer::new(&without_chi, &mut phi, Some(&mut chi)),
            Err(InitError::InvalidConfiguration {
                parameter: "chi",
                ..
            })
        ));

        let with_chi = config(2, true);
        assert!(matches!(
            FluctuationInitializer::new(&with_chi, &mut phi, None),
            Err(InitError::InvalidConfiguration {
                parameter: "chi",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let config = ModelConfiguration {
            box_length: 0.0,
            ..config(2, false)
        };
        let mut phi = FieldPair::new("phi", shape(2));
        assert!(FluctuationInitializer::new(&config, &mut phi, None).is_err());
    }

    #[test]
    fn test_every_index_written() {
        let config = config(5, false);
        let lattice = shape(5);
        let sampler = ModeSampler::new(
            lattice,
            config.box_length,
            FluctuationAmplitude::from_configuration(&config).unwrap(),
        );
        let mut pair = FieldPair::new("phi", lattice);
        let report = initialize_field(
            &sampler,
            &ModeStreams::new(3, FieldTag::Phi, 0),
            &mut pair,
            1.0,
        );

        // Odd grid: only the zero mode is self-conjugate
        assert_eq!(report.self_conjugate_modes, 1);
        assert_eq!(report.pairs_sampled, (125 + 1) / 2);
        assert!(pair
            .value
            .frequency_buffer()
            .iter()
            .all(|amplitude| *amplitude != num_complex::Complex64::default()));
        assert_eq!(pair.value.hermitian_violation(), None);
    }
}
