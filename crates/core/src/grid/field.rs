//! Scalar field storage with real-space and frequency-space buffers
//!
//! A [`Field`] owns both representations of one scalar quantity on the lattice
//! and converts between them with a shared [`FftPlan3d`]. Frequency buffers use
//! the full complex layout described in [`crate::core_types::momentum`].

use crate::core_types::LatticeShape;
use crate::grid::fft::{FftDirection, FftPlan3d};
use num_complex::Complex64;
use std::sync::Arc;

/// One scalar field on the lattice
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    plan: Arc<FftPlan3d>,
    /// Real-space samples, one per site
    real: Vec<f64>,
    /// Frequency-space amplitudes, one per momentum coordinate
    frequency: Vec<Complex64>,
}

impl Field {
    /// Create a zeroed field with its own FFT plan
    #[must_use]
    pub fn new(name: impl Into<String>, shape: LatticeShape) -> Self {
        Self::with_plan(name, Arc::new(FftPlan3d::new(shape)))
    }

    /// Create a zeroed field sharing an existing FFT plan
    #[must_use]
    pub fn with_plan(name: impl Into<String>, plan: Arc<FftPlan3d>) -> Self {
        let len = plan.shape().len();
        Self {
            name: name.into(),
            plan,
            real: vec![0.0; len],
            frequency: vec![Complex64::default(); len],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shape(&self) -> LatticeShape {
        self.plan.shape()
    }

    /// Real-space samples in buffer order
    #[must_use]
    pub fn real_buffer(&self) -> &[f64] {
        &self.real
    }

    /// Mutable real-space samples
    pub fn real_buffer_mut(&mut self) -> &mut [f64] {
        &mut self.real
    }

    /// Frequency-space amplitudes in buffer order
    #[must_use]
    pub fn frequency_buffer(&self) -> &[Complex64] {
        &self.frequency
    }

    /// Mutable frequency-space amplitudes
    pub fn frequency_buffer_mut(&mut self) -> &mut [Complex64] {
        &mut self.frequency
    }

    /// Overwrite the real buffer with the inverse transform of the frequency buffer
    ///
    /// The transform is unnormalized. The imaginary part of the result is
    /// discarded; its largest magnitude is returned so callers can confirm the
    /// frequency data was Hermitian.
    pub fn transform_to_real_space(&mut self) -> f64 {
        let mut scratch = self.frequency.clone();
        self.plan.transform_inplace(&mut scratch, FftDirection::Inverse);

        let mut residual = 0.0_f64;
        for (sample, value) in self.real.iter_mut().zip(&scratch) {
            *sample = value.re;
            residual = residual.max(value.im.abs());
        }
        residual
    }

    /// Overwrite the frequency buffer with the forward transform of the real buffer
    pub fn transform_to_frequency_space(&mut self) {
        for (amplitude, &sample) in self.frequency.iter_mut().zip(&self.real) {
            *amplitude = Complex64::new(sample, 0.0);
        }
        self.plan.transform_inplace(&mut self.frequency, FftDirection::Forward);
    }

    /// First index whose amplitude is not the conjugate of its partner's
    ///
    /// Comparison is exact. Self-conjugate modes must therefore have a zero
    /// imaginary part. Returns `None` when the buffer is Hermitian.
    #[must_use]
    pub fn hermitian_violation(&self) -> Option<usize> {
        let shape = self.shape();
        (0..self.frequency.len()).find(|&index| {
            let partner = shape.conjugate_index(index);
            self.frequency[partner] != self.frequency[index].conj()
        })
    }

    /// Reset both buffers to zero
    pub fn clear(&mut self) {
        self.real.fill(0.0);
        self.frequency.fill(Complex64::default());
    }
}

/// A field and its time derivative, always initialized together
#[derive(Debug, Clone)]
pub struct FieldPair {
    /// Field value
    pub value: Field,
    /// Conformal-time derivative of the field
    pub derivative: Field,
}

impl FieldPair {
    /// Create a zeroed pair named `name` and `{name}dot` sharing one FFT plan
    #[must_use]
    pub fn new(name: &str, shape: LatticeShape) -> Self {
        let plan = Arc::new(FftPlan3d::new(shape));
        Self {
            value: Field::with_plan(name, Arc::clone(&plan)),
            derivative: Field::with_plan(format!("{name}dot"), plan),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.value.name()
    }

    #[must_use]
    pub fn shape(&self) -> LatticeShape {
        self.value.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::MomentumModeCoordinate;
    use approx::assert_relative_eq;

    fn shape(n: usize) -> LatticeShape {
        LatticeShape::new(n).unwrap()
    }

    #[test]
    fn test_field_creation() {
        let field = Field::new("phi", shape(4));
        assert_eq!(field.name(), "phi");
        assert_eq!(field.real_buffer().len(), 64);
        assert_eq!(field.frequency_buffer().len(), 64);
        assert!(field.real_buffer().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pair_names() {
        let pair = FieldPair::new("chi", shape(2));
        assert_eq!(pair.name(), "chi");
        assert_eq!(pair.derivative.name(), "chidot");
        assert_eq!(pair.shape(), shape(2));
    }

    #[test]
    fn test_hermitian_pair_transforms_to_real() {
        let lattice = shape(4);
        let mut field = Field::new("phi", lattice);
        let p = MomentumModeCoordinate::new(1, 2, 3);
        let amplitude = Complex64::new(0.75, -1.5);
        field.frequency_buffer_mut()[lattice.linear_index(p)] = amplitude;
        field.frequency_buffer_mut()[lattice.linear_index(p.conjugate(4))] = amplitude.conj();

        assert_eq!(field.hermitian_violation(), None);
        let residual = field.transform_to_real_space();
        assert!(residual < 1e-12, "residual {residual}");

        // Pair sums to 2 Re(a e^{ipx}); at the origin that is 2 Re(a)
        assert_relative_eq!(field.real_buffer()[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_hermitian_violation_detected() {
        let lattice = shape(4);
        let mut field = Field::new("phi", lattice);
        let index = lattice.linear_index(MomentumModeCoordinate::new(1, 0, 0));
        field.frequency_buffer_mut()[index] = Complex64::new(1.0, 1.0);

        assert!(field.hermitian_violation().is_some());
        assert!(field.transform_to_real_space() > 0.1);
    }

    #[test]
    fn test_self_conjugate_imaginary_is_violation() {
        let mut field = Field::new("phi", shape(4));
        field.frequency_buffer_mut()[0] = Complex64::new(1.0, 0.5);
        assert_eq!(field.hermitian_violation(), Some(0));
    }

    #[test]
    fn test_frequency_round_trip() {
        let mut field = Field::new("phi", shape(3));
        for (i, sample) in field.real_buffer_mut().iter_mut().enumerate() {
            *sample = (i as f64 * 0.37).sin();
        }
        let original = field.real_buffer().to_vec();

        field.transform_to_frequency_space();
        let residual = field.transform_to_real_space();

        assert!(residual < 1e-9);
        for (value, expected) in field.real_buffer().iter().zip(&original) {
            assert_relative_eq!(*value, expected * 27.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_clear() {
        let mut field = Field::new("phi", shape(2));
        field.real_buffer_mut()[3] = 2.0;
        field.frequency_buffer_mut()[1] = Complex64::new(1.0, 1.0);
        field.clear();
        assert!(field.real_buffer().iter().all(|&v| v == 0.0));
        assert!(field
            .frequency_buffer()
            .iter()
            .all(|&v| v == Complex64::default()));
    }
}
