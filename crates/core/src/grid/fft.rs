//! Three-dimensional complex FFT on a cubic lattice
//!
//! Built from one-dimensional `rustfft` plans applied along each axis in turn.
//! Neither direction is normalized, matching the FFTW convention the amplitude
//! normalization is written for: a forward transform followed by an inverse one
//! multiplies the data by `N³`.
//!
//! Lines along an axis are transformed in parallel and scattered back in a
//! fixed order, so results do not depend on thread scheduling.

use crate::core_types::LatticeShape;
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    /// Real space to frequency space (`e^{-ikx}`)
    Forward,
    /// Frequency space to real space (`e^{+ikx}`)
    Inverse,
}

/// Reusable forward and inverse plans for one lattice size
#[derive(Clone)]
pub struct FftPlan3d {
    shape: LatticeShape,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for FftPlan3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlan3d")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl FftPlan3d {
    /// Plan transforms for a lattice of the given shape
    #[must_use]
    pub fn new(shape: LatticeShape) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let n = shape.size();
        Self {
            shape,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
        }
    }

    /// Lattice shape this plan was built for
    #[must_use]
    pub const fn shape(&self) -> LatticeShape {
        self.shape
    }

    /// Transform `data` in place
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` differs from the lattice site count
    pub fn transform_inplace(&self, data: &mut [Complex64], direction: FftDirection) {
        assert_eq!(
            data.len(),
            self.shape.len(),
            "FFT buffer length does not match lattice"
        );
        let fft = match direction {
            FftDirection::Forward => &self.forward,
            FftDirection::Inverse => &self.inverse,
        };
        let n = self.shape.size();

        // z: contiguous rows
        data.par_chunks_mut(n).for_each_init(
            || vec![Complex64::default(); fft.get_inplace_scratch_len()],
            |scratch, row| fft.process_with_scratch(row, scratch),
        );

        // y then x: strided lines
        transform_strided(fft, data, n, n);
        transform_strided(fft, data, n, n * n);
    }
}

/// Transform every line of stride `stride` through the buffer
fn transform_strided(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64], n: usize, stride: usize) {
    let line_count = data.len() / n;
    let base_of = |line: usize| (line / stride) * stride * n + line % stride;

    let source: &[Complex64] = data;
    let lines: Vec<Vec<Complex64>> = (0..line_count)
        .into_par_iter()
        .map(|line| {
            let base = base_of(line);
            let mut buffer: Vec<Complex64> = (0..n).map(|i| source[base + i * stride]).collect();
            fft.process(&mut buffer);
            buffer
        })
        .collect();

    for (line, buffer) in lines.into_iter().enumerate() {
        let base = base_of(line);
        for (i, value) in buffer.into_iter().enumerate() {
            data[base + i * stride] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shape(n: usize) -> LatticeShape {
        LatticeShape::new(n).unwrap()
    }

    #[test]
    fn test_inverse_of_zero_mode_is_constant() {
        let plan = FftPlan3d::new(shape(4));
        let mut data = vec![Complex64::default(); 64];
        data[0] = Complex64::new(64.0, 0.0);

        plan.transform_inplace(&mut data, FftDirection::Inverse);

        for value in &data {
            assert_relative_eq!(value.re, 64.0, epsilon = 1e-12);
            assert_relative_eq!(value.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forward_inverse_scales_by_site_count() {
        let plan = FftPlan3d::new(shape(3));
        let original: Vec<Complex64> = (0..27_i32)
            .map(|i| Complex64::new(f64::from(i) * 0.5, -f64::from(i % 4)))
            .collect();
        let mut data = original.clone();

        plan.transform_inplace(&mut data, FftDirection::Forward);
        plan.transform_inplace(&mut data, FftDirection::Inverse);

        for (value, expected) in data.iter().zip(&original) {
            assert_relative_eq!(value.re, expected.re * 27.0, epsilon = 1e-9);
            assert_relative_eq!(value.im, expected.im * 27.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_mode_along_x_axis() {
        // Mode p = (1, 0, 0) on N = 4 gives e^{+i π x / 2} in real space
        let n = 4;
        let lattice = shape(n);
        let plan = FftPlan3d::new(lattice);
        let mut data = vec![Complex64::default(); lattice.len()];
        data[lattice.linear_index(crate::core_types::MomentumModeCoordinate::new(1, 0, 0))] =
            Complex64::new(1.0, 0.0);

        plan.transform_inplace(&mut data, FftDirection::Inverse);

        for (index, value) in data.iter().enumerate() {
            let x = lattice.coordinate(index).px as f64;
            let phase = std::f64::consts::TAU * x / n as f64;
            assert_relative_eq!(value.re, phase.cos(), epsilon = 1e-12);
            assert_relative_eq!(value.im, phase.sin(), epsilon = 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "FFT buffer length does not match lattice")]
    fn test_length_mismatch_panics() {
        let plan = FftPlan3d::new(shape(2));
        let mut data = vec![Complex64::default(); 7];
        plan.transform_inplace(&mut data, FftDirection::Forward);
    }
}
