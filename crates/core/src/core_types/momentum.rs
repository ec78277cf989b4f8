//! Lattice shape and momentum-space coordinates
//!
//! The lattice is a periodic cube of `N × N × N` sites. Frequency-space buffers
//! use the full complex layout with the same linear ordering as real space:
//!
//! ```text
//! index = (px * N + py) * N + pz      (pz varies fastest)
//! ```
//!
//! A momentum coordinate `p` and its Fourier conjugate `(-p) mod N` must carry
//! complex-conjugate amplitudes for the real-space field to be real. Coordinates
//! whose every component is `0` or the Nyquist index `N/2` are their own
//! conjugate.

use crate::error::{InitError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Shape of a cubic periodic lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatticeShape {
    n: usize,
}

impl LatticeShape {
    /// Create a shape with `n` sites along each axis
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] if `n` is zero
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(InitError::invalid(
                "grid_size",
                "must have at least one site per axis",
            ));
        }
        Ok(Self { n })
    }

    /// Derive the linear dimension from a total grid-point count
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfiguration`] if the count is zero or not a
    /// perfect cube
    pub fn from_total_gridpoints(total: usize) -> Result<Self> {
        if total == 0 {
            return Err(InitError::invalid("total_gridpoints", "must be positive"));
        }
        let n = (total as f64).cbrt().round() as usize;
        // cbrt rounding can land one off for large counts
        let n = [n.saturating_sub(1), n, n + 1]
            .into_iter()
            .find(|&c| c.checked_pow(3) == Some(total))
            .ok_or_else(|| {
                InitError::invalid(
                    "total_gridpoints",
                    format!("must be a perfect cube, got {total}"),
                )
            })?;
        Self::new(n)
    }

    /// Sites along one axis
    #[must_use]
    pub const fn size(&self) -> usize {
        self.n
    }

    /// Total number of lattice sites (`N³`)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n * self.n * self.n
    }

    /// A lattice always has at least one site
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Linear buffer index of a coordinate
    #[inline]
    #[must_use]
    pub const fn linear_index(&self, coord: MomentumModeCoordinate) -> usize {
        (coord.px * self.n + coord.py) * self.n + coord.pz
    }

    /// Coordinate stored at a linear buffer index
    #[inline]
    #[must_use]
    pub const fn coordinate(&self, index: usize) -> MomentumModeCoordinate {
        let n = self.n;
        MomentumModeCoordinate {
            px: index / (n * n),
            py: (index / n) % n,
            pz: index % n,
        }
    }

    /// Linear index of the Fourier conjugate of the mode at `index`
    #[inline]
    #[must_use]
    pub const fn conjugate_index(&self, index: usize) -> usize {
        self.linear_index(self.coordinate(index).conjugate(self.n))
    }

    /// Iterate over every coordinate in buffer order
    pub fn coordinates(&self) -> impl Iterator<Item = MomentumModeCoordinate> + '_ {
        (0..self.len()).map(|index| self.coordinate(index))
    }
}

/// Integer coordinate `(px, py, pz)` on the momentum-space grid
///
/// Components are stored in FFT order (`0..N`); see [`Self::wave_numbers`] for
/// the signed frequencies they represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MomentumModeCoordinate {
    pub px: usize,
    pub py: usize,
    pub pz: usize,
}

impl MomentumModeCoordinate {
    /// The zero mode
    pub const ZERO: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(px: usize, py: usize, pz: usize) -> Self {
        Self { px, py, pz }
    }

    /// Fourier conjugate `(-p) mod N`
    #[inline]
    #[must_use]
    pub const fn conjugate(self, n: usize) -> Self {
        Self {
            px: (n - self.px) % n,
            py: (n - self.py) % n,
            pz: (n - self.pz) % n,
        }
    }

    /// True when the mode is its own Fourier conjugate
    ///
    /// Holds exactly for coordinates whose components are all `0` or `N/2`
    /// (the latter only for even `N`).
    #[inline]
    #[must_use]
    pub fn is_self_conjugate(self, n: usize) -> bool {
        self.conjugate(n) == self
    }

    /// Signed integer wave numbers
    ///
    /// Index `i ≤ N/2` maps to `i`, larger indices wrap to `i - N`.
    #[must_use]
    pub fn wave_numbers(self, n: usize) -> Vector3<f64> {
        let signed = |i: usize| {
            if i <= n / 2 {
                i as f64
            } else {
                i as f64 - n as f64
            }
        };
        Vector3::new(signed(self.px), signed(self.py), signed(self.pz))
    }

    /// Squared lattice momentum in units of the fundamental mode `2π/L`
    #[inline]
    #[must_use]
    pub fn wave_number_sq(self, n: usize) -> f64 {
        self.wave_numbers(n).norm_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_from_total_gridpoints() {
        assert_eq!(LatticeShape::from_total_gridpoints(64).unwrap().size(), 4);
        assert_eq!(LatticeShape::from_total_gridpoints(1).unwrap().size(), 1);
        assert_eq!(
            LatticeShape::from_total_gridpoints(256 * 256 * 256)
                .unwrap()
                .size(),
            256
        );
    }

    #[test]
    fn test_shape_rejects_non_cube() {
        assert!(matches!(
            LatticeShape::from_total_gridpoints(100),
            Err(InitError::InvalidConfiguration {
                parameter: "total_gridpoints",
                ..
            })
        ));
        assert!(LatticeShape::from_total_gridpoints(0).is_err());
        assert!(LatticeShape::new(0).is_err());
    }

    #[test]
    fn test_linear_index_round_trip() {
        let shape = LatticeShape::new(5).unwrap();
        for index in 0..shape.len() {
            assert_eq!(shape.linear_index(shape.coordinate(index)), index);
        }
        // pz varies fastest
        assert_eq!(shape.linear_index(MomentumModeCoordinate::new(0, 0, 1)), 1);
        assert_eq!(shape.linear_index(MomentumModeCoordinate::new(0, 1, 0)), 5);
        assert_eq!(shape.linear_index(MomentumModeCoordinate::new(1, 0, 0)), 25);
    }

    #[test]
    fn test_conjugate_is_involution() {
        let shape = LatticeShape::new(6).unwrap();
        for coord in shape.coordinates() {
            assert_eq!(coord.conjugate(6).conjugate(6), coord);
        }
    }

    #[test]
    fn test_self_conjugate_modes_even_grid() {
        let shape = LatticeShape::new(4).unwrap();
        let self_conjugate: Vec<_> = shape
            .coordinates()
            .filter(|c| c.is_self_conjugate(4))
            .collect();

        // Components drawn from {0, 2}: 2^3 modes
        assert_eq!(self_conjugate.len(), 8);
        assert!(self_conjugate.contains(&MomentumModeCoordinate::ZERO));
        assert!(self_conjugate.contains(&MomentumModeCoordinate::new(2, 0, 2)));
        assert!(!MomentumModeCoordinate::new(1, 0, 0).is_self_conjugate(4));
    }

    #[test]
    fn test_self_conjugate_modes_odd_grid() {
        let shape = LatticeShape::new(5).unwrap();
        let count = shape
            .coordinates()
            .filter(|c| c.is_self_conjugate(5))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_wave_numbers_signed() {
        let k = MomentumModeCoordinate::new(1, 3, 2).wave_numbers(4);
        assert_eq!(k, Vector3::new(1.0, -1.0, 2.0));
        assert_eq!(MomentumModeCoordinate::new(1, 3, 2).wave_number_sq(4), 6.0);
    }

    #[test]
    fn test_conjugate_index_matches_coordinate() {
        let shape = LatticeShape::new(4).unwrap();
        let coord = MomentumModeCoordinate::new(1, 2, 3);
        let index = shape.linear_index(coord);
        assert_eq!(
            shape.conjugate_index(index),
            shape.linear_index(MomentumModeCoordinate::new(3, 2, 1))
        );
    }
}
