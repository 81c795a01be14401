//! Pairwise kernel correlations
//!
//! The correlation between two channels' receptive fields is computed
//! elsewhere (from the Difference-of-Gaussians kernels). This module only
//! holds the results and hands out the kernel for a (spiking, target) pair.

use crate::coords::CHANNELS;
use crate::error::{FocalError, Result};
use ndarray::{Array2, ArrayView2};

/// Source of correlation kernels.
///
/// `kernel(from, to)` is the expected response of channel `to` around a spike
/// fired by channel `from`. Kernels are square with an odd side.
pub trait CorrelationSource {
    fn kernel(&self, from: usize, to: usize) -> ArrayView2<'_, f64>;
}

/// Validated 4×4 table of correlation kernels.
#[derive(Clone, Debug)]
pub struct CorrelationTable {
    kernels: Vec<Array2<f64>>,
}

impl CorrelationTable {
    /// Build from `kernels[from][to]`.
    pub fn new(kernels: [[Array2<f64>; CHANNELS]; CHANNELS]) -> Result<Self> {
        let mut flat = Vec::with_capacity(CHANNELS * CHANNELS);
        for (from, row) in kernels.into_iter().enumerate() {
            for (to, kernel) in row.into_iter().enumerate() {
                let shape = kernel.dim();
                if shape.0 != shape.1 || shape.0 % 2 == 0 {
                    return Err(FocalError::InvalidKernel { from, to, shape });
                }
                flat.push(kernel);
            }
        }
        Ok(Self { kernels: flat })
    }

    /// Build a table calling `f(from, to)` for every pair.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Array2<f64>) -> Result<Self> {
        Self::new(std::array::from_fn(|from| {
            std::array::from_fn(|to| f(from, to))
        }))
    }

    /// All-zero kernels of the given side: no cross-talk between cells.
    pub fn zeros(side: usize) -> Result<Self> {
        Self::from_fn(|_, _| Array2::zeros((side, side)))
    }

    /// Kernel whose only nonzero entry is `center` on the diagonal pairs.
    ///
    /// A spike then suppresses only itself.
    pub fn identity(side: usize, center: f64) -> Result<Self> {
        Self::from_fn(|from, to| {
            let mut kernel = Array2::zeros((side, side));
            if from == to && side > 0 {
                kernel[(side / 2, side / 2)] = center;
            }
            kernel
        })
    }
}

impl CorrelationSource for CorrelationTable {
    fn kernel(&self, from: usize, to: usize) -> ArrayView2<'_, f64> {
        self.kernels[from * CHANNELS + to].view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_access() {
        let table =
            CorrelationTable::from_fn(|from, to| Array2::from_elem((3, 3), (from * 10 + to) as f64))
                .unwrap();
        assert_eq!(table.kernel(1, 2)[(0, 0)], 12.0);
        assert_eq!(table.kernel(2, 1)[(0, 0)], 21.0);
        assert_eq!(table.kernel(3, 3).dim(), (3, 3));
    }

    #[test]
    fn test_rejects_even_side() {
        let err = CorrelationTable::zeros(4).unwrap_err();
        assert_eq!(
            err,
            FocalError::InvalidKernel {
                from: 0,
                to: 0,
                shape: (4, 4)
            }
        );
    }

    #[test]
    fn test_rejects_non_square() {
        let err = CorrelationTable::from_fn(|from, to| {
            if from == 2 && to == 1 {
                Array2::zeros((3, 5))
            } else {
                Array2::zeros((3, 3))
            }
        })
        .unwrap_err();
        assert!(matches!(err, FocalError::InvalidKernel { from: 2, to: 1, .. }));
    }

    #[test]
    fn test_identity() {
        let table = CorrelationTable::identity(5, 1.0).unwrap();
        assert_eq!(table.kernel(2, 2)[(2, 2)], 1.0);
        assert_eq!(table.kernel(2, 2).sum(), 1.0);
        assert_eq!(table.kernel(2, 3).sum(), 0.0);
    }
}
