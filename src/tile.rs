//! Composite tile - the four channel maps folded into one search space

use crate::coords::{quadrant_of, Coord, Shape, CHANNELS};
use crate::error::{FocalError, Result};
use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

/// Value marking a cell as permanently ineligible for selection.
pub const SENTINEL: f64 = f64::NEG_INFINITY;

/// True for values that must never be emitted as a spike.
#[inline]
pub fn is_sentinel(value: f64) -> bool {
    value.is_nan() || value.is_infinite()
}

/// The 2×2 tiled concatenation of all four channel responses.
///
/// Channel `c` occupies quadrant `(c / 2, c % 2)`. Cells with zero response
/// hold [`SENTINEL`].
#[derive(Clone, Debug)]
pub struct CompositeTile {
    cells: Array2<f64>,
    local_shape: Shape,
}

impl CompositeTile {
    /// Build the composite from four equally shaped response maps.
    pub fn build(responses: &[Array2<f64>; CHANNELS]) -> Result<Self> {
        let local_shape = responses[0].dim();
        for (channel, response) in responses.iter().enumerate() {
            if response.dim() != local_shape {
                return Err(FocalError::ShapeMismatch {
                    channel,
                    expected: local_shape,
                    got: response.dim(),
                });
            }
        }

        let (height, width) = local_shape;
        let mut cells = Array2::<f64>::zeros((height * 2, width * 2));
        for (channel, response) in responses.iter().enumerate() {
            let (qr, qc) = quadrant_of(channel);
            let mut quadrant = cells.slice_mut(s![
                qr * height..(qr + 1) * height,
                qc * width..(qc + 1) * width
            ]);
            quadrant.assign(response);
            quadrant.mapv_inplace(|v| if v == 0.0 { SENTINEL } else { v });
        }

        Ok(Self { cells, local_shape })
    }

    /// Shape of the composite, `(2H, 2W)`.
    pub fn shape(&self) -> Shape {
        self.cells.dim()
    }

    /// Shape of a single channel, `(H, W)`.
    pub fn local_shape(&self) -> Shape {
        self.local_shape
    }

    pub fn get(&self, coord: Coord) -> Option<f64> {
        self.cells.get(coord).copied()
    }

    pub fn cells(&self) -> ArrayView2<'_, f64> {
        self.cells.view()
    }

    pub(crate) fn cells_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.cells.view_mut()
    }

    /// View of one channel's quadrant.
    pub fn quadrant(&self, channel: usize) -> ArrayView2<'_, f64> {
        let (height, width) = self.local_shape;
        let (qr, qc) = quadrant_of(channel);
        self.cells.slice(s![
            qr * height..(qr + 1) * height,
            qc * width..(qc + 1) * width
        ])
    }

    /// Position and value of the maximum cell.
    ///
    /// Ties go to the first cell in row-major order. A NaN cell wins as soon
    /// as it is seen. Returns `None` for an empty tile.
    pub fn argmax(&self) -> Option<(Coord, f64)> {
        let mut best: Option<(Coord, f64)> = None;
        for (coord, &value) in self.cells.indexed_iter() {
            if value.is_nan() {
                return Some((coord, value));
            }
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((coord, value)),
            }
        }
        best
    }

    /// Number of cells still eligible for selection.
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|&&v| !is_sentinel(v)).count()
    }
}

/// Count of nonzero activations across all channels.
pub fn nonzero_count(responses: &[Array2<f64>; CHANNELS]) -> usize {
    responses
        .iter()
        .map(|r| r.iter().filter(|&&v| v != 0.0).count())
        .sum()
}
