//! Overlap correction - removing a spike's contribution from its neighbours
//!
//! When a cell fires, every channel sees a correlated response around the same
//! pixel. The correction applies
//!
//! ```text
//! c_i <- c_i - c_max * <K_i, K_max>
//! ```
//!
//! over the support of the correlation kernel, restricted to the target
//! channel's quadrant so neighbouring channels never bleed into each other.

use crate::coords::Coord;
use crate::tile::{CompositeTile, SENTINEL};
use ndarray::{s, ArrayView2, Zip};

/// Rectangular region of the composite, end-exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub rows: (usize, usize),
    pub cols: (usize, usize),
}

/// Tile window and matching kernel window for a correction centered at `center`.
///
/// Both windows have the same shape. The tile window never leaves the
/// quadrant containing `center`.
pub fn correction_windows(
    center: Coord,
    local_shape: (usize, usize),
    kernel_side: usize,
) -> (Window, Window) {
    let half = kernel_side / 2;
    let (row, col) = center;
    let (height, width) = local_shape;

    let up_lim = (row / height) * height;
    let left_lim = (col / width) * width;
    let down_lim = up_lim + height;
    let right_lim = left_lim + width;

    let min_row = row.saturating_sub(half).max(up_lim);
    let min_col = col.saturating_sub(half).max(left_lim);
    let max_row = (row + half + 1).min(down_lim);
    let max_col = (col + half + 1).min(right_lim);

    let tile = Window {
        rows: (min_row, max_row),
        cols: (min_col, max_col),
    };
    let kernel = Window {
        rows: (half - (row - min_row), half + (max_row - row)),
        cols: (half - (col - min_col), half + (max_col - col)),
    };
    (tile, kernel)
}

/// Subtract `value * kernel` around `center` and sanitize the result.
///
/// `center` is the spike's local offset placed in the target channel's
/// quadrant. When `is_own_channel` is set the center cell is excluded from any
/// further selection. Returns how many cells the sanitization drove to the
/// sentinel.
pub fn apply(
    tile: &mut CompositeTile,
    kernel: ArrayView2<'_, f64>,
    center: Coord,
    value: f64,
    is_own_channel: bool,
) -> usize {
    let (side, cols) = kernel.dim();
    debug_assert_eq!(side, cols, "correlation kernel must be square");
    debug_assert!(side % 2 == 1, "correlation kernel side must be odd");

    let (win, kwin) = correction_windows(center, tile.local_shape(), side);
    let kernel = kernel.slice(s![kwin.rows.0..kwin.rows.1, kwin.cols.0..kwin.cols.1]);

    let mut cells = tile.cells_mut();
    let mut window = cells.slice_mut(s![win.rows.0..win.rows.1, win.cols.0..win.cols.1]);

    let mut scrubbed = 0;
    Zip::from(&mut window).and(&kernel).for_each(|cell, &k| {
        *cell -= value * k;
        if cell.is_nan() || *cell == f64::INFINITY {
            *cell = SENTINEL;
            scrubbed += 1;
        }
    });

    if is_own_channel {
        cells[center] = SENTINEL;
    }

    scrubbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CHANNELS;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn uniform_tile(height: usize, width: usize, value: f64) -> CompositeTile {
        let map = Array2::from_elem((height, width), value);
        let responses: [Array2<f64>; CHANNELS] =
            [map.clone(), map.clone(), map.clone(), map];
        CompositeTile::build(&responses).unwrap()
    }

    #[test]
    fn test_windows_interior() {
        let (win, kwin) = correction_windows((2, 2), (5, 5), 3);
        assert_eq!(win.rows, (1, 4));
        assert_eq!(win.cols, (1, 4));
        assert_eq!(kwin.rows, (0, 3));
        assert_eq!(kwin.cols, (0, 3));
    }

    #[test]
    fn test_windows_clipped_at_quadrant_edges() {
        // Bottom-right corner of channel 0 in a 4x4 local frame.
        let (win, kwin) = correction_windows((3, 3), (4, 4), 5);
        assert_eq!(win.rows, (1, 4));
        assert_eq!(win.cols, (1, 4));
        assert_eq!(kwin.rows, (0, 3));
        assert_eq!(kwin.cols, (0, 3));

        // Top-left corner of channel 3.
        let (win, kwin) = correction_windows((4, 4), (4, 4), 5);
        assert_eq!(win.rows, (4, 7));
        assert_eq!(win.cols, (4, 7));
        assert_eq!(kwin.rows, (2, 5));
        assert_eq!(kwin.cols, (2, 5));
    }

    #[test]
    fn test_subtracts_weighted_kernel() {
        let mut tile = uniform_tile(4, 4, 10.0);
        let kernel = array![[0.0, 0.1, 0.0], [0.1, 0.5, 0.1], [0.0, 0.1, 0.0]];

        let scrubbed = apply(&mut tile, kernel.view(), (1, 1), 4.0, false);

        assert_eq!(scrubbed, 0);
        assert_relative_eq!(tile.get((1, 1)).unwrap(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(tile.get((0, 1)).unwrap(), 9.6, epsilon = 1e-12);
        assert_relative_eq!(tile.get((1, 2)).unwrap(), 9.6, epsilon = 1e-12);
        assert_relative_eq!(tile.get((0, 0)).unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(tile.get((3, 3)).unwrap(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_own_channel_center_suppressed() {
        let mut tile = uniform_tile(4, 4, 10.0);
        let kernel = array![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];

        apply(&mut tile, kernel.view(), (2, 6), 10.0, true);

        assert_eq!(tile.get((2, 6)), Some(SENTINEL));
        assert_eq!(tile.active_count(), 63);
    }

    #[test]
    fn test_other_quadrants_untouched() {
        let mut tile = uniform_tile(3, 3, 1.0);
        let kernel = Array2::from_elem((5, 5), 1.0);
        let before = tile.clone();

        // Corner of channel 0 that touches channels 1, 2 and 3.
        apply(&mut tile, kernel.view(), (2, 2), 0.5, true);

        for channel in 1..CHANNELS {
            assert_eq!(tile.quadrant(channel), before.quadrant(channel));
        }
        assert_relative_eq!(tile.get((0, 0)).unwrap(), 0.5, epsilon = 1e-12);
        assert_eq!(tile.get((2, 2)), Some(SENTINEL));
    }

    #[test]
    fn test_non_finite_results_scrubbed() {
        let mut tile = uniform_tile(3, 3, 1.0);
        let kernel = array![
            [f64::NAN, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, f64::NEG_INFINITY]
        ];

        let scrubbed = apply(&mut tile, kernel.view(), (1, 1), 1.0, false);

        assert_eq!(scrubbed, 2);
        assert_eq!(tile.get((0, 0)), Some(SENTINEL));
        assert_eq!(tile.get((2, 2)), Some(SENTINEL));
        assert_eq!(tile.get((1, 1)), Some(1.0));
    }

    #[test]
    fn test_sentinel_cells_stay_sentinel() {
        let map = array![[0.0, 2.0], [2.0, 2.0]];
        let responses = [map.clone(), map.clone(), map.clone(), map];
        let mut tile = CompositeTile::build(&responses).unwrap();
        let kernel = Array2::from_elem((3, 3), 0.25);

        apply(&mut tile, kernel.view(), (1, 1), 2.0, false);

        assert_eq!(tile.get((0, 0)), Some(SENTINEL));
        assert_relative_eq!(tile.get((0, 1)).unwrap(), 1.5, epsilon = 1e-12);
    }
}
