//! Coordinate mapping between channel maps and the folded composite
//!
//! Channels are laid out in the composite as:
//!
//! ```text
//! +---+---+
//! | 0 | 1 |
//! +---+---+
//! | 2 | 3 |
//! +---+---+
//! ```
//!
//! Coordinates are `(row, col)`. Flat indices are row-major.

/// Number of ganglion-cell channels.
pub const CHANNELS: usize = 4;

/// A `(row, col)` coordinate.
pub type Coord = (usize, usize);

/// A `(height, width)` shape.
pub type Shape = (usize, usize);

/// Quadrant `(row, col)` of a channel in the composite.
#[inline]
pub fn quadrant_of(channel: usize) -> Coord {
    (channel / 2, channel % 2)
}

/// Place a local coordinate into a channel's quadrant.
#[inline]
pub fn local_to_global_coord(local: Coord, channel: usize, local_shape: Shape) -> Coord {
    debug_assert!(channel < CHANNELS, "channel {} out of range", channel);
    debug_assert!(local.0 < local_shape.0 && local.1 < local_shape.1);
    let (qr, qc) = quadrant_of(channel);
    (local.0 + qr * local_shape.0, local.1 + qc * local_shape.1)
}

/// Place a local coordinate into a channel's quadrant and flatten it.
#[inline]
pub fn local_to_global_index(
    local: Coord,
    channel: usize,
    local_shape: Shape,
    global_shape: Shape,
) -> usize {
    let (row, col) = local_to_global_coord(local, channel, local_shape);
    row * global_shape.1 + col
}

/// Reduce a global coordinate to the local frame of whichever quadrant holds it.
#[inline]
pub fn global_to_local_coord(global: Coord, local_shape: Shape) -> Coord {
    let row_count = global.0 / local_shape.0;
    let col_count = global.1 / local_shape.1;
    (
        global.0 - local_shape.0 * row_count,
        global.1 - local_shape.1 * col_count,
    )
}

/// Channel owning a global coordinate, or `None` outside the composite.
#[inline]
pub fn channel_from_global_coord(global: Coord, local_shape: Shape) -> Option<usize> {
    if local_shape.0 == 0 || local_shape.1 == 0 {
        return None;
    }
    let row_type = global.0 / local_shape.0;
    let col_type = global.1 / local_shape.1;
    if row_type > 1 || col_type > 1 {
        return None;
    }
    Some(row_type * 2 + col_type)
}

/// Unflatten a row-major index.
#[inline]
pub fn index_to_coord(index: usize, width: usize) -> Coord {
    (index / width, index % width)
}

/// Flatten a coordinate into a row-major index.
#[inline]
pub fn coord_to_index(coord: Coord, width: usize) -> usize {
    coord.0 * width + coord.1
}
