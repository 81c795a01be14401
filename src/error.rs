//! Error types for FoCal runs

/// Result type for FoCal operations.
pub type Result<T> = std::result::Result<T, FocalError>;

/// Errors that can occur while preparing or running FoCal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FocalError {
    /// Response maps do not all share the same shape.
    #[error("response map {channel} has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        channel: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// The maximum of the composite tile was infinite or NaN before the budget was met.
    #[error("sentinel maximum {value} reached after {emitted} of {budget} spikes")]
    SentinelExhaustion {
        emitted: usize,
        budget: usize,
        value: f64,
    },

    /// Configuration rejected by `FocalConfig::validate`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A correlation kernel is not square with an odd side.
    #[error("correlation kernel ({from}, {to}) has shape {shape:?}, expected square with odd side")]
    InvalidKernel {
        from: usize,
        to: usize,
        shape: (usize, usize),
    },

    /// Global coordinate outside the composite tile.
    #[error("global coordinate {coord:?} outside composite of shape {shape:?}")]
    CoordinateOutOfRange {
        coord: (usize, usize),
        shape: (usize, usize),
    },
}
