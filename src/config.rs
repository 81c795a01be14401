//! Run configuration

use crate::error::{FocalError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default fraction of nonzero activations turned into spikes.
pub const DEFAULT_SPIKES_PER_UNIT: f64 = 0.3;

/// Configuration for a FoCal run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FocalConfig {
    /// Fraction of the originally nonzero cells to emit, in [0, 1].
    pub spikes_per_unit: f64,

    /// Publish a progress event every this many spikes.
    pub progress_interval: usize,
}

impl FocalConfig {
    /// Create a configuration emitting the given fraction of activations.
    pub fn new(spikes_per_unit: f64) -> Self {
        Self {
            spikes_per_unit,
            progress_interval: 1,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Number of spikes to emit given the count of nonzero activations.
    ///
    /// Truncates toward zero and never exceeds `total_nonzero`.
    pub fn budget(&self, total_nonzero: usize) -> usize {
        let budget = (self.spikes_per_unit * total_nonzero as f64).floor() as usize;
        budget.min(total_nonzero)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.spikes_per_unit) {
            return Err(FocalError::InvalidConfiguration(
                "spikes_per_unit must be in [0, 1]",
            ));
        }
        if self.progress_interval == 0 {
            return Err(FocalError::InvalidConfiguration(
                "progress_interval must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for FocalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SPIKES_PER_UNIT)
    }
}
