//! Spikes - the ordered output of a FoCal run

use crate::coords::{index_to_coord, Coord};
use crate::error::{FocalError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single emitted firing event.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spike {
    /// Row-major index in the originating channel's map.
    pub local_index: usize,
    /// Response value at the time of selection.
    pub value: f64,
    /// Originating channel, 0..4.
    pub channel: usize,
}

impl Spike {
    pub fn new(local_index: usize, value: f64, channel: usize) -> Self {
        Self {
            local_index,
            value,
            channel,
        }
    }

    /// `(row, col)` in the channel map of the given width.
    #[inline]
    pub fn coord(&self, width: usize) -> Coord {
        index_to_coord(self.local_index, width)
    }

    /// `(local_index, value, channel)` triple.
    pub fn as_tuple(&self) -> (usize, f64, usize) {
        (self.local_index, self.value, self.channel)
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunStatus {
    /// Every budgeted spike was emitted.
    Completed,
    /// The tile maximum was a sentinel before the budget was met.
    Exhausted { value: f64 },
    /// The caller stopped the run between steps.
    Interrupted,
}

/// Result of a FoCal run: the spikes in emission order plus bookkeeping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FocalRun {
    pub spikes: Vec<Spike>,
    /// Spikes requested.
    pub budget: usize,
    /// Nonzero activations across all channels before the run.
    pub total_nonzero: usize,
    pub status: RunStatus,
}

impl FocalRun {
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn len(&self) -> usize {
        self.spikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spikes.is_empty()
    }

    /// Spikes emitted by one channel, in emission order.
    pub fn channel_spikes(&self, channel: usize) -> impl Iterator<Item = &Spike> {
        self.spikes.iter().filter(move |s| s.channel == channel)
    }

    /// The spikes, or `SentinelExhaustion` if a sentinel maximum stopped the run.
    ///
    /// Discards the partial prefix on failure; read `spikes` directly to keep it.
    pub fn into_result(self) -> Result<Vec<Spike>> {
        match self.status {
            RunStatus::Completed | RunStatus::Interrupted => Ok(self.spikes),
            RunStatus::Exhausted { value } => Err(FocalError::SentinelExhaustion {
                emitted: self.spikes.len(),
                budget: self.budget,
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(status: RunStatus) -> FocalRun {
        FocalRun {
            spikes: vec![Spike::new(5, 10.0, 0), Spike::new(10, 5.0, 1), Spike::new(3, 1.0, 0)],
            budget: 4,
            total_nonzero: 4,
            status,
        }
    }

    #[test]
    fn test_spike_coord() {
        let spike = Spike::new(10, 5.0, 1);
        assert_eq!(spike.coord(4), (2, 2));
        assert_eq!(spike.as_tuple(), (10, 5.0, 1));
    }

    #[test]
    fn test_channel_filter() {
        let run = run(RunStatus::Completed);
        let indices: Vec<usize> = run.channel_spikes(0).map(|s| s.local_index).collect();
        assert_eq!(indices, vec![5, 3]);
        assert_eq!(run.channel_spikes(3).count(), 0);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(run(RunStatus::Completed).into_result().unwrap().len(), 3);

        let err = run(RunStatus::Exhausted {
            value: f64::NEG_INFINITY,
        })
        .into_result()
        .unwrap_err();
        assert_eq!(
            err,
            FocalError::SentinelExhaustion {
                emitted: 3,
                budget: 4,
                value: f64::NEG_INFINITY
            }
        );
    }
}
