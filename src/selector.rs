//! Spike selector - the greedy FoCal loop
//!
//! Each step picks the strongest remaining cell across all four channels,
//! records it as a spike and corrects every channel around the same pixel
//! before the next pick. Corrections from one spike must be complete before
//! the next selection, so the loop is strictly sequential.

use crate::config::FocalConfig;
use crate::coords::{
    channel_from_global_coord, coord_to_index, global_to_local_coord, local_to_global_coord,
    CHANNELS,
};
use crate::correction;
use crate::correlation::CorrelationSource;
use crate::error::{FocalError, Result};
use crate::observer::{progress_percent, FocalEvent, FocalObserver};
use crate::spike::{FocalRun, RunStatus, Spike};
use crate::tile::{is_sentinel, nonzero_count, CompositeTile};
use ndarray::Array2;
use std::sync::Arc;

/// Lifecycle of a selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorState {
    /// Tile built, nothing emitted yet.
    Ready,
    /// At least one step taken, budget not yet reached.
    Selecting,
    /// Budget reached.
    Done,
    /// Stopped early on a sentinel maximum.
    Terminated,
}

/// Greedy spike selection over a composite tile.
///
/// Owns the tile for its whole lifetime. Drive it with [`step`](Self::step),
/// as an iterator, or to completion with [`run`](Self::run).
pub struct SpikeSelector<'a, C: CorrelationSource + ?Sized> {
    tile: CompositeTile,
    correlations: &'a C,
    config: FocalConfig,
    total_nonzero: usize,
    budget: usize,
    spikes: Vec<Spike>,
    state: SelectorState,
    exhausted_at: Option<f64>,
    observers: Vec<Arc<dyn FocalObserver>>,
}

impl<'a, C: CorrelationSource + ?Sized> SpikeSelector<'a, C> {
    /// Validate inputs, compute the budget and build the composite tile.
    pub fn new(
        responses: &[Array2<f64>; CHANNELS],
        correlations: &'a C,
        config: FocalConfig,
    ) -> Result<Self> {
        config.validate()?;
        for from in 0..CHANNELS {
            for to in 0..CHANNELS {
                let shape = correlations.kernel(from, to).dim();
                if shape.0 != shape.1 || shape.0 % 2 == 0 {
                    return Err(FocalError::InvalidKernel { from, to, shape });
                }
            }
        }

        let total_nonzero = nonzero_count(responses);
        let budget = config.budget(total_nonzero);
        let tile = CompositeTile::build(responses)?;

        Ok(Self {
            tile,
            correlations,
            config,
            total_nonzero,
            budget,
            spikes: Vec::with_capacity(budget),
            state: SelectorState::Ready,
            exhausted_at: None,
            observers: Vec::new(),
        })
    }

    /// Subscribe to run events.
    pub fn subscribe(&mut self, observer: Arc<dyn FocalObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn total_nonzero(&self) -> usize {
        self.total_nonzero
    }

    /// Spikes emitted so far, in order.
    pub fn spikes(&self) -> &[Spike] {
        &self.spikes
    }

    pub fn tile(&self) -> &CompositeTile {
        &self.tile
    }

    /// Emit the next spike, or `None` once the budget is met or a sentinel
    /// maximum stopped the run.
    pub fn step(&mut self) -> Option<Spike> {
        match self.state {
            SelectorState::Done | SelectorState::Terminated => return None,
            SelectorState::Ready => {
                log::debug!(
                    "[FOCAL] start: {} nonzero cells, budget {} ({} per unit)",
                    self.total_nonzero,
                    self.budget,
                    self.config.spikes_per_unit
                );
                self.state = SelectorState::Selecting;
            }
            SelectorState::Selecting => {}
        }

        let count = self.spikes.len();
        if count >= self.budget {
            self.finish_budget();
            return None;
        }

        if count % self.config.progress_interval == 0 {
            self.publish(FocalEvent::Progress {
                count,
                budget: self.budget,
                percent: progress_percent(count, self.total_nonzero),
            });
        }

        let (coord, value) = match self.tile.argmax() {
            Some(max) => max,
            None => {
                self.terminate(f64::NEG_INFINITY, "composite tile is empty".to_string());
                return None;
            }
        };
        if is_sentinel(value) {
            let message = format!("wrong max value {} after {} spikes", value, count);
            self.terminate(value, message);
            return None;
        }

        let local_shape = self.tile.local_shape();
        let channel = match channel_from_global_coord(coord, local_shape) {
            Some(channel) => channel,
            None => {
                let err = FocalError::CoordinateOutOfRange {
                    coord,
                    shape: self.tile.shape(),
                };
                self.terminate(value, err.to_string());
                return None;
            }
        };
        let local = global_to_local_coord(coord, local_shape);
        let spike = Spike::new(coord_to_index(local, local_shape.1), value, channel);
        self.spikes.push(spike);
        log::trace!(
            "[FOCAL] spike {}: channel {} index {} value {}",
            count,
            channel,
            spike.local_index,
            value
        );

        for target in 0..CHANNELS {
            let center = local_to_global_coord(local, target, local_shape);
            let scrubbed = correction::apply(
                &mut self.tile,
                self.correlations.kernel(channel, target),
                center,
                value,
                target == channel,
            );
            if scrubbed > 0 {
                log::trace!("[FOCAL] channel {}: {} cells scrubbed", target, scrubbed);
            }
        }

        self.publish(FocalEvent::SpikeEmitted(spike));
        if self.spikes.len() == self.budget {
            self.finish_budget();
        }
        Some(spike)
    }

    /// Drive the selector until it stops.
    pub fn run(mut self) -> FocalRun {
        while self.step().is_some() {}
        self.finish()
    }

    /// Stop here and return what has been emitted.
    ///
    /// A run stopped by the caller before its budget reports
    /// [`RunStatus::Interrupted`].
    pub fn finish(self) -> FocalRun {
        let status = match (self.state, self.exhausted_at) {
            (SelectorState::Terminated, Some(value)) => RunStatus::Exhausted { value },
            (SelectorState::Done, _) => RunStatus::Completed,
            _ if self.spikes.len() >= self.budget => RunStatus::Completed,
            _ => RunStatus::Interrupted,
        };
        FocalRun {
            spikes: self.spikes,
            budget: self.budget,
            total_nonzero: self.total_nonzero,
            status,
        }
    }

    fn finish_budget(&mut self) {
        self.state = SelectorState::Done;
        log::debug!("[FOCAL] done: {} spikes emitted", self.spikes.len());
    }

    fn terminate(&mut self, value: f64, message: String) {
        self.state = SelectorState::Terminated;
        self.exhausted_at = Some(value);
        log::warn!(
            "[FOCAL] stopped after {} of {} spikes: {}",
            self.spikes.len(),
            self.budget,
            message
        );
        self.publish(FocalEvent::FatalCondition { message });
    }

    fn publish(&self, event: FocalEvent) {
        for observer in &self.observers {
            observer.on_event(event.clone());
        }
    }
}

impl<C: CorrelationSource + ?Sized> Iterator for SpikeSelector<'_, C> {
    type Item = Spike;

    fn next(&mut self) -> Option<Spike> {
        self.step()
    }
}

/// Run FoCal once over four response maps.
///
/// Returns the emitted spikes in order. An early stop is reported through
/// [`FocalRun::status`], never by dropping the partial result.
pub fn focal<C: CorrelationSource + ?Sized>(
    responses: &[Array2<f64>; CHANNELS],
    correlations: &C,
    spikes_per_unit: f64,
) -> Result<FocalRun> {
    Ok(SpikeSelector::new(responses, correlations, FocalConfig::new(spikes_per_unit))?.run())
}
