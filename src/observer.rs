//! Observers for FoCal runs
//!
//! The selector never writes to stdout or stderr. Progress, emitted spikes and
//! fatal conditions are published as events to whoever subscribed.

use crate::spike::Spike;

/// Event emitted while a run progresses.
#[derive(Clone, Debug, PartialEq)]
pub enum FocalEvent {
    /// Published before selecting spike `count`.
    Progress {
        count: usize,
        budget: usize,
        /// `count` relative to the nonzero activations, in percent.
        percent: f32,
    },
    /// A spike was appended to the output.
    SpikeEmitted(Spike),
    /// The run stopped before its budget.
    FatalCondition { message: String },
}

/// Observer that receives run events
pub trait FocalObserver: Send + Sync {
    /// Called when a run event occurs
    fn on_event(&self, event: FocalEvent);
}

/// Function-based observer for simple cases
pub struct FnObserver<F: Fn(FocalEvent) + Send + Sync>(pub F);

impl<F: Fn(FocalEvent) + Send + Sync> FocalObserver for FnObserver<F> {
    fn on_event(&self, event: FocalEvent) {
        (self.0)(event);
    }
}

/// Channel-based observer - sends events to a channel
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<FocalEvent>,
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<FocalEvent>) -> Self {
        Self { sender }
    }
}

impl FocalObserver for ChannelObserver {
    fn on_event(&self, event: FocalEvent) {
        let _ = self.sender.send(event);
    }
}

/// Progress as the reference tool reports it: `count` over `total_nonzero - 1`.
pub fn progress_percent(count: usize, total_nonzero: usize) -> f32 {
    let denominator = total_nonzero.saturating_sub(1).max(1);
    (count as f32 * 100.0) / denominator as f32
}
