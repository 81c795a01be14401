//! FoCal - Filter Overlap Correction ALgorithm
//!
//! Turns four ganglion-cell response maps into a rank-ordered spike train.
//!
//! # Core Types
//!
//! - **CompositeTile**: The four channel maps folded 2×2 into one search space
//! - **SpikeSelector**: Greedy loop emitting the strongest remaining cell
//! - **CorrelationTable**: Pairwise overlap between channel receptive fields
//! - **Spike**: One emitted event (local index, value, channel)
//!
//! # Channels
//!
//! Four channels model the ON/OFF, sustained/transient layers of the foveal
//! pit. They are laid out in the composite as:
//!
//! ```text
//! +---+---+
//! | 0 | 1 |
//! +---+---+
//! | 2 | 3 |
//! +---+---+
//! ```
//!
//! # The Loop
//!
//! 1. Count nonzero activations; the budget is a fraction of that count
//! 2. Pick the global maximum across all quadrants (first in row-major order on ties)
//! 3. Record it as a spike
//! 4. In every channel, subtract `value × correlation` around the same pixel,
//!    clipped to that channel's quadrant
//! 5. Mark the source cell as spent and repeat
//!
//! Spent and idle cells hold negative infinity and are never picked again.
//!
//! # Example
//!
//! ```rust
//! use focal::{CorrelationTable, FnObserver, FocalConfig, FocalEvent, SpikeSelector};
//! use ndarray::Array2;
//! use std::sync::Arc;
//!
//! let mut maps: [Array2<f64>; 4] = std::array::from_fn(|_| Array2::zeros((4, 4)));
//! maps[0][(1, 1)] = 10.0;
//! maps[1][(2, 2)] = 5.0;
//!
//! // No cross-talk between cells.
//! let correlations = CorrelationTable::zeros(3).unwrap();
//!
//! let mut selector = SpikeSelector::new(&maps, &correlations, FocalConfig::new(1.0)).unwrap();
//! selector.subscribe(Arc::new(FnObserver(|event| {
//!     if let FocalEvent::FatalCondition { message } = event {
//!         eprintln!("FoCal stopped: {}", message);
//!     }
//! })));
//!
//! let run = selector.run();
//! assert!(run.is_complete());
//! assert_eq!(run.spikes[0].as_tuple(), (5, 10.0, 0));
//! assert_eq!(run.spikes[1].as_tuple(), (10, 5.0, 1));
//! ```
//!
//! Algorithm by Basabdatta Sen Bhattacharya, DOI 10.1109/TNN.2010.2048339.

mod config;
pub mod coords;
pub mod correction;
mod correlation;
mod error;
mod observer;
mod selector;
mod spike;
mod tile;

pub use config::{FocalConfig, DEFAULT_SPIKES_PER_UNIT};
pub use coords::CHANNELS;
pub use correlation::{CorrelationSource, CorrelationTable};
pub use error::{FocalError, Result};
pub use observer::{ChannelObserver, FnObserver, FocalEvent, FocalObserver};
pub use selector::{focal, SelectorState, SpikeSelector};
pub use spike::{FocalRun, RunStatus, Spike};
pub use tile::{is_sentinel, CompositeTile, SENTINEL};
