//! # Epochs and the Epoch Source
//!
//! An [`Epoch`] is a discrete, monotonically increasing period index. It is
//! the sole clock for every position state transition in the ledger.
//!
//! The ledger never advances time. It receives the current epoch as a
//! parameter on every operation, and callers obtain that value from an
//! [`EpochSource`]. Production callers wrap whatever the hosting network
//! exposes; tests and simulations use [`SimulatedEpochClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A discrete epoch index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// The first epoch.
    pub const GENESIS: Epoch = Epoch(0);

    /// Create an epoch from its index.
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// The raw epoch index.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The following epoch. Saturates at `u64::MAX`.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// This epoch advanced by `epochs`. Saturates at `u64::MAX`.
    pub const fn saturating_add(self, epochs: u64) -> Self {
        Self(self.0.saturating_add(epochs))
    }
}

impl From<u64> for Epoch {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supplies the current epoch.
///
/// Implementations must be monotonically non-decreasing: once an epoch has
/// been reported, no later call may report an earlier one.
pub trait EpochSource: Send + Sync {
    /// The epoch in effect right now.
    fn current_epoch(&self) -> Epoch;
}

/// A fixed epoch is a trivially monotonic source.
impl EpochSource for Epoch {
    fn current_epoch(&self) -> Epoch {
        *self
    }
}

impl<T: EpochSource + ?Sized> EpochSource for Arc<T> {
    fn current_epoch(&self) -> Epoch {
        (**self).current_epoch()
    }
}

impl<T: EpochSource + ?Sized> EpochSource for &T {
    fn current_epoch(&self) -> Epoch {
        (**self).current_epoch()
    }
}

/// An in-process epoch clock for tests and scenario replay.
///
/// Advancing is explicit. Nothing in the ledger calls [`advance`](Self::advance);
/// only harnesses that simulate the passage of epochs do.
#[derive(Debug, Default)]
pub struct SimulatedEpochClock {
    epoch: AtomicU64,
}

impl SimulatedEpochClock {
    /// Create a clock starting at `start`.
    pub fn new(start: Epoch) -> Self {
        Self {
            epoch: AtomicU64::new(start.get()),
        }
    }

    /// Move to the next epoch and return it.
    pub fn advance(&self) -> Epoch {
        self.advance_by(1)
    }

    /// Move forward by `epochs` and return the new epoch.
    pub fn advance_by(&self, epochs: u64) -> Epoch {
        let previous = self
            .epoch
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |e| {
                Some(e.saturating_add(epochs))
            })
            .unwrap_or_else(|e| e);
        Epoch(previous.saturating_add(epochs))
    }

    /// Jump to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EpochRegression`] if `target` is earlier
    /// than the current epoch. Setting the current epoch again is allowed.
    pub fn set(&self, target: Epoch) -> Result<(), ValidationError> {
        self.epoch
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |e| {
                (target.get() >= e).then_some(target.get())
            })
            .map(|_| ())
            .map_err(|current| ValidationError::EpochRegression {
                current: Epoch(current),
                requested: target,
            })
    }
}

impl EpochSource for SimulatedEpochClock {
    fn current_epoch(&self) -> Epoch {
        Epoch(self.epoch.load(Ordering::Acquire))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A simulated clock never reports an earlier epoch, whatever sequence
        /// of advances and jumps it is driven through.
        #[test]
        fn simulated_clock_is_monotonic(
            start in 0u64..1_000,
            ops in prop::collection::vec((any::<bool>(), 0u64..50), 0..40),
        ) {
            let clock = SimulatedEpochClock::new(Epoch::new(start));
            let mut last = clock.current_epoch();
            for (jump, n) in ops {
                if jump {
                    let _ = clock.set(Epoch::new(n * 20));
                } else {
                    clock.advance_by(n);
                }
                let now = clock.current_epoch();
                prop_assert!(now >= last);
                last = now;
            }
        }
    }
}
