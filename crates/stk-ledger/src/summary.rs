//! # Balance Summarizer
//!
//! Derives the four-category balance view of a position sequence at a given
//! epoch. Pure: it reads positions and never mutates them, so it is safe to
//! call as often as needed and yields identical snapshots for identical
//! inputs.

use serde::{Deserialize, Serialize};

use stk_core::Epoch;

use crate::position::{Position, PositionState};

/// Categorized balance of one account at one epoch.
///
/// The four categories always add up to the sum of live position amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Deposited this epoch, not yet settled.
    pub locking: u64,
    /// Settled with no unlock requested.
    pub locked: u64,
    /// Unlock requested, settlement delay not yet elapsed.
    pub unlocking: u64,
    /// Unlock settled and available to withdraw.
    pub withdrawable: u64,
}

impl BalanceSnapshot {
    /// Sum over all four categories.
    pub fn total(&self) -> u64 {
        self.locking
            .saturating_add(self.locked)
            .saturating_add(self.unlocking)
            .saturating_add(self.withdrawable)
    }

    /// The amount recorded under `state`.
    pub fn get(&self, state: PositionState) -> u64 {
        match state {
            PositionState::Locking => self.locking,
            PositionState::Locked => self.locked,
            PositionState::Unlocking => self.unlocking,
            PositionState::Withdrawable => self.withdrawable,
        }
    }

    fn slot_mut(&mut self, state: PositionState) -> &mut u64 {
        match state {
            PositionState::Locking => &mut self.locking,
            PositionState::Locked => &mut self.locked,
            PositionState::Unlocking => &mut self.unlocking,
            PositionState::Withdrawable => &mut self.withdrawable,
        }
    }
}

impl std::fmt::Display for BalanceSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "locking={} locked={} unlocking={} withdrawable={}",
            self.locking, self.locked, self.unlocking, self.withdrawable
        )
    }
}

/// Classify every position at `current_epoch` and accumulate its amount into
/// the matching category.
pub fn summarize<'a>(
    positions: impl IntoIterator<Item = &'a Position>,
    current_epoch: Epoch,
    unlocking_duration: u64,
) -> BalanceSnapshot {
    positions
        .into_iter()
        .fold(BalanceSnapshot::default(), |mut snapshot, position| {
            let slot = snapshot.slot_mut(position.state(current_epoch, unlocking_duration));
            *slot = slot.saturating_add(position.amount);
            snapshot
        })
}
