//! # Unlock Selector
//!
//! The FIFO unlock policy, expressed as a pure function from a position
//! slice to an [`UnlockPlan`]. The ledger applies the plan; keeping the scan
//! separate lets the ordering rules be tested as plain data.
//!
//! ## Policy
//!
//! Positions are walked oldest-first. For each one:
//!
//! 1. Already carrying an unlock request: skipped. Requests never stack.
//! 2. Still `LOCKING`: skipped. The slice of the request it would have
//!    covered is not deferred and not retried against later positions.
//! 3. Amount fits in the remaining request: marked whole.
//! 4. Amount exceeds the remaining request: split. The remaining request
//!    becomes an unlocking slice and the walk stops.

use stk_core::Epoch;

use crate::position::{Position, PositionState};

/// One action of an unlock plan, addressed by index into the scanned slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockMark {
    /// Mark the whole position at `index` for unlocking.
    Whole {
        /// Index of the position in the scanned slice.
        index: usize,
    },
    /// Split `amount` off the position at `index` into a new unlocking
    /// position placed immediately before the remainder.
    Split {
        /// Index of the position in the scanned slice.
        index: usize,
        /// Amount carried by the unlocking slice.
        amount: u64,
    },
}

/// Outcome of scanning a ledger for an unlock request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockPlan {
    /// Marks in ascending index order. A `Split`, if present, is last.
    pub marks: Vec<UnlockMark>,
    /// Total amount the marks cover.
    pub unlocked: u64,
    /// Amount held by locking positions the scan passed over.
    pub skipped_locking: u64,
}

impl UnlockPlan {
    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Plan an unlock of up to `requested` tokens over `positions`.
pub fn plan_unlock(
    positions: &[Position],
    requested: u64,
    current_epoch: Epoch,
    unlocking_duration: u64,
) -> UnlockPlan {
    let mut plan = UnlockPlan::default();
    let mut remaining = requested;

    for (index, position) in positions.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        if position.is_unlock_requested() {
            continue;
        }
        if position.state(current_epoch, unlocking_duration) == PositionState::Locking {
            plan.skipped_locking = plan.skipped_locking.saturating_add(position.amount);
            continue;
        }
        if position.amount <= remaining {
            plan.marks.push(UnlockMark::Whole { index });
            remaining -= position.amount;
        } else {
            plan.marks.push(UnlockMark::Split {
                index,
                amount: remaining,
            });
            remaining = 0;
        }
    }

    plan.unlocked = requested - remaining;
    plan
}
