//! # Position Ledger
//!
//! One account's positions in insertion order, oldest first. Positions are
//! never reordered: deposits append, a partial unlock splits a position in
//! place, and withdrawals shrink or drop positions without moving the rest.
//!
//! Every mutation validates first and mutates second, so a call that
//! returns an error leaves the ledger untouched. Each successful mutation
//! appends a [`LedgerEvent`] to the ledger's audit log.

use serde::{Deserialize, Serialize};

use stk_core::Epoch;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::position::{Position, PositionHandle, PositionState};
use crate::selector::{plan_unlock, UnlockMark};
use crate::summary::{summarize, BalanceSnapshot};

/// Record of one ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new position was opened.
    Deposited {
        /// Handle of the new position.
        handle: PositionHandle,
        /// Tokens deposited.
        amount: u64,
        /// Epoch of the deposit.
        epoch: Epoch,
    },
    /// A position was marked for unlocking.
    UnlockRequested {
        /// Handle of the marked position.
        handle: PositionHandle,
        /// Tokens marked.
        amount: u64,
        /// Epoch of the request.
        epoch: Epoch,
    },
    /// A position was split so that part of it could be unlocked.
    Split {
        /// Handle of the position that keeps the remainder.
        from: PositionHandle,
        /// Handle of the new unlocking slice.
        into: PositionHandle,
        /// Tokens moved into the unlocking slice.
        unlocked: u64,
        /// Tokens left in the original position.
        remaining: u64,
        /// Epoch of the split.
        epoch: Epoch,
    },
    /// Withdrawable tokens left the ledger.
    Withdrawn {
        /// Tokens withdrawn.
        amount: u64,
        /// Epoch of the withdrawal.
        epoch: Epoch,
    },
}

/// The ordered positions of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLedger {
    config: LedgerConfig,
    positions: Vec<Position>,
    next_handle: u64,
    #[serde(default)]
    events: Vec<LedgerEvent>,
}

impl Default for PositionLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl PositionLedger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            positions: Vec::new(),
            next_handle: 1,
            events: Vec::new(),
        }
    }

    /// The configuration this ledger classifies positions with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Live positions, oldest first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of live positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the ledger holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The audit log, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Sum of all live position amounts.
    pub fn total(&self) -> u64 {
        self.positions
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount))
    }

    /// Look up a live position by handle.
    pub fn position(&self, handle: PositionHandle) -> Option<&Position> {
        self.positions.iter().find(|p| p.handle == handle)
    }

    /// State of the position `handle` at `current_epoch`.
    pub fn position_state(
        &self,
        handle: PositionHandle,
        current_epoch: Epoch,
    ) -> Result<PositionState, LedgerError> {
        self.position(handle)
            .map(|p| p.state(current_epoch, self.config.unlocking_duration))
            .ok_or(LedgerError::PositionNotFound(handle))
    }

    /// Four-category balance at `current_epoch`.
    pub fn summarize(&self, current_epoch: Epoch) -> BalanceSnapshot {
        summarize(
            &self.positions,
            current_epoch,
            self.config.unlocking_duration,
        )
    }

    /// Amount available to withdraw at `current_epoch`.
    pub fn withdrawable(&self, current_epoch: Epoch) -> u64 {
        self.summarize(current_epoch).withdrawable
    }

    /// Open a new position of `amount` tokens at `current_epoch`.
    ///
    /// Deposits never merge, even within one epoch; each becomes its own
    /// FIFO entry.
    pub fn deposit(
        &mut self,
        amount: u64,
        current_epoch: Epoch,
    ) -> Result<PositionHandle, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "deposit",
            });
        }
        if let Some(max) = self.config.max_positions {
            if self.positions.len() >= max {
                return Err(LedgerError::TooManyPositions { max });
            }
        }
        let total = self.total();
        if total.checked_add(amount).is_none() {
            return Err(LedgerError::Overflow { amount, total });
        }

        let handle = self.allocate_handle();
        self.positions
            .push(Position::new(handle, amount, current_epoch));
        self.events.push(LedgerEvent::Deposited {
            handle,
            amount,
            epoch: current_epoch,
        });

        tracing::debug!(%handle, amount, epoch = %current_epoch, "position opened");
        Ok(handle)
    }

    /// Mark up to `amount` tokens for unlocking, oldest eligible first.
    ///
    /// Returns the amount actually marked, which is less than `amount` when
    /// too little is eligible. Locking positions are passed over and the
    /// amount they would have covered is simply not satisfied by this call.
    pub fn request_unlock(
        &mut self,
        amount: u64,
        current_epoch: Epoch,
    ) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "request_unlock",
            });
        }

        let plan = plan_unlock(
            &self.positions,
            amount,
            current_epoch,
            self.config.unlocking_duration,
        );
        if plan.skipped_locking > 0 {
            tracing::debug!(
                skipped = plan.skipped_locking,
                epoch = %current_epoch,
                "unlock request passed over locking positions"
            );
        }

        for mark in &plan.marks {
            match *mark {
                UnlockMark::Whole { index } => {
                    let position = &mut self.positions[index];
                    position.unlock_requested_epoch = Some(current_epoch);
                    self.events.push(LedgerEvent::UnlockRequested {
                        handle: position.handle,
                        amount: position.amount,
                        epoch: current_epoch,
                    });
                }
                UnlockMark::Split { index, amount } => {
                    self.split_for_unlock(index, amount, current_epoch);
                }
            }
        }

        tracing::debug!(
            requested = amount,
            unlocked = plan.unlocked,
            epoch = %current_epoch,
            "unlock requested"
        );
        Ok(plan.unlocked)
    }

    /// Remove `amount` withdrawable tokens, oldest first.
    ///
    /// All or nothing: if less than `amount` is withdrawable, nothing is
    /// removed. A zero amount is a no-op.
    pub fn withdraw(&mut self, amount: u64, current_epoch: Epoch) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.withdrawable(current_epoch);
        if amount > available {
            return Err(LedgerError::InsufficientWithdrawable {
                requested: amount,
                available,
            });
        }

        let duration = self.config.unlocking_duration;
        let mut remaining = amount;
        for position in &mut self.positions {
            if remaining == 0 {
                break;
            }
            if position.state(current_epoch, duration) != PositionState::Withdrawable {
                continue;
            }
            let taken = position.amount.min(remaining);
            position.amount -= taken;
            remaining -= taken;
        }
        self.positions.retain(|p| p.amount > 0);
        self.events.push(LedgerEvent::Withdrawn {
            amount,
            epoch: current_epoch,
        });

        tracing::debug!(amount, epoch = %current_epoch, "withdrawn");
        Ok(())
    }

    /// Split `amount` off the position at `index` into a new unlocking
    /// position inserted directly before it. The original keeps its handle
    /// and the remainder.
    fn split_for_unlock(&mut self, index: usize, amount: u64, current_epoch: Epoch) {
        let handle = self.allocate_handle();
        let original = &mut self.positions[index];
        original.amount -= amount;

        let from = original.handle;
        let remaining = original.amount;
        let mut slice = Position::new(handle, amount, original.created_epoch);
        slice.unlock_requested_epoch = Some(current_epoch);
        self.positions.insert(index, slice);

        self.events.push(LedgerEvent::Split {
            from,
            into: handle,
            unlocked: amount,
            remaining,
            epoch: current_epoch,
        });
        self.events.push(LedgerEvent::UnlockRequested {
            handle,
            amount,
            epoch: current_epoch,
        });
    }

    fn allocate_handle(&mut self) -> PositionHandle {
        let handle = PositionHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }
}
