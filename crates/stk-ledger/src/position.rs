//! # Positions and State Classification
//!
//! A [`Position`] is one deposit's worth of tokens. Its lifecycle state is
//! never stored; [`Position::state`] derives it from the creation epoch, the
//! optional unlock-request epoch, and the epoch supplied by the caller.
//!
//! ## Classification
//!
//! With creation epoch `C`, unlock-request epoch `R`, settlement delay `d`
//! and current epoch `E`:
//!
//! | Unlock requested | Condition      | State          |
//! |------------------|----------------|----------------|
//! | no               | `E <= C`       | `LOCKING`      |
//! | no               | `E > C`        | `LOCKED`       |
//! | yes              | `E < R + d`    | `UNLOCKING`    |
//! | yes              | `E >= R + d`   | `WITHDRAWABLE` |

use serde::{Deserialize, Serialize};

use stk_core::Epoch;

/// Identifier of a position within one account's ledger.
///
/// Handles are allocated from a per-ledger counter and never reused, so a
/// handle stays valid while other positions are split or withdrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionHandle(u64);

impl PositionHandle {
    /// Wrap a raw handle value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PositionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a position at a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    /// Deposited this epoch; not yet settled and not eligible for unlock.
    Locking,
    /// Settled with no unlock requested.
    Locked,
    /// Unlock requested; settlement delay not yet elapsed.
    Unlocking,
    /// Unlock settled; available to withdraw.
    Withdrawable,
}

impl PositionState {
    /// The canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locking => "LOCKING",
            Self::Locked => "LOCKED",
            Self::Unlocking => "UNLOCKING",
            Self::Withdrawable => "WITHDRAWABLE",
        }
    }

    /// Whether an unlock request may mark a position in this state.
    pub fn is_unlock_eligible(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl std::fmt::Display for PositionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One deposit's worth of tokens.
///
/// Fields are read-only outside the crate: the ledger is the only writer and
/// it maintains `amount > 0` for every live position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub(crate) handle: PositionHandle,
    pub(crate) amount: u64,
    pub(crate) created_epoch: Epoch,
    pub(crate) unlock_requested_epoch: Option<Epoch>,
}

impl Position {
    pub(crate) fn new(handle: PositionHandle, amount: u64, created_epoch: Epoch) -> Self {
        Self {
            handle,
            amount,
            created_epoch,
            unlock_requested_epoch: None,
        }
    }

    /// This position's handle.
    pub fn handle(&self) -> PositionHandle {
        self.handle
    }

    /// Tokens held by this position.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Epoch the position was opened in.
    pub fn created_epoch(&self) -> Epoch {
        self.created_epoch
    }

    /// Epoch an unlock was requested in, if any.
    pub fn unlock_requested_epoch(&self) -> Option<Epoch> {
        self.unlock_requested_epoch
    }

    /// Whether an unlock has been requested for this position.
    pub fn is_unlock_requested(&self) -> bool {
        self.unlock_requested_epoch.is_some()
    }

    /// Classify this position at `current_epoch`.
    ///
    /// An epoch earlier than the creation or request epoch is treated as the
    /// earliest state of the relevant phase rather than as an error.
    pub fn state(&self, current_epoch: Epoch, unlocking_duration: u64) -> PositionState {
        match self.unlock_requested_epoch {
            Some(requested) => {
                if current_epoch < requested.saturating_add(unlocking_duration) {
                    PositionState::Unlocking
                } else {
                    PositionState::Withdrawable
                }
            }
            None if current_epoch <= self.created_epoch => PositionState::Locking,
            None => PositionState::Locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(created: u64) -> Position {
        Position::new(PositionHandle::new(1), 100, Epoch::new(created))
    }

    #[test]
    fn locking_in_creation_epoch() {
        let p = position(5);
        assert_eq!(p.state(Epoch::new(5), 1), PositionState::Locking);
    }

    #[test]
    fn locked_after_creation_epoch() {
        let p = position(5);
        assert_eq!(p.state(Epoch::new(6), 1), PositionState::Locked);
        assert_eq!(p.state(Epoch::new(600), 1), PositionState::Locked);
    }

    #[test]
    fn earlier_epoch_reads_as_locking() {
        let p = position(5);
        assert_eq!(p.state(Epoch::new(2), 1), PositionState::Locking);
    }

    #[test]
    fn unlocking_in_request_epoch_then_withdrawable() {
        let mut p = position(0);
        p.unlock_requested_epoch = Some(Epoch::new(3));
        assert_eq!(p.state(Epoch::new(3), 1), PositionState::Unlocking);
        assert_eq!(p.state(Epoch::new(4), 1), PositionState::Withdrawable);
        assert_eq!(p.state(Epoch::new(40), 1), PositionState::Withdrawable);
    }

    #[test]
    fn longer_unlocking_duration_delays_withdrawal() {
        let mut p = position(0);
        p.unlock_requested_epoch = Some(Epoch::new(3));
        assert_eq!(p.state(Epoch::new(4), 3), PositionState::Unlocking);
        assert_eq!(p.state(Epoch::new(5), 3), PositionState::Unlocking);
        assert_eq!(p.state(Epoch::new(6), 3), PositionState::Withdrawable);
    }

    #[test]
    fn only_locked_is_unlock_eligible() {
        assert!(PositionState::Locked.is_unlock_eligible());
        assert!(!PositionState::Locking.is_unlock_eligible());
        assert!(!PositionState::Unlocking.is_unlock_eligible());
        assert!(!PositionState::Withdrawable.is_unlock_eligible());
    }

    #[test]
    fn state_serialization_uses_canonical_names() {
        for state in [
            PositionState::Locking,
            PositionState::Locked,
            PositionState::Unlocking,
            PositionState::Withdrawable,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn handle_display() {
        assert_eq!(PositionHandle::new(12).to_string(), "#12");
    }
}
