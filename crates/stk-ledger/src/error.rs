//! Ledger operation errors.
//!
//! Partial unlocks are not errors: a request the FIFO policy can only
//! partly satisfy succeeds and reports the amount actually marked.

use thiserror::Error;

use crate::position::PositionHandle;

/// Errors returned by ledger operations.
///
/// Every variant is raised before any mutation, so a failed call leaves the
/// ledger exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A deposit or unlock request was made for a zero amount.
    #[error("invalid amount for {operation}: must be greater than zero")]
    InvalidAmount {
        /// The operation that rejected the amount.
        operation: &'static str,
    },

    /// A withdrawal exceeds the amount currently withdrawable.
    #[error("insufficient withdrawable balance: requested {requested}, available {available}")]
    InsufficientWithdrawable {
        /// The amount the caller asked to withdraw.
        requested: u64,
        /// The withdrawable total at the time of the request.
        available: u64,
    },

    /// A deposit would push the ledger's total past `u64::MAX`.
    #[error("deposit of {amount} would overflow the ledger total of {total}")]
    Overflow {
        /// The rejected deposit amount.
        amount: u64,
        /// The ledger total before the deposit.
        total: u64,
    },

    /// The ledger already holds the configured maximum number of positions.
    #[error("position limit reached: ledger holds the maximum of {max} positions")]
    TooManyPositions {
        /// The configured cap.
        max: usize,
    },

    /// No live position carries the given handle.
    #[error("position {0} not found")]
    PositionNotFound(PositionHandle),
}

impl LedgerError {
    /// Stable snake_case name of the error kind, for scripts and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientWithdrawable { .. } => "insufficient_withdrawable",
            Self::Overflow { .. } => "overflow",
            Self::TooManyPositions { .. } => "too_many_positions",
            Self::PositionNotFound(_) => "position_not_found",
        }
    }
}
